pub mod bootcamps_in_radius;
pub mod create_bootcamp;
pub mod delete_bootcamp;
pub mod get_bootcamp;
pub mod list_bootcamps;
pub mod update_bootcamp;
pub mod upload_photo;

#[cfg(test)]
pub mod testing;

pub mod bootcamps;
pub mod users;

pub mod forgot_password;
pub mod login;
pub mod me;
pub mod register;
pub mod reset_password;
pub mod reset_tokens;
pub mod update_details;
pub mod update_password;

#[cfg(test)]
pub mod testing;

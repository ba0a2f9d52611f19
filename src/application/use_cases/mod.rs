pub mod auth;
pub mod bootcamps;

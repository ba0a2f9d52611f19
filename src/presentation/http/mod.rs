pub mod auth;
pub mod bootcamps;
pub mod error;
pub mod health;

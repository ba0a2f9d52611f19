pub mod bootcamp_repository;
pub mod geocoder;
pub mod mailer;
pub mod photo_store;
pub mod user_repository;

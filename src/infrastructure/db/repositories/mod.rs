pub mod bootcamp_repository_sqlx;
pub mod user_repository_sqlx;

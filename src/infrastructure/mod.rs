pub mod db;
pub mod email;
pub mod geo;
pub mod storage;

pub mod auth;
pub mod bus;
pub mod db;
pub mod storage;
pub mod utils;

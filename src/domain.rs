pub mod access;
pub mod entities;
pub mod password;
pub mod query;
pub mod use_cases;

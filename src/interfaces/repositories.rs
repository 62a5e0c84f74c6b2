pub mod account;
pub mod events;
pub mod image;
pub mod payload;
pub mod sqlx_repo;

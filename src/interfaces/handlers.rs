pub mod home;
pub mod images;
pub mod moderator;
pub mod system;
pub mod users;

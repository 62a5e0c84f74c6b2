pub mod accounts;
pub mod extractors;
pub mod images;

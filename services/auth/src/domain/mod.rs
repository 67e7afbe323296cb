pub mod mail;
pub mod repository;
pub mod types;

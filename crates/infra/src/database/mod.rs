//! SQLite persistence for the token store

mod manager;
mod token_repository;

pub use manager::DbManager;
pub use token_repository::SqliteTokenRepository;

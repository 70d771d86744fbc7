pub mod error;
pub mod export;
pub mod readings_db;

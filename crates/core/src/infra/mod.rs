pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod postgres_repo;
pub mod sql;
pub mod sqlite_repo;

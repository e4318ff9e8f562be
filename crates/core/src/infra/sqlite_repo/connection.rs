//! Opens the single SQLite handle every statement is serialised through.
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::infra::error::DbError;

pub const MEMORY_PATH: &str = ":memory:";

pub async fn create_pool(db_path: &Path) -> Result<SqlitePool, DbError> {
    let opts = if db_path.as_os_str() == MEMORY_PATH {
        SqliteConnectOptions::from_str("sqlite::memory:")?
    } else {
        let full_path = absolute(db_path);

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| DbError::Connect(format!("db dir create error: {e}")))?;
        }

        SqliteConnectOptions::new()
            .filename(&full_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
    };

    let opts = opts.busy_timeout(Duration::from_secs(5));

    // One connection: the embedded store has no pooling, and an in-memory
    // database lives only as long as its connection.
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await
        .map_err(DbError::from)
}

fn absolute(db_path: &Path) -> PathBuf {
    if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(db_path)
    }
}

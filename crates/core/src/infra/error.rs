//! Adapter error type.
//!
//! Driver failures are carried verbatim in [`DbError::Sqlx`]; the adapter
//! never retries or masks them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("cannot decode column '{column}' of type {type_name}")]
    Decode { column: String, type_name: String },

    #[error("database connect failed: {0}")]
    Connect(String),
}

impl DbError {
    /// SQLite reports `2067` (UNIQUE) / `1555` (PRIMARY KEY); Postgres `23505`.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self.code().as_deref(),
            Some("23505") | Some("2067") | Some("1555")
        )
    }

    pub fn code(&self) -> Option<String> {
        match self {
            DbError::Sqlx(sqlx::Error::Database(db_err)) => {
                db_err.code().map(|c| c.into_owned())
            }
            _ => None,
        }
    }
}

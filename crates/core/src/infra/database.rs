//! Database wiring: the single statement interface callers use, and the
//! factory that picks the backend implementation.
use std::fmt;
use std::sync::Arc;

use crate::domain::model::{BackendKind, Row, RunResult, Value};
use crate::infra::config::BackendConfig;
use crate::infra::error::DbError;
use crate::infra::postgres_repo::PostgresBackend;
use crate::infra::sql::is_insert;
use crate::infra::sqlite_repo::SqliteBackend;
use crate::ports::backend::Backend;

/// Cloneable handle over the selected backend.
#[derive(Clone)]
pub struct Database {
    backend: Arc<dyn Backend>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("backend", &self.backend.kind())
            .finish()
    }
}

impl Database {
    pub fn from_backend(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// `template` uses `?` placeholders whatever the backend.
    pub fn prepare(&self, template: &str) -> Statement<'_> {
        Statement {
            backend: self.backend.as_ref(),
            sql: self.backend.translate(template),
            insert: is_insert(template),
        }
    }

    pub async fn exec(&self, batch: &str) -> Result<(), DbError> {
        self.backend.exec(batch).await
    }

    pub async fn close(&self) {
        self.backend.close().await;
    }
}

pub struct Statement<'db> {
    backend: &'db dyn Backend,
    sql: String,
    insert: bool,
}

impl Statement<'_> {
    /// The SQL actually sent to the driver.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub async fn run(&self, params: &[Value]) -> Result<RunResult, DbError> {
        self.backend.run(&self.sql, params, self.insert).await
    }

    pub async fn all(&self, params: &[Value]) -> Result<Vec<Row>, DbError> {
        self.backend.all(&self.sql, params).await
    }

    /// First row only; order is whatever the SQL says.
    pub async fn get(&self, params: &[Value]) -> Result<Option<Row>, DbError> {
        self.backend.get(&self.sql, params).await
    }
}

pub async fn connect(cfg: &BackendConfig) -> Result<Database, DbError> {
    let backend: Arc<dyn Backend> = match cfg {
        BackendConfig::Sqlite { path } => Arc::new(SqliteBackend::new(path).await?),
        BackendConfig::Postgres {
            url,
            max_connections,
        } => Arc::new(PostgresBackend::new(url, *max_connections).await?),
    };
    Ok(Database::from_backend(backend))
}

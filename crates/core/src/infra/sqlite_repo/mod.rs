//! Embedded-file backend. Native `?` binding, rowid from the driver.
mod connection;
mod decode;

use std::path::Path;

use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::SqlitePool;
use tracing::info;

use crate::domain::model::{BackendKind, Row, RunResult, Value};
use crate::infra::error::DbError;
use crate::infra::sql::chunk_statements;
use crate::ports::backend::Backend;

pub use connection::MEMORY_PATH;

pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub async fn new(db_path: &Path) -> Result<Self, DbError> {
        let pool = connection::create_pool(db_path).await?;
        info!(path = %db_path.display(), "sqlite backend ready");
        Ok(Self { pool })
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [Value],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Integer(v) => query.bind(*v),
            Value::Real(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.as_str()),
            Value::Blob(v) => query.bind(v.as_slice()),
            Value::Bool(v) => query.bind(*v),
        };
    }
    query
}

#[async_trait::async_trait]
impl Backend for SqliteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    async fn run(&self, sql: &str, params: &[Value], insert: bool) -> Result<RunResult, DbError> {
        let result = bind_params(sqlx::query(sql), params)
            .execute(&self.pool)
            .await?;

        // last_insert_rowid() is connection-sticky; only inserts report it.
        Ok(RunResult {
            last_insert_rowid: if insert { result.last_insert_rowid() } else { 0 },
            changes: result.rows_affected(),
        })
    }

    async fn all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DbError> {
        let rows = bind_params(sqlx::query(sql), params)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode::decode_row).collect()
    }

    async fn get(&self, sql: &str, params: &[Value]) -> Result<Option<Row>, DbError> {
        let row = bind_params(sqlx::query(sql), params)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(decode::decode_row).transpose()
    }

    async fn exec(&self, batch: &str) -> Result<(), DbError> {
        for stmt in chunk_statements(batch) {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

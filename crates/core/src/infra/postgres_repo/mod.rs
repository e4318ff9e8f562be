//! Networked backend. Templates are rewritten to `$n` placeholders and
//! inserts report their id through `RETURNING id`.
mod connection;
mod decode;

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgArgumentBuffer, PgArguments, PgTypeInfo, Postgres};
use sqlx::query::Query;
use sqlx::PgPool;
use tracing::info;

use crate::domain::model::{BackendKind, Row, RunResult, Value};
use crate::infra::error::DbError;
use crate::infra::sql::{chunk_statements, has_returning, to_postgres};
use crate::ports::backend::Backend;

pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    pub async fn new(url: &str, max_connections: u32) -> Result<Self, DbError> {
        let pool = connection::create_pool(url, max_connections).await?;
        info!(max_connections, "postgres backend ready");
        Ok(Self { pool })
    }
}

/// A NULL sent with the unspecified type OID so the server infers the
/// parameter type from context, whatever column it lands in.
struct UntypedNull;

impl sqlx::Type<Postgres> for UntypedNull {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_oid(Oid(0))
    }
}

impl sqlx::Encode<'_, Postgres> for UntypedNull {
    fn encode_by_ref(&self, _buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        Ok(IsNull::Yes)
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [Value],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            Value::Null => query.bind(UntypedNull),
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
impl Backend for PostgresBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Postgres
    }

    fn translate(&self, template: &str) -> String {
        to_postgres(template)
    }

    async fn run(&self, sql: &str, params: &[Value], insert: bool) -> Result<RunResult, DbError> {
        if !has_returning(sql) {
            let result = bind_params(sqlx::query(sql), params)
                .execute(&self.pool)
                .await?;
            return Ok(RunResult {
                last_insert_rowid: 0,
                changes: result.rows_affected(),
            });
        }

        let rows = bind_params(sqlx::query(sql), params)
            .fetch_all(&self.pool)
            .await?;

        let last_insert_rowid = if insert {
            match rows.first() {
                Some(row) => decode::decode_row(row)?.i64("id").unwrap_or(0),
                None => 0,
            }
        } else {
            0
        };

        Ok(RunResult {
            last_insert_rowid,
            changes: rows.len() as u64,
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

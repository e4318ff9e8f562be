//! Helpers to create/configure the
//! Postgres pool.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::infra::error::DbError;

pub async fn create_pool(
  url: &str,
  max_connections: u32
) -> Result<PgPool, DbError> {
  PgPoolOptions::new()
    .max_connections(max_connections)
    .acquire_timeout(
      Duration::from_secs(30)
    )
    .connect(url)
    .await
    .map_err(|e| {
      DbError::Connect(format!(
        "postgres connect error: {e}"
      ))
    })
}

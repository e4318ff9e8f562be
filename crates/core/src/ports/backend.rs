use crate::domain::model::{BackendKind, Row, RunResult, Value};
use crate::infra::error::DbError;

/// Statement execution over one physical store.
///
/// `sql` handed to these methods has already been passed through
/// [`Backend::translate`]; implementations bind `params` positionally.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Turns a `?` template into the backend's native form.
    fn translate(&self, template: &str) -> String {
        template.to_string()
    }

    async fn run(&self, sql: &str, params: &[Value], insert: bool) -> Result<RunResult, DbError>;

    async fn all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DbError>;

    async fn get(&self, sql: &str, params: &[Value]) -> Result<Option<Row>, DbError>;

    /// Runs a `;`-separated batch without parameters.
    async fn exec(&self, batch: &str) -> Result<(), DbError>;

    async fn close(&self);
}

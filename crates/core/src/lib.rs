//! Backend-agnostic SQL access and schema provisioning for the Haven
//! foundation site.
//!
//! Callers write `?`-parameterised SQL once and run it through a
//! [`Database`] handle; the handle is backed by either an embedded SQLite
//! file or a Postgres pool, chosen once at startup from a
//! [`BackendConfig`].

pub mod app;
pub mod domain;
pub mod infra;
pub mod ports;

pub use app::provision::{provision, ProvisionError, ProvisionReport};
pub use domain::model::{ApplicationStatus, BackendKind, Row, RunResult, Value};
pub use infra::config::{AppMode, BackendConfig, ConfigError};
pub use infra::database::{connect, Database, Statement};
pub use infra::error::DbError;

//! HTTP surface of the Haven foundation site.

pub mod ai;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod csv;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod payu;
pub mod validation;

use std::path::Path;

use haven_core::{BackendConfig, Database, connect, provision};

pub use app_state::AppState;
pub use config::ServerConfig;
pub use handlers::router;

use crate::ai::AiClient;

/// Directory relative paths in the config file resolve against.
pub fn config_base_dir(config_path: &Path) -> &Path {
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Connects to the configured backend and provisions it. Any failure
/// here is fatal to the process.
pub async fn open_database(backend: &BackendConfig) -> anyhow::Result<Database> {
    tracing::info!(backend = %backend.describe(), "connecting database");
    let db = connect(backend).await?;

    let report = provision(&db).await?;
    tracing::info!(
        tables = report.tables,
        programs = report.programs_inserted,
        careers = report.careers_inserted,
        skipped = report.seeds_skipped,
        "schema provisioned"
    );
    Ok(db)
}

pub async fn build_state(config: &ServerConfig, config_path: &Path) -> anyhow::Result<AppState> {
    let backend = config.backend(config_base_dir(config_path))?;
    let db = open_database(&backend).await?;

    let ai = AiClient::from_config(&config.ai)?;
    if ai.is_none() {
        tracing::info!("ai api key not set; assistant endpoints disabled");
    }

    Ok(AppState::new(
        db,
        &config.admin.token,
        config.payu.clone(),
        ai,
    ))
}

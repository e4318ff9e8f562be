use tracing_subscriber::EnvFilter;

use crate::infra::config::ConfigError;

pub fn init_logging(level: Option<&str>) -> Result<(), ConfigError> {
    let level = level.map(str::trim).filter(|l| !l.is_empty()).unwrap_or("info");

    // Base level from config, still overridable via RUST_LOG.
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("{level},sqlx=warn"))
            .map_err(|e| ConfigError::Invalid(format!("invalid logging.level: {e}")))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .try_init()
        .map_err(|e| ConfigError::Invalid(format!("logging init failed: {e}")))
}

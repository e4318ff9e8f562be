use std::path::{
  Path,
  PathBuf
};

use haven_core::{
  AppMode,
  BackendConfig,
  ConfigError
};
use serde::Deserialize;

const CONFIG_SCHEMA: &str = include_str!(
  "../res/schemas/server.schema.json"
);

pub const DEFAULT_CONFIG_PATH: &str =
  "crates/server/res/config.toml";

#[derive(Debug, Clone, Deserialize)]

pub struct ServerConfig {
  pub app:      AppConfig,
  pub http:     HttpConfig,
  pub database: DatabaseConfig,
  #[serde(default)]
  pub logging:  LoggingConfig,
  pub admin:    AdminConfig,
  pub payu:     PayuConfig,
  #[serde(default)]
  pub ai:       AiConfig
}

#[derive(Debug, Clone, Deserialize)]

pub struct AppConfig {
  pub mode: AppMode
}

#[derive(Debug, Clone, Deserialize)]

pub struct HttpConfig {
  pub host: String,
  pub port: u16
}

#[derive(Debug, Clone, Deserialize)]

pub struct DatabaseConfig {
  pub sqlite_path:     String,
  pub url:             Option<String>,
  pub max_connections: Option<u32>
}

#[derive(
  Debug, Clone, Default, Deserialize,
)]

pub struct LoggingConfig {
  pub level: Option<String>
}

#[derive(Debug, Clone, Deserialize)]

pub struct AdminConfig {
  pub token: String
}

#[derive(Debug, Clone, Deserialize)]

pub struct PayuConfig {
  pub key:      String,
  pub salt:     String,
  pub base_url: Option<String>
}

#[derive(
  Debug, Clone, Default, Deserialize,
)]

pub struct AiConfig {
  pub api_key:  Option<String>,
  pub model:    Option<String>,
  pub endpoint: Option<String>
}

impl ServerConfig {
  /// Reads, schema-checks and parses
  /// the file, then applies
  /// environment overrides.
  pub async fn load(
    path: &Path
  ) -> Result<Self, ConfigError> {
    let content =
      tokio::fs::read_to_string(path)
        .await?;

    let mut config = Self::from_toml_str(
      &content,
      &path.display().to_string()
    )?;

    config.apply_env(|key| {
      std::env::var(key).ok()
    });

    Ok(config)
  }

  pub fn from_toml_str(
    content: &str,
    name: &str
  ) -> Result<Self, ConfigError> {
    validate_toml(
      CONFIG_SCHEMA,
      content,
      name
    )?;

    let config: ServerConfig =
      toml::from_str(content)?;

    Ok(config)
  }

  /// `APP_ENV`/`NODE_ENV` carry the
  /// production flag; secrets may come
  /// from the environment instead of
  /// the file.
  pub fn apply_env<F>(
    &mut self,
    lookup: F
  ) where
    F: Fn(&str) -> Option<String>
  {
    let mode = lookup("APP_ENV")
      .or_else(|| lookup("NODE_ENV"))
      .and_then(|v| {
        AppMode::from_env_value(&v)
      });

    if let Some(mode) = mode {
      self.app.mode = mode;
    }

    if let Some(url) =
      non_empty(lookup("DATABASE_URL"))
    {
      self.database.url = Some(url);
    }

    if let Some(token) =
      non_empty(lookup("ADMIN_TOKEN"))
    {
      self.admin.token = token;
    }

    if let Some(key) =
      non_empty(lookup("PAYU_KEY"))
    {
      self.payu.key = key;
    }

    if let Some(salt) =
      non_empty(lookup("PAYU_SALT"))
    {
      self.payu.salt = salt;
    }

    if let Some(key) =
      non_empty(lookup("AI_API_KEY"))
    {
      self.ai.api_key = Some(key);
    }
  }

  pub fn backend(
    &self,
    base_dir: &Path
  ) -> Result<BackendConfig, ConfigError>
  {
    BackendConfig::resolve(
      self.app.mode,
      self.database.url.as_deref(),
      &self.sqlite_path(base_dir),
      self.database.max_connections
    )
  }

  pub fn sqlite_path(
    &self,
    base_dir: &Path
  ) -> PathBuf {
    let raw =
      self.database.sqlite_path.trim();

    if raw.is_empty() {
      return base_dir
        .join("haven.sqlite");
    }

    let path = Path::new(raw);

    if path.is_absolute() {
      return path.to_path_buf();
    }

    base_dir.join(raw)
  }
}

fn non_empty(
  value: Option<String>
) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

fn validate_toml(
  schema: &str,
  toml_input: &str,
  name: &str
) -> Result<(), ConfigError> {
  let schema_json: serde_json::Value =
    serde_json::from_str(schema)
      .map_err(|e| {
        ConfigError::Invalid(format!(
          "schema parse error: {e}"
        ))
      })?;

  let compiled =
    jsonschema::validator_for(
      &schema_json
    )
    .map_err(|e| {
      ConfigError::Invalid(format!(
        "schema compile error: {e}"
      ))
    })?;

  let toml_value: toml::Value =
    toml::from_str(toml_input)
      .map_err(|e| {
        ConfigError::Invalid(format!(
          "{name}: {e}"
        ))
      })?;

  let json_value =
    serde_json::to_value(toml_value)
      .map_err(|e| {
        ConfigError::Invalid(
          e.to_string()
        )
      })?;

  let mut errors =
    compiled.iter_errors(&json_value);

  if let Some(err) = errors.next() {
    let mut messages =
      vec![err.to_string()];

    for e in errors.take(4) {
      messages.push(e.to_string());
    }

    return Err(ConfigError::Invalid(
      format!(
        "schema validation failed for \
         {name}: {}",
        messages.join("; ")
      )
    ));
  }

  Ok(())
}

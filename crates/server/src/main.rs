use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use haven_core::infra::logging::init_logging;
use haven_server::config::DEFAULT_CONFIG_PATH;
use haven_server::{ServerConfig, build_state, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let config_path = PathBuf::from(
    std::env::var("SERVER_CONFIG_PATH")
      .unwrap_or_else(|_| {
        DEFAULT_CONFIG_PATH.to_string()
      })
  );

  let config =
    ServerConfig::load(&config_path)
      .await
      .with_context(|| {
        format!(
          "loading {}",
          config_path.display()
        )
      })?;

  init_logging(
    config.logging.level.as_deref()
  )?;

  tracing::info!(mode = ?config.app.mode, "server mode configured");

  let state =
    build_state(&config, &config_path)
      .await?;
  let db = state.db.clone();

  let addr: SocketAddr = format!(
    "{}:{}",
    config.http.host, config.http.port
  )
  .parse()
  .context("invalid http bind")?;

  let listener =
    tokio::net::TcpListener::bind(addr)
      .await?;
  tracing::info!(%addr, "listening");

  axum::serve(listener, router(state))
    .with_graceful_shutdown(shutdown())
    .await
    .context("http server error")?;

  db.close().await;
  tracing::info!("server stopped");
  Ok(())
}

async fn shutdown() {
  if let Err(e) =
    tokio::signal::ctrl_c().await
  {
    tracing::error!(error = %e, "signal handler failed");
  }
}

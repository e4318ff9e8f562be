use std::path::PathBuf;

use clap::{
  Parser,
  Subcommand
};
use haven_core::infra::logging::init_logging;
use haven_core::infra::sql::{
  count_placeholders,
  to_postgres
};
use haven_server::config::DEFAULT_CONFIG_PATH;
use haven_core::{
  connect,
  provision
};
use haven_server::{
  ServerConfig,
  config_base_dir
};

#[derive(Parser)]
#[command(
  author,
  version,
  about = "haven ops CLI"
)]

struct Args {
  #[command(subcommand)]
  command: Command
}

#[derive(Subcommand)]

enum Command {
  /// Validate the server config and
  /// resolve the database backend.
  Validate {
    /// Path to config.toml (defaults
    /// to SERVER_CONFIG_PATH or
    /// crates/server/res/config.toml).
    config_path: Option<PathBuf>
  },
  /// Create tables and seed programs
  /// and careers. Safe to re-run.
  Provision {
    /// Path to config.toml (defaults
    /// to SERVER_CONFIG_PATH or
    /// crates/server/res/config.toml).
    config_path: Option<PathBuf>
  },
  /// Print the Postgres form of a
  /// `?`-parameterised statement.
  Rewrite {
    sql: String
  }
}

#[tokio::main]

async fn main() -> anyhow::Result<()> {
  let args = Args::parse();

  match args.command {
    | Command::Validate {
      config_path
    } => {
      let cfg_path =
        pick_config_path(config_path);

      let config =
        ServerConfig::load(&cfg_path)
          .await?;

      let backend = config.backend(
        config_base_dir(&cfg_path)
      )?;

      println!(
        "ok: config validated at {} \
         ({:?} mode, {})",
        cfg_path.display(),
        config.app.mode,
        backend.describe()
      );
    }
    | Command::Provision {
      config_path
    } => {
      let cfg_path =
        pick_config_path(config_path);

      let config =
        ServerConfig::load(&cfg_path)
          .await?;

      init_logging(
        config.logging.level.as_deref()
      )?;

      let backend = config.backend(
        config_base_dir(&cfg_path)
      )?;

      let db = connect(&backend).await?;
      let report = provision(&db).await;
      db.close().await;
      let report = report?;

      println!(
        "ok: provisioned {} ({} tables, \
         {} programs and {} careers \
         seeded, {} skipped)",
        backend.describe(),
        report.tables,
        report.programs_inserted,
        report.careers_inserted,
        report.seeds_skipped
      );
    }
    | Command::Rewrite {
      sql
    } => {
      println!("{}", to_postgres(&sql));
      eprintln!(
        "{} placeholder(s)",
        count_placeholders(&sql)
      );
    }
  }

  Ok(())
}

fn pick_config_path(
  arg: Option<PathBuf>
) -> PathBuf {
  if let Some(p) = arg {
    return p;
  }

  if let Ok(p) =
    std::env::var("SERVER_CONFIG_PATH")
  {
    if !p.trim().is_empty() {
      return PathBuf::from(p);
    }
  }

  PathBuf::from(DEFAULT_CONFIG_PATH)
}

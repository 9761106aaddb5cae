//! lookup-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! directory, optionally seeds it, and serves the JSON API under `/api`.
//!
//! # Seeding
//!
//! ```text
//! cargo run -p lookup-server -- --seed contacts.json
//! ```
//!
//! where `contacts.json` is an array of
//! `{"entity":"contact","id":"c-1","active":true,"fields":{"fullname":"Alice"}}`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use lookup_store_sqlite::{SeedRecord, SqliteDirectory};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Lookup directory server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// JSON file of records to upsert before serving.
  #[arg(long, value_name = "FILE")]
  seed: Option<PathBuf>,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `LOOKUP_*` environment variables.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:       String,
  #[serde(default = "default_port")]
  port:       u16,
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 5280 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/lookup/directory.sqlite") }

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("LOOKUP"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let directory = SqliteDirectory::open(&store_path)
    .await
    .with_context(|| format!("failed to open directory at {store_path:?}"))?;

  if let Some(seed_path) = &cli.seed {
    let raw = std::fs::read_to_string(seed_path)
      .with_context(|| format!("reading seed file {}", seed_path.display()))?;
    let records: Vec<SeedRecord> =
      serde_json::from_str(&raw).context("parsing seed file")?;
    let count = directory.seed(records).await.context("seeding directory")?;
    tracing::info!(count, "seeded records");
  }

  let app = Router::new()
    .nest("/api", lookup_api::api_router(Arc::new(directory)))
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn expand_tilde_uses_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/a/b")), PathBuf::from(home).join("a/b"));
    assert_eq!(expand_tilde(Path::new("/abs/path")), PathBuf::from("/abs/path"));
  }

  #[test]
  fn config_defaults() {
    let cfg: ServerConfig = config::Config::builder()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 5280);
  }
}

//! `lookup` — terminal multi-select lookup against a lookup-server directory.
//!
//! # Usage
//!
//! ```text
//! lookup --url http://localhost:5280 --entity contact --name-field fullname --field selection.json
//! lookup --config ~/.config/lookup/config.toml
//! ```

mod app;
mod client;
mod ui;

use std::{
  fs::File,
  io,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::ApiClient;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lookup_core::LookupConfig;
use lookup_engine::{Driver, RecordingHost};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "lookup", about = "Terminal multi-select lookup")]
struct Args {
  /// Path to a TOML config file (`url` plus a `[lookup]` table).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the lookup server (default: http://localhost:5280).
  #[arg(long, env = "LOOKUP_URL")]
  url: Option<String>,

  /// Directory entity to search, e.g. `contact`.
  #[arg(long)]
  entity: Option<String>,

  /// Field holding each record's display name.
  #[arg(long)]
  name_field: Option<String>,

  /// File holding the serialized selection; created on first change.
  #[arg(long, value_name = "FILE")]
  field: Option<PathBuf>,

  /// Write logs to this file (the terminal is taken by the UI).
  #[arg(long, value_name = "FILE")]
  log: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:    String,
  #[serde(default)]
  lookup: Option<LookupConfig>,
}

/// CLI flags override the `[lookup]` table, which overrides defaults.
fn resolve_lookup(
  file: Option<LookupConfig>,
  entity: Option<String>,
  name_field: Option<String>,
) -> LookupConfig {
  match file {
    Some(mut cfg) => {
      if let Some(entity) = entity {
        cfg.entity = entity;
      }
      if let Some(name_field) = name_field {
        cfg.name_field = name_field;
      }
      cfg
    }
    None => LookupConfig::new(
      entity.unwrap_or_else(|| "contact".to_string()),
      name_field.unwrap_or_else(|| "fullname".to_string()),
    ),
  }
}

fn init_logging(path: &Path) -> Result<()> {
  let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(path) = &args.log {
    init_logging(path)?;
  }

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:5280".to_string());
  let lookup = resolve_lookup(file_cfg.lookup, args.entity, args.name_field);

  let initial = match &args.field {
    Some(path) => app::read_field(path)?,
    None => String::new(),
  };

  tracing::info!(entity = %lookup.entity, url = %base_url, "starting lookup");
  let client = ApiClient::new(base_url).context("building HTTP client")?;
  let driver = Driver::start(lookup, &initial, RecordingHost::new(), Arc::new(client));
  let mut app = App::new(driver, args.field);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  if run_result.is_ok() {
    println!("{}", app.driver.engine().names_field());
  }
  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    app.tick()?;
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(evt) = maybe_event {
      match evt {
        Event::Key(key) => {
          let cont = app.handle_key(key)?;
          if !cont {
            break;
          }
        }
        Event::Resize(_, _) => {
          // Terminal will redraw on next iteration.
        }
        _ => {}
      }
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_override_config_table() {
    let file = LookupConfig::new("account", "name").with_subtexts(Some("city"), None);
    let cfg = resolve_lookup(Some(file), None, Some("title".into()));
    assert_eq!(cfg.entity, "account");
    assert_eq!(cfg.name_field, "title");
    assert_eq!(cfg.subtext1_field(), Some("city"));
  }

  #[test]
  fn defaults_without_config_file() {
    let cfg = resolve_lookup(None, None, None);
    assert_eq!(cfg.entity, "contact");
    assert_eq!(cfg.name_field, "fullname");
    assert_eq!(cfg.id_field(), "contactid");
  }

  #[test]
  fn config_file_parses_lookup_table() {
    let raw = r#"
      url = "http://example.test"

      [lookup]
      entity = "contact"
      name_field = "fullname"
      subtext1_field = "emailaddress1"
      debounce_ms = 150
    "#;
    let cfg: ConfigFile = toml::from_str(raw).unwrap();
    assert_eq!(cfg.url, "http://example.test");
    let lookup = cfg.lookup.unwrap();
    assert_eq!(lookup.debounce_ms, 150);
    assert_eq!(lookup.page_size, 1000);
    assert_eq!(lookup.subtext1_field(), Some("emailaddress1"));
  }
}

//! Error type for `lookup-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// Field names are spliced into JSON paths, so only plain identifiers are
  /// accepted.
  #[error("invalid field name: {0:?}")]
  InvalidField(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error types for `lookup-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed selection field: {0}")]
  MalformedField(#[source] serde_json::Error),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

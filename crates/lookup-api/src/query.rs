//! Handler for `POST /query`.
//!
//! The body is a JSON [`QueryDescriptor`]; the response is the matching
//! records, each projected onto the descriptor's `select` fields.

use std::sync::Arc;

use axum::{Json, extract::State};
use lookup_core::{QueryDescriptor, Record, directory::Directory};

use crate::error::ApiError;

/// `POST /query`
pub async fn handler<D>(
  State(directory): State<Arc<D>>,
  Json(query): Json<QueryDescriptor>,
) -> Result<Json<Vec<Record>>, ApiError>
where
  D: Directory,
{
  let records = directory
    .query(&query)
    .await
    .map_err(ApiError::directory)?;
  tracing::debug!(query = %query, rows = records.len(), "served query");
  Ok(Json(records))
}

//! Handler for `GET /records/{entity}/{id}`.
//!
//! | Param | Notes |
//! |-------|-------|
//! | `id_field` | Identifier field name; defaults to `<entity>id` |
//! | `select` | Comma-separated field names to return |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use lookup_core::{Record, RecordRequest, directory::Directory};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct FetchParams {
  pub id_field: Option<String>,
  /// Comma-separated field names, e.g. `fullname,emailaddress1`.
  pub select:   Option<String>,
}

/// `GET /records/{entity}/{id}[?id_field=...][&select=a,b]`
pub async fn get_one<D>(
  State(directory): State<Arc<D>>,
  Path((entity, id)): Path<(String, String)>,
  Query(params): Query<FetchParams>,
) -> Result<Json<Record>, ApiError>
where
  D: Directory,
{
  let request = RecordRequest {
    id_field: params.id_field.unwrap_or_else(|| format!("{entity}id")),
    select: params
      .select
      .map(|s| {
        s.split(',')
          .map(|f| f.trim().to_owned())
          .filter(|f| !f.is_empty())
          .collect()
      })
      .unwrap_or_default(),
    entity,
    id,
  };

  let record = directory
    .fetch(&request)
    .await
    .map_err(ApiError::directory)?
    .ok_or_else(|| ApiError::NotFound(format!("{} {} not found", request.entity, request.id)))?;
  Ok(Json(record))
}

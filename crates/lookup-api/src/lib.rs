//! JSON HTTP API for a lookup directory.
//!
//! Exposes an axum [`Router`] backed by any [`lookup_core::directory::Directory`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lookup_api::api_router(directory.clone()))
//! ```

pub mod error;
pub mod query;
pub mod records;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use lookup_core::directory::Directory;

pub use error::ApiError;

/// Build the API router for `directory`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<D>(directory: Arc<D>) -> Router<()>
where
  D: Directory + 'static,
{
  Router::new()
    .route("/query", post(query::handler::<D>))
    .route("/records/{entity}/{id}", get(records::get_one::<D>))
    .with_state(directory)
}

#[cfg(test)]
mod tests;

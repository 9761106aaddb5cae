//! The `Directory` trait — the remote record-query and record-fetch services.
//!
//! Implemented by storage backends (`lookup-store-sqlite`) and transports
//! (the HTTP client in `lookup-cli`). The engine depends on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  query::{QueryDescriptor, RecordRequest},
  record::Record,
};

/// Abstraction over a searchable directory of records.
///
/// All methods return `Send` futures so the trait can be used from spawned
/// tokio tasks.
pub trait Directory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run `query` and return at most `query.top` records, ordered ascending by
  /// `query.order_by`. Each record carries the `select` fields (absent or null
  /// when the record has no value).
  fn query<'a>(
    &'a self,
    query: &'a QueryDescriptor,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + 'a;

  /// Fetch the single record `request` names, projected onto its `select`
  /// fields. Returns `None` if no such record exists.
  fn fetch<'a>(
    &'a self,
    request: &'a RecordRequest,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + 'a;
}

//! Core types and trait definitions for the lookup multi-select.
//!
//! This crate is deliberately free of HTTP, database and timer dependencies.
//! It holds the selection model, the serialized field codec, the query
//! planner and the [`directory::Directory`] abstraction every backend
//! implements.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod codec;
pub mod config;
pub mod directory;
pub mod error;
pub mod item;
pub mod query;
pub mod record;
pub mod selection;

pub use config::LookupConfig;
pub use error::{Error, Result};
pub use item::SelectableItem;
pub use query::{QueryDescriptor, RecordRequest};
pub use record::Record;
pub use selection::SelectionStore;

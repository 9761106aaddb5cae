//! SQLite backend for the lookup directory.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Records are stored schemaless: each row
//! holds a JSON object keyed by field name, queried with SQLite's JSON
//! functions.

mod encode;
mod schema;
mod store;

pub mod error;

pub use encode::SeedRecord;
pub use error::{Error, Result};
pub use store::SqliteDirectory;

#[cfg(test)]
mod tests;

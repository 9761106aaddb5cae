//! Selection-state synchronisation for the lookup multi-select.
//!
//! [`SyncEngine`] is a sans-IO state machine: it decides *when* to debounce
//! and *which* query to run, and reconciles results against the selection.
//! [`Driver`] runs it on tokio against any [`lookup_core::directory::Directory`].

mod driver;
mod engine;
mod host;
mod view;

pub use driver::{BoxError, Driver, DriverError, DriverEvent};
pub use engine::{Debounce, QueryTicket, SyncEngine, TimerToken};
pub use host::{HostBinding, Notice, RecordingHost};
pub use view::{CandidateRow, Chip, ViewModel};

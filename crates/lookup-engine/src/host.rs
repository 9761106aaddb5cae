//! The host side of the control: output notifications and user notices.

use std::fmt;

use serde::Serialize;

/// A dismissible, non-fatal message for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
  /// A search or the initial load failed.
  QueryFailed,
  /// A record created elsewhere could not be loaded into the selection.
  RecordFetchFailed,
}

impl Notice {
  pub fn message(&self) -> &'static str {
    match self {
      Self::QueryFailed => "Unable to load lookup records.",
      Self::RecordFetchFailed => "Failed to load the newly created record.",
    }
  }
}

impl fmt::Display for Notice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.message())
  }
}

/// Callbacks from the engine into the hosting form.
///
/// `output_changed` only signals; the host reads
/// [`crate::SyncEngine::serialized_output`] and
/// [`crate::SyncEngine::names_field`] afterwards.
pub trait HostBinding {
  fn output_changed(&mut self);

  fn notify(&mut self, notice: Notice);
}

/// A [`HostBinding`] that records calls for the host to poll.
#[derive(Debug, Default)]
pub struct RecordingHost {
  /// Total `output_changed` calls.
  pub changes: usize,
  pub notices: Vec<Notice>,
  dirty:       bool,
}

impl RecordingHost {
  pub fn new() -> Self { Self::default() }

  /// Whether outputs changed since the last call.
  pub fn take_changed(&mut self) -> bool { std::mem::take(&mut self.dirty) }

  pub fn take_notices(&mut self) -> Vec<Notice> { std::mem::take(&mut self.notices) }
}

impl HostBinding for RecordingHost {
  fn output_changed(&mut self) {
    self.changes += 1;
    self.dirty = true;
  }

  fn notify(&mut self, notice: Notice) { self.notices.push(notice); }
}

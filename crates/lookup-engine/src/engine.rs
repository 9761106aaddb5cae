//! [`SyncEngine`] — keeps the selection, the candidate list, the serialized
//! field and the view model consistent.
//!
//! The engine performs no I/O. Operations that need a timer or a remote query
//! return a [`Debounce`] or a [`QueryTicket`] for the caller to act on, and
//! the caller reports back through `on_debounce_elapsed`, `on_query_result`
//! and `on_query_failure`.
//!
//! Two counters guard against races:
//! - a timer token: only the most recently scheduled debounce may fire;
//! - a query generation: only the most recently issued query may update the
//!   candidate list. Earlier results are dropped on arrival.

use std::{error::Error as StdError, time::Duration};

use lookup_core::{
  LookupConfig, QueryDescriptor, SelectableItem, SelectionStore, codec,
  item::sort_for_display,
  query::{build_initial_query, build_search_query},
};
use tracing::{debug, info, warn};

use crate::{
  host::{HostBinding, Notice},
  view::ViewModel,
};

// ─── Tokens ───────────────────────────────────────────────────────────────────

/// Identifies one scheduled debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// A debounce the host must schedule: after `delay`, call
/// [`SyncEngine::on_debounce_elapsed`] with `token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
  pub token: TimerToken,
  pub delay: Duration,
}

/// A query the host must run, tagged with its generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
  pub generation: u64,
  pub descriptor: QueryDescriptor,
}

// ─── Engine ───────────────────────────────────────────────────────────────────

pub struct SyncEngine<H> {
  config:             LookupConfig,
  host:               H,

  selection:          SelectionStore,
  /// Result of the current query, sorted for display.
  candidates:         Vec<SelectableItem>,

  /// Last serialized value produced for the host.
  serialized:         String,
  names:              String,

  panel_open:         bool,
  /// Raw text of the latest search input.
  search_text:        String,
  /// Trimmed text of the last issued search.
  last_issued_search: String,

  pending_timer:      Option<TimerToken>,
  timers_scheduled:   u64,
  /// Generation of the most recently issued query.
  generation:         u64,
}

impl<H: HostBinding> SyncEngine<H> {
  /// Hydrate the selection from `serialized_input` and plan the initial
  /// unfiltered query.
  ///
  /// A blank or malformed `serialized_input` yields an empty selection.
  pub fn initialize(
    config: LookupConfig,
    serialized_input: &str,
    host: H,
  ) -> (Self, QueryTicket) {
    let mut engine = Self {
      config,
      host,
      selection: SelectionStore::new(),
      candidates: Vec::new(),
      serialized: String::new(),
      names: String::new(),
      panel_open: false,
      search_text: String::new(),
      last_issued_search: String::new(),
      pending_timer: None,
      timers_scheduled: 0,
      generation: 0,
    };
    engine.load_field(serialized_input);
    engine.publish_outputs();
    info!(
      entity = %engine.config.entity,
      selected = engine.selection.len(),
      "lookup initialised"
    );
    let ticket = engine.issue(build_initial_query(&engine.config));
    (engine, ticket)
  }

  // ── Search input ──────────────────────────────────────────────────────────

  /// Record new search text and schedule a debounce. Any earlier pending
  /// debounce is superseded.
  pub fn on_search_input(&mut self, raw_text: &str) -> Debounce {
    self.search_text = raw_text.to_owned();
    self.timers_scheduled += 1;
    let token = TimerToken(self.timers_scheduled);
    if let Some(old) = self.pending_timer.replace(token) {
      debug!(?old, ?token, "debounce superseded");
    }
    Debounce {
      token,
      delay: self.config.debounce(),
    }
  }

  /// The quiet window for `token` has passed. Returns the search to run, or
  /// `None` if the token was superseded or the search would be redundant.
  pub fn on_debounce_elapsed(&mut self, token: TimerToken) -> Option<QueryTicket> {
    if self.pending_timer != Some(token) {
      debug!(?token, "ignoring superseded debounce");
      return None;
    }
    self.pending_timer = None;
    self.run_search()
  }

  /// Search-icon click: close an open panel, otherwise search immediately
  /// with the current text and open it.
  pub fn toggle_panel(&mut self) -> Option<QueryTicket> {
    if self.panel_open {
      self.panel_open = false;
      return None;
    }
    self.run_search()
  }

  pub fn close_panel(&mut self) { self.panel_open = false; }

  fn run_search(&mut self) -> Option<QueryTicket> {
    let text = self.search_text.trim().to_owned();
    if text == self.last_issued_search && self.panel_open {
      debug!(search = %text, "search unchanged; skipping query");
      return None;
    }
    let ticket = self.issue(build_search_query(&self.config, &text));
    self.last_issued_search = text;
    self.panel_open = true;
    Some(ticket)
  }

  fn issue(&mut self, descriptor: QueryDescriptor) -> QueryTicket {
    self.generation += 1;
    debug!(generation = self.generation, query = %descriptor, "issuing query");
    QueryTicket {
      generation: self.generation,
      descriptor,
    }
  }

  fn is_current(&self, ticket: &QueryTicket) -> bool {
    ticket.generation == self.generation
  }

  // ── Query completion ──────────────────────────────────────────────────────

  /// Replace the candidate list with `items` if `ticket` is the most recently
  /// issued query. Returns whether the result was applied.
  pub fn on_query_result(&mut self, ticket: &QueryTicket, items: Vec<SelectableItem>) -> bool {
    if !self.is_current(ticket) {
      debug!(
        generation = ticket.generation,
        current = self.generation,
        "discarding stale query result"
      );
      return false;
    }
    let mut candidates: Vec<SelectableItem> = Vec::with_capacity(items.len());
    for item in items {
      if !candidates.iter().any(|c| c.id == item.id) {
        candidates.push(item);
      }
    }
    sort_for_display(&mut candidates);
    debug!(generation = ticket.generation, rows = candidates.len(), "candidates replaced");
    self.candidates = candidates;
    true
  }

  /// Report a failed query. State is left untouched; the host is notified
  /// unless the query was already superseded.
  pub fn on_query_failure(&mut self, ticket: &QueryTicket, error: &(dyn StdError + 'static)) {
    if !self.is_current(ticket) {
      debug!(generation = ticket.generation, %error, "discarding stale query failure");
      return;
    }
    warn!(query = %ticket.descriptor, %error, "lookup query failed");
    self.host.notify(Notice::QueryFailed);
  }

  // ── Selection changes ─────────────────────────────────────────────────────

  /// Checkbox change on candidate `id`. Ids not in the candidate list are
  /// ignored. Returns whether the event was handled.
  pub fn on_toggle_candidate(&mut self, id: &str, checked: bool) -> bool {
    let Some(item) = self.candidates.iter().find(|c| c.id == id) else {
      debug!(id, "toggle for unknown candidate ignored");
      return false;
    };
    if checked {
      let item = item.clone();
      self.selection.add(item);
    } else {
      self.selection.remove(id);
    }
    self.publish_outputs();
    true
  }

  /// Chip removal. Returns whether `id` was selected.
  pub fn on_deselect(&mut self, id: &str) -> bool {
    if !self.selection.remove(id) {
      return false;
    }
    self.publish_outputs();
    true
  }

  /// A record created outside the widget is added to the selection and the
  /// candidate list is reloaded unfiltered. Returns `None` if it was already
  /// selected.
  pub fn on_record_created(&mut self, item: SelectableItem) -> Option<QueryTicket> {
    let id = item.id.clone();
    if !self.selection.add(item) {
      debug!(%id, "created record already selected");
      return None;
    }
    self.publish_outputs();
    let ticket = self.issue(build_initial_query(&self.config));
    self.last_issued_search.clear();
    Some(ticket)
  }

  pub fn on_record_fetch_failure(&mut self, error: &(dyn StdError + 'static)) {
    warn!(%error, "failed to load created record");
    self.host.notify(Notice::RecordFetchFailed);
  }

  // ── Host value ────────────────────────────────────────────────────────────

  /// The host pushed a field value. Our own last output is an echo and is
  /// ignored; anything else resets the selection. Returns whether it reset.
  pub fn on_host_value_changed(&mut self, new_serialized_input: &str) -> bool {
    if new_serialized_input == self.serialized {
      return false;
    }
    info!("selection reset from host value");
    self.load_field(new_serialized_input);
    self.publish_outputs();
    true
  }

  fn load_field(&mut self, field: &str) {
    self.selection = codec::try_decode(field).unwrap_or_else(|error| {
      warn!(%error, "discarding malformed selection field");
      SelectionStore::new()
    });
  }

  /// Re-derive both output values and signal the host.
  fn publish_outputs(&mut self) {
    match codec::encode(&self.selection) {
      Ok(serialized) => self.serialized = serialized,
      Err(error) => warn!(%error, "failed to encode selection"),
    }
    self.names = self.selection.names();
    self.host.output_changed();
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// The field value: `""` or a JSON array of the selected items.
  pub fn serialized_output(&self) -> &str { &self.serialized }

  /// Selected display names in display order, joined with `", "`.
  pub fn names_field(&self) -> &str { &self.names }

  pub fn view(&self) -> ViewModel {
    ViewModel::derive(&self.candidates, &self.selection, self.panel_open, &self.search_text)
  }

  pub fn config(&self) -> &LookupConfig { &self.config }

  pub fn selection(&self) -> &SelectionStore { &self.selection }

  pub fn candidates(&self) -> &[SelectableItem] { &self.candidates }

  pub fn panel_open(&self) -> bool { self.panel_open }

  pub fn search_text(&self) -> &str { &self.search_text }

  /// Generation of the most recently issued query.
  pub fn current_generation(&self) -> u64 { self.generation }

  pub fn host(&self) -> &H { &self.host }

  pub fn host_mut(&mut self) -> &mut H { &mut self.host }
}

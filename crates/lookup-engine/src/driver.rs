//! [`Driver`] — runs a [`SyncEngine`] on tokio against a [`Directory`].
//!
//! Debounce timers and queries become spawned tasks that post a
//! [`DriverEvent`] back to the driver's channel when they complete. The
//! engine itself is only touched from the task that owns the driver, so no
//! locking is involved.

use std::sync::Arc;

use lookup_core::{
  LookupConfig, Record,
  directory::Directory,
  query::build_record_request,
  record::{to_item, to_items},
};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use crate::{
  engine::{Debounce, QueryTicket, SyncEngine, TimerToken},
  host::HostBinding,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum DriverError {
  #[error("record {0} not found")]
  RecordNotFound(String),
}

/// Completion posted by a spawned timer or query task.
#[derive(Debug)]
pub enum DriverEvent {
  DebounceElapsed(TimerToken),
  QueryFinished {
    ticket: QueryTicket,
    result: Result<Vec<Record>, BoxError>,
  },
  RecordFetched {
    id:     String,
    result: Result<Option<Record>, BoxError>,
  },
}

pub struct Driver<D, H> {
  engine:    SyncEngine<H>,
  directory: Arc<D>,
  tx:        mpsc::UnboundedSender<DriverEvent>,
  rx:        mpsc::UnboundedReceiver<DriverEvent>,
  /// Token and sleep task of the pending debounce, aborted when superseded.
  debounce:  Option<(TimerToken, JoinHandle<()>)>,
}

impl<D, H> Driver<D, H>
where
  D: Directory + 'static,
  H: HostBinding,
{
  /// Initialise the engine and start the initial query.
  ///
  /// Must be called from within a tokio runtime.
  pub fn start(
    config: LookupConfig,
    serialized_input: &str,
    host: H,
    directory: Arc<D>,
  ) -> Self {
    let (engine, ticket) = SyncEngine::initialize(config, serialized_input, host);
    let (tx, rx) = mpsc::unbounded_channel();
    let driver = Self {
      engine,
      directory,
      tx,
      rx,
      debounce: None,
    };
    driver.spawn_query(ticket);
    driver
  }

  pub fn engine(&self) -> &SyncEngine<H> { &self.engine }

  /// Direct access for synchronous operations (toggles, deselect, host
  /// value changes) that never start I/O.
  pub fn engine_mut(&mut self) -> &mut SyncEngine<H> { &mut self.engine }

  // ── Operations that start tasks ───────────────────────────────────────────

  pub fn search_input(&mut self, raw_text: &str) {
    let Debounce { token, delay } = self.engine.on_search_input(raw_text);
    if let Some((_, previous)) = self.debounce.take() {
      previous.abort();
    }
    let tx = self.tx.clone();
    let handle = tokio::spawn(async move {
      tokio::time::sleep(delay).await;
      // A closed channel means the driver is gone.
      let _ = tx.send(DriverEvent::DebounceElapsed(token));
    });
    self.debounce = Some((token, handle));
  }

  /// Whether a debounce timer is scheduled and not yet applied.
  pub fn debounce_pending(&self) -> bool { self.debounce.is_some() }

  pub fn toggle_panel(&mut self) {
    if let Some(ticket) = self.engine.toggle_panel() {
      self.spawn_query(ticket);
    }
  }

  /// Fetch record `id` and add it to the selection, e.g. after it was
  /// created in another form.
  pub fn select_record(&mut self, id: &str) {
    let request = build_record_request(self.engine.config(), id);
    let directory = Arc::clone(&self.directory);
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = directory
        .fetch(&request)
        .await
        .map_err(|e| Box::new(e) as BoxError);
      let _ = tx.send(DriverEvent::RecordFetched {
        id: request.id,
        result,
      });
    });
  }

  fn spawn_query(&self, ticket: QueryTicket) {
    let directory = Arc::clone(&self.directory);
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = directory
        .query(&ticket.descriptor)
        .await
        .map_err(|e| Box::new(e) as BoxError);
      let _ = tx.send(DriverEvent::QueryFinished { ticket, result });
    });
  }

  // ── Event application ─────────────────────────────────────────────────────

  /// Apply every event already delivered, without waiting. Returns how many
  /// were applied.
  pub fn pump(&mut self) -> usize {
    let mut applied = 0;
    while let Ok(event) = self.rx.try_recv() {
      self.apply(event);
      applied += 1;
    }
    applied
  }

  /// Wait for the next event and apply it.
  pub async fn next_event(&mut self) {
    // The driver holds a sender, so the channel never closes under us.
    if let Some(event) = self.rx.recv().await {
      self.apply(event);
    }
  }

  fn apply(&mut self, event: DriverEvent) {
    match event {
      DriverEvent::DebounceElapsed(token) => {
        // A superseded timer may still deliver; keep the live handle.
        if self.debounce.as_ref().is_some_and(|(pending, _)| *pending == token) {
          self.debounce = None;
        }
        if let Some(ticket) = self.engine.on_debounce_elapsed(token) {
          self.spawn_query(ticket);
        }
      }
      DriverEvent::QueryFinished { ticket, result } => match result {
        Ok(records) => {
          let items = to_items(&records, self.engine.config());
          debug!(
            generation = ticket.generation,
            records = records.len(),
            items = items.len(),
            "query finished"
          );
          self.engine.on_query_result(&ticket, items);
        }
        Err(error) => self.engine.on_query_failure(&ticket, &*error),
      },
      DriverEvent::RecordFetched { id, result } => {
        let item = match result {
          Ok(record) => record.and_then(|r| to_item(&r, self.engine.config())),
          Err(error) => {
            self.engine.on_record_fetch_failure(&*error);
            return;
          }
        };
        match item {
          Some(item) => {
            if let Some(ticket) = self.engine.on_record_created(item) {
              self.spawn_query(ticket);
            }
          }
          None => self
            .engine
            .on_record_fetch_failure(&DriverError::RecordNotFound(id)),
        }
      }
    }
  }
}

//! Application state and key dispatch.
//!
//! The [`App`] is the host of a single lookup control: it feeds keystrokes to
//! the [`Driver`], persists the serialized output to the field file whenever
//! the engine reports a change, and surfaces notices in the status bar.

use std::path::PathBuf;

use anyhow::Context as _;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lookup_engine::{Driver, RecordingHost, ViewModel};

use crate::client::ApiClient;

// ─── Focus ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Search,
  Candidates,
  Selected,
}

impl Focus {
  fn next(self) -> Self {
    match self {
      Self::Search => Self::Candidates,
      Self::Candidates => Self::Selected,
      Self::Selected => Self::Search,
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App {
  pub driver: Driver<ApiClient, RecordingHost>,

  /// Current keyboard focus.
  pub focus: Focus,

  /// Raw text of the search box, echoed to the engine on every edit.
  pub search: String,

  /// Cursor within the candidate rows.
  pub candidate_cursor: usize,

  /// Cursor within the selected chips.
  pub chip_cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Record id being typed after Ctrl-N, if the prompt is open.
  pub id_prompt: Option<String>,

  /// Where the serialized selection is persisted, if anywhere.
  field_path: Option<PathBuf>,
}

impl App {
  pub fn new(driver: Driver<ApiClient, RecordingHost>, field_path: Option<PathBuf>) -> Self {
    Self {
      driver,
      focus: Focus::Search,
      search: String::new(),
      candidate_cursor: 0,
      chip_cursor: 0,
      status_msg: String::new(),
      id_prompt: None,
      field_path,
    }
  }

  pub fn view(&self) -> ViewModel { self.driver.engine().view() }

  pub fn entity_label(&self) -> &str { &self.driver.engine().config().entity_label }

  // ── Engine plumbing ───────────────────────────────────────────────────────

  /// Apply finished timers and queries, then sync host-side state.
  pub fn tick(&mut self) -> anyhow::Result<()> {
    self.driver.pump();
    self.sync_host()
  }

  /// Drain the host's change flag and notices.
  fn sync_host(&mut self) -> anyhow::Result<()> {
    let host = self.driver.engine_mut().host_mut();
    let changed = host.take_changed();
    let notices = host.take_notices();

    if changed {
      self.persist_field()?;
      self.status_msg = self.driver.engine().names_field().to_owned();
    }
    if let Some(notice) = notices.last() {
      self.status_msg = notice.message().to_owned();
    }
    self.clamp_cursors();
    Ok(())
  }

  fn persist_field(&self) -> anyhow::Result<()> {
    let Some(path) = &self.field_path else {
      return Ok(());
    };
    std::fs::write(path, self.driver.engine().serialized_output())
      .with_context(|| format!("writing field file {}", path.display()))
  }

  /// Re-read the field file as an external value change.
  fn reload_field(&mut self) -> anyhow::Result<()> {
    let Some(path) = self.field_path.clone() else {
      self.status_msg = "No field file to reload.".into();
      return Ok(());
    };
    let raw = read_field(&path)?;
    if !self.driver.engine_mut().on_host_value_changed(&raw) {
      self.status_msg = "Field unchanged.".into();
    }
    Ok(())
  }

  fn clamp_cursors(&mut self) {
    let view = self.view();
    self.candidate_cursor = self
      .candidate_cursor
      .min(view.candidates.len().saturating_sub(1));
    self.chip_cursor = self.chip_cursor.min(view.selected.len().saturating_sub(1));
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if key.code == KeyCode::Char('c') && ctrl {
      return Ok(false);
    }
    if self.id_prompt.is_some() {
      self.handle_prompt_key(key);
      return Ok(true);
    }

    // Global keys.
    match key.code {
      KeyCode::Esc => return Ok(false),
      KeyCode::Char('n') if ctrl => {
        self.id_prompt = Some(String::new());
        return Ok(true);
      }
      KeyCode::Char('r') if ctrl => {
        self.reload_field()?;
        self.sync_host()?;
        return Ok(true);
      }
      KeyCode::Tab => {
        self.focus = self.focus.next();
        return Ok(true);
      }
      KeyCode::Enter => {
        self.driver.toggle_panel();
        return Ok(true);
      }
      _ => {}
    }

    match self.focus {
      Focus::Search => self.handle_search_key(key),
      Focus::Candidates => self.handle_candidate_key(key),
      Focus::Selected => self.handle_chip_key(key),
    }
    self.sync_host()?;
    Ok(true)
  }

  /// Keys while the add-by-id prompt is open. Enter fetches the record and
  /// adds it to the selection once it arrives.
  fn handle_prompt_key(&mut self, key: KeyEvent) {
    let Some(prompt) = self.id_prompt.as_mut() else {
      return;
    };
    match key.code {
      KeyCode::Char(c) => prompt.push(c),
      KeyCode::Backspace => {
        prompt.pop();
      }
      KeyCode::Esc => self.id_prompt = None,
      KeyCode::Enter => {
        let id = self.id_prompt.take().unwrap_or_default();
        let id = id.trim();
        if !id.is_empty() {
          self.driver.select_record(id);
          self.status_msg = format!("Adding {id}…");
        }
      }
      _ => {}
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char(c) => {
        self.search.push(c);
        self.driver.search_input(&self.search);
      }
      KeyCode::Backspace => {
        if self.search.pop().is_some() {
          self.driver.search_input(&self.search);
        }
      }
      KeyCode::Down => self.focus = Focus::Candidates,
      _ => {}
    }
  }

  fn handle_candidate_key(&mut self, key: KeyEvent) {
    let view = self.view();
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        if self.candidate_cursor + 1 < view.candidates.len() {
          self.candidate_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.candidate_cursor = self.candidate_cursor.saturating_sub(1);
      }
      KeyCode::Char(' ') => {
        if let Some(row) = view.candidates.get(self.candidate_cursor) {
          self
            .driver
            .engine_mut()
            .on_toggle_candidate(&row.id, !row.checked);
        }
      }
      _ => {}
    }
  }

  fn handle_chip_key(&mut self, key: KeyEvent) {
    let view = self.view();
    match key.code {
      KeyCode::Right | KeyCode::Char('l') => {
        if self.chip_cursor + 1 < view.selected.len() {
          self.chip_cursor += 1;
        }
      }
      KeyCode::Left | KeyCode::Char('h') => {
        self.chip_cursor = self.chip_cursor.saturating_sub(1);
      }
      KeyCode::Delete | KeyCode::Backspace => {
        if let Some(chip) = view.selected.get(self.chip_cursor) {
          self.driver.engine_mut().on_deselect(&chip.id);
        }
      }
      _ => {}
    }
  }
}

/// Read the persisted field value. A missing file is an empty field.
pub fn read_field(path: &std::path::Path) -> anyhow::Result<String> {
  match std::fs::read_to_string(path) {
    Ok(raw) => Ok(raw),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
    Err(e) => Err(e).with_context(|| format!("reading field file {}", path.display())),
  }
}

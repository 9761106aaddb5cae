//! TUI rendering — orchestrates all panes.

pub mod candidates;
pub mod selected;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Focus};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, chips, search box, dropdown, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(4), // chips
      Constraint::Length(3), // search
      Constraint::Min(0),    // dropdown
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  selected::draw(f, rows[1], app);
  draw_search(f, rows[2], app);
  candidates::draw(f, rows[3], app);
  draw_status(f, rows[4], app);
}

/// Border style for a pane, highlighted when it has focus.
pub(crate) fn pane_style(app: &App, pane: Focus) -> Style {
  if app.focus == pane {
    Style::default().fg(Color::Cyan)
  } else {
    Style::default().fg(Color::DarkGray)
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let line = Line::from(vec![Span::styled(
    format!(" lookup · {}", app.entity_label()),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  )]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Search box ───────────────────────────────────────────────────────────────

fn draw_search(f: &mut Frame, area: Rect, app: &App) {
  if let Some(prompt) = &app.id_prompt {
    let block = Block::default()
      .title(format!(" Add {} by id ", app.entity_label()))
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(Paragraph::new(format!("{prompt}_")).block(block), area);
    return;
  }

  let block = Block::default()
    .title(" Search ")
    .borders(Borders::ALL)
    .border_style(pane_style(app, Focus::Search));

  let text = if app.focus == Focus::Search {
    format!("{}_", app.search)
  } else {
    app.search.clone()
  };
  f.render_widget(Paragraph::new(text).block(block), area);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.focus {
    _ if app.id_prompt.is_some() => ("ADD", "Type a record id  Enter add  Esc cancel"),
    Focus::Search => ("SEARCH", "Type to search  Enter open/close  Tab focus  Esc quit"),
    Focus::Candidates => ("LIST", "↑↓/jk move  Space toggle  Tab focus  Esc quit"),
    Focus::Selected => ("CHIPS", "←→/hl move  Del remove  Ctrl-N add by id  Ctrl-R reload  Esc quit"),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray));

  f.render_widget(Paragraph::new(Line::from(vec![mode_span, hint_span])), area);
}

//! Dropdown pane: candidate rows with checkboxes.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, Focus};

/// Render the candidate list, or a hint while the panel is closed.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let view = app.view();
  let block = Block::default()
    .title(format!(" {} ({}) ", app.entity_label(), view.candidates.len()))
    .borders(Borders::ALL)
    .border_style(super::pane_style(app, Focus::Candidates));

  if !view.panel_open {
    let hint = Span::styled(
      "Press Enter to search.",
      Style::default().fg(Color::DarkGray),
    );
    f.render_widget(Paragraph::new(Line::from(hint)).block(block), area);
    return;
  }

  let items: Vec<ListItem> = view
    .candidates
    .iter()
    .map(|row| {
      let checkbox = if row.checked { "[x] " } else { "[ ] " };
      let mut spans = vec![Span::raw(checkbox), Span::raw(row.label.clone())];
      if !row.subtext.is_empty() {
        spans.push(Span::styled(
          format!("  {}", row.subtext),
          Style::default().fg(Color::DarkGray),
        ));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut state = ListState::default();
  if app.focus == Focus::Candidates && !view.candidates.is_empty() {
    state.select(Some(app.candidate_cursor));
  }

  let list = List::new(items).block(block).highlight_style(
    Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  f.render_stateful_widget(list, area, &mut state);
}

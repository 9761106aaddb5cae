//! Selected chips pane.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, Focus};

/// Render the selected items as a wrapping row of chips.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let view = app.view();
  let block = Block::default()
    .title(format!(" Selected ({}) ", view.selected.len()))
    .borders(Borders::ALL)
    .border_style(super::pane_style(app, Focus::Selected));

  if view.selected.is_empty() {
    let hint = Span::styled("Nothing selected.", Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(Line::from(hint)).block(block), area);
    return;
  }

  let mut spans = Vec::with_capacity(view.selected.len() * 2);
  for (i, chip) in view.selected.iter().enumerate() {
    let style = if app.focus == Focus::Selected && i == app.chip_cursor {
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().bg(Color::Gray).fg(Color::Black)
    };
    spans.push(Span::styled(format!(" {} × ", chip.label), style));
    spans.push(Span::raw(" "));
  }

  f.render_widget(
    Paragraph::new(Line::from(spans))
      .block(block)
      .wrap(Wrap { trim: true }),
    area,
  );
}

//! Render-ready view model, derived from candidates and selection.

use lookup_core::{SelectableItem, SelectionStore};
use serde::Serialize;

/// A selected item as shown in the chip list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chip {
  pub id:          String,
  /// Entity type, for hosts that open the record on click.
  pub entity_type: String,
  pub label:       String,
}

/// A dropdown row with its checkbox state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateRow {
  pub id:      String,
  pub label:   String,
  pub subtext: String,
  pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
  /// Chips in display order.
  pub selected:    Vec<Chip>,
  /// Candidates in display order.
  pub candidates:  Vec<CandidateRow>,
  pub panel_open:  bool,
  pub search_text: String,
}

impl ViewModel {
  /// Build the view from scratch. Checkbox state is a function of
  /// `(candidates, selection)` only.
  pub fn derive(
    candidates: &[SelectableItem],
    selection: &SelectionStore,
    panel_open: bool,
    search_text: &str,
  ) -> Self {
    let selected = selection
      .all()
      .into_iter()
      .map(|item| Chip {
        id:          item.id.clone(),
        entity_type: item.entity_type.clone(),
        label:       item.display_name.clone(),
      })
      .collect();

    let mut sorted: Vec<&SelectableItem> = candidates.iter().collect();
    sorted.sort_by(|a, b| lookup_core::item::display_order(a, b));
    let candidates = sorted
      .into_iter()
      .map(|item| CandidateRow {
        id:      item.id.clone(),
        label:   item.display_name.clone(),
        subtext: item.subtext().to_owned(),
        checked: selection.contains(&item.id),
      })
      .collect();

    Self {
      selected,
      candidates,
      panel_open,
      search_text: search_text.to_owned(),
    }
  }
}

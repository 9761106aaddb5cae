//! `SelectionStore` — the set of items the user has chosen.
//!
//! Pure data: no I/O, no notifications. Membership is keyed by
//! [`SelectableItem::id`]; display order is recomputed on every read.

use crate::item::{SelectableItem, display_order};

/// The ordered set of selected items. No two members share an `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
  /// Insertion order; only [`SelectionStore::all`] defines display order.
  items: Vec<SelectableItem>,
}

impl SelectionStore {
  pub fn new() -> Self { Self::default() }

  /// Insert `item` unless a member with the same id exists.
  /// Returns whether the item was inserted.
  pub fn add(&mut self, item: SelectableItem) -> bool {
    if self.contains(&item.id) {
      return false;
    }
    self.items.push(item);
    true
  }

  /// Remove the member with `id`. Returns whether anything was removed.
  pub fn remove(&mut self, id: &str) -> bool {
    let before = self.items.len();
    self.items.retain(|i| i.id != id);
    self.items.len() != before
  }

  pub fn contains(&self, id: &str) -> bool {
    self.items.iter().any(|i| i.id == id)
  }

  pub fn get(&self, id: &str) -> Option<&SelectableItem> {
    self.items.iter().find(|i| i.id == id)
  }

  /// All members sorted by display name.
  pub fn all(&self) -> Vec<&SelectableItem> {
    let mut sorted: Vec<&SelectableItem> = self.items.iter().collect();
    sorted.sort_by(|a, b| display_order(a, b));
    sorted
  }

  pub fn len(&self) -> usize { self.items.len() }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// Display names in [`SelectionStore::all`] order, joined with `", "`.
  pub fn names(&self) -> String {
    self
      .all()
      .into_iter()
      .map(|i| i.display_name.as_str())
      .collect::<Vec<_>>()
      .join(", ")
  }
}

impl FromIterator<SelectableItem> for SelectionStore {
  /// Collect items, keeping the first occurrence of each id.
  fn from_iter<T: IntoIterator<Item = SelectableItem>>(iter: T) -> Self {
    let mut store = Self::new();
    for item in iter {
      store.add(item);
    }
    store
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(id: &str, name: &str) -> SelectableItem {
    SelectableItem::new(id, "contact", name)
  }

  #[test]
  fn add_is_idempotent_per_id() {
    let mut s = SelectionStore::new();
    assert!(s.add(item("1", "Alice")));
    let snapshot = s.clone();

    assert!(!s.add(item("1", "Alice (renamed)")));
    assert_eq!(s, snapshot);
    assert_eq!(s.get("1").unwrap().display_name, "Alice");
  }

  #[test]
  fn remove_absent_is_noop() {
    let mut s: SelectionStore = [item("1", "Alice")].into_iter().collect();
    let snapshot = s.clone();
    assert!(!s.remove("2"));
    assert_eq!(s, snapshot);

    assert!(s.remove("1"));
    assert!(s.is_empty());
    assert!(!s.contains("1"));
  }

  #[test]
  fn all_is_sorted_by_display_name() {
    let s: SelectionStore = [item("3", "Carol"), item("1", "alice"), item("2", "Bob")]
      .into_iter()
      .collect();
    let ids: Vec<_> = s.all().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
    assert_eq!(s.names(), "alice, Bob, Carol");
  }

  #[test]
  fn names_follow_collation_order() {
    let s: SelectionStore = [
      item("1", "Zoe"),
      item("2", "Émile"),
      item("3", "Alice"),
      item("4", "alice"),
    ]
    .into_iter()
    .collect();
    assert_eq!(s.names(), "alice, Alice, Émile, Zoe");
  }

  #[test]
  fn collect_keeps_first_duplicate() {
    let s: SelectionStore = [item("1", "First"), item("1", "Second")]
      .into_iter()
      .collect();
    assert_eq!(s.len(), 1);
    assert_eq!(s.names(), "First");
  }
}

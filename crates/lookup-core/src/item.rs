//! `SelectableItem` — one directory entry, as a candidate or as a selection.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// A single directory record reduced to the fixed shape the widget works with.
///
/// The serialized keys (`id`, `entityType`, `name`, `subText1`, `subText2`)
/// are the persisted field layout; all five are always written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectableItem {
  /// Opaque identifier, stable across fetches.
  pub id:           String,
  /// Logical name of the source directory.
  #[serde(default, deserialize_with = "null_as_empty")]
  pub entity_type:  String,
  /// Primary label; may be empty.
  #[serde(rename = "name", default, deserialize_with = "null_as_empty")]
  pub display_name: String,
  #[serde(rename = "subText1", default, deserialize_with = "null_as_empty")]
  pub sub_text1:    String,
  #[serde(rename = "subText2", default, deserialize_with = "null_as_empty")]
  pub sub_text2:    String,
}

impl SelectableItem {
  /// An item with both subtexts blank.
  pub fn new(
    id: impl Into<String>,
    entity_type: impl Into<String>,
    display_name: impl Into<String>,
  ) -> Self {
    Self {
      id:           id.into(),
      entity_type:  entity_type.into(),
      display_name: display_name.into(),
      sub_text1:    String::new(),
      sub_text2:    String::new(),
    }
  }

  /// Builder-style setter for both subtexts.
  pub fn with_subtexts(
    mut self,
    sub_text1: impl Into<String>,
    sub_text2: impl Into<String>,
  ) -> Self {
    self.sub_text1 = sub_text1.into();
    self.sub_text2 = sub_text2.into();
    self
  }

  /// The secondary label to show: `sub_text1` if non-blank, else `sub_text2`
  /// if non-blank, else empty.
  pub fn subtext(&self) -> &str {
    if !self.sub_text1.trim().is_empty() {
      &self.sub_text1
    } else if !self.sub_text2.trim().is_empty() {
      &self.sub_text2
    } else {
      ""
    }
  }
}

/// Display ordering for items, by [`compare_names`].
pub fn display_order(a: &SelectableItem, b: &SelectableItem) -> Ordering {
  compare_names(&a.display_name, &b.display_name)
}

/// Collation-style comparison of two labels.
///
/// Levels, each consulted only on a tie at the previous one:
/// 1. base letters, with accents stripped and case folded (`"Émile" < "Zoe"`);
/// 2. accents (`"Emile" < "Émile"`);
/// 3. case, lower-case first (`"alice" < "Alice"`);
/// 4. code points, so the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
  base_letters(a)
    .cmp(base_letters(b))
    .then_with(|| accented(a).cmp(accented(b)))
    .then_with(|| upper_case_marks(a).cmp(upper_case_marks(b)))
    .then_with(|| a.cmp(b))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
  s.nfd()
    .filter(|c| !is_combining_mark(*c))
    .flat_map(char::to_lowercase)
}

fn accented(s: &str) -> impl Iterator<Item = char> + '_ {
  s.nfd().flat_map(char::to_lowercase)
}

fn upper_case_marks(s: &str) -> impl Iterator<Item = bool> + '_ {
  s.nfd().map(char::is_uppercase)
}

/// Sort `items` in place by [`display_order`]. The sort is stable.
pub fn sort_for_display(items: &mut [SelectableItem]) {
  items.sort_by(display_order);
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn subtext_prefers_first_non_blank() {
    let item = SelectableItem::new("1", "contact", "Alice")
      .with_subtexts("alice@example.com", "Acme");
    assert_eq!(item.subtext(), "alice@example.com");

    let item = SelectableItem::new("1", "contact", "Alice").with_subtexts("  ", "Acme");
    assert_eq!(item.subtext(), "Acme");

    let item = SelectableItem::new("1", "contact", "Alice").with_subtexts("", " ");
    assert_eq!(item.subtext(), "");
  }

  #[test]
  fn display_order_folds_case_then_puts_lower_case_first() {
    let mut items = vec![
      SelectableItem::new("1", "contact", "bob"),
      SelectableItem::new("2", "contact", "Alice"),
      SelectableItem::new("3", "contact", "alice"),
      SelectableItem::new("4", "contact", "Carol"),
    ];
    sort_for_display(&mut items);
    let names: Vec<_> = items.iter().map(|i| i.display_name.as_str()).collect();
    assert_eq!(names, ["alice", "Alice", "bob", "Carol"]);
  }

  #[test]
  fn accented_names_sort_with_their_base_letter() {
    let mut items = vec![
      SelectableItem::new("1", "contact", "Zoe"),
      SelectableItem::new("2", "contact", "Émile"),
      SelectableItem::new("3", "contact", "Alice"),
      SelectableItem::new("4", "contact", "alice"),
      SelectableItem::new("5", "contact", "Emile"),
    ];
    sort_for_display(&mut items);
    let names: Vec<_> = items.iter().map(|i| i.display_name.as_str()).collect();
    assert_eq!(names, ["alice", "Alice", "Emile", "Émile", "Zoe"]);
  }

  #[test]
  fn compare_names_is_total() {
    // Composed and decomposed forms tie at every collation level.
    let composed = "\u{e9}";
    let decomposed = "e\u{301}";
    assert_ne!(compare_names(composed, decomposed), Ordering::Equal);
    assert_eq!(compare_names("same", "same"), Ordering::Equal);
  }

  #[test]
  fn serializes_with_persisted_keys() {
    let item = SelectableItem::new("1", "contact", "Alice");
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(
      json,
      serde_json::json!({
        "id": "1",
        "entityType": "contact",
        "name": "Alice",
        "subText1": "",
        "subText2": "",
      })
    );
  }

  #[test]
  fn null_and_missing_labels_become_empty() {
    let item: SelectableItem = serde_json::from_str(
      r#"{"id":"7","entityType":"contact","name":null,"subText2":null}"#,
    )
    .unwrap();
    assert_eq!(item.display_name, "");
    assert_eq!(item.sub_text1, "");
    assert_eq!(item.sub_text2, "");
  }
}

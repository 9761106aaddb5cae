//! Codec between a [`SelectionStore`] and the persisted field value.
//!
//! The field is either the empty string (nothing selected) or a JSON array of
//! [`SelectableItem`] objects with all five keys present.

use crate::{Error, Result, item::SelectableItem, selection::SelectionStore};

/// Encode `selection` for the host field. Items are written in display order
/// so the same set always encodes to the same string.
pub fn encode(selection: &SelectionStore) -> Result<String> {
  if selection.is_empty() {
    return Ok(String::new());
  }
  Ok(serde_json::to_string(&selection.all())?)
}

/// Strict decode. A blank field is the empty set; anything that is not a JSON
/// array of items is [`Error::MalformedField`].
pub fn try_decode(field: &str) -> Result<SelectionStore> {
  if field.trim().is_empty() {
    return Ok(SelectionStore::new());
  }
  let items: Vec<SelectableItem> =
    serde_json::from_str(field).map_err(Error::MalformedField)?;
  Ok(items.into_iter().collect())
}

/// Fail-soft decode: a malformed field degrades to the empty set.
pub fn decode(field: &str) -> SelectionStore {
  try_decode(field).unwrap_or_default()
}

//! Remote records and their mapping onto [`SelectableItem`].
//!
//! A directory returns records keyed by whatever field names the host
//! configured. Mapping happens once per fetched record; nothing past this
//! point sees the remote shape.

use serde_json::Value;

use crate::{config::LookupConfig, item::SelectableItem};

/// A record as returned by a directory: field name → JSON value.
pub type Record = serde_json::Map<String, Value>;

/// Map `record` to an item using the configured field names.
///
/// Returns `None` when the record has no usable identifier. Missing or null
/// labels become empty strings; other scalars are stringified.
pub fn to_item(record: &Record, config: &LookupConfig) -> Option<SelectableItem> {
  let id = field_text(record, &config.id_field());
  if id.is_empty() {
    return None;
  }
  let sub = |field: Option<&str>| field.map(|f| field_text(record, f)).unwrap_or_default();
  Some(SelectableItem {
    id,
    entity_type: config.entity.clone(),
    display_name: field_text(record, &config.name_field),
    sub_text1: sub(config.subtext1_field()),
    sub_text2: sub(config.subtext2_field()),
  })
}

/// Map every record, dropping those without an identifier.
pub fn to_items(records: &[Record], config: &LookupConfig) -> Vec<SelectableItem> {
  records.iter().filter_map(|r| to_item(r, config)).collect()
}

fn field_text(record: &Record, field: &str) -> String {
  match record.get(field) {
    None | Some(Value::Null) => String::new(),
    Some(Value::String(s)) => s.clone(),
    Some(other) => other.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn record(v: Value) -> Record {
    match v {
      Value::Object(map) => map,
      _ => panic!("record fixture must be an object"),
    }
  }

  #[test]
  fn maps_configured_fields() {
    let cfg = LookupConfig::new("contact", "fullname")
      .with_subtexts(Some("emailaddress1"), Some("telephone1"));
    let rec = record(json!({
      "contactid": "c-1",
      "fullname": "Alice Liddell",
      "emailaddress1": null,
      "telephone1": 5550100,
    }));
    let item = to_item(&rec, &cfg).unwrap();
    assert_eq!(item.id, "c-1");
    assert_eq!(item.entity_type, "contact");
    assert_eq!(item.display_name, "Alice Liddell");
    assert_eq!(item.sub_text1, "");
    assert_eq!(item.sub_text2, "5550100");
    assert_eq!(item.subtext(), "5550100");
  }

  #[test]
  fn unconfigured_subtexts_stay_blank() {
    let cfg = LookupConfig::new("contact", "fullname");
    let rec = record(json!({ "contactid": "c-1", "emailaddress1": "a@example.com" }));
    let item = to_item(&rec, &cfg).unwrap();
    assert_eq!(item.display_name, "");
    assert_eq!(item.sub_text1, "");
  }

  #[test]
  fn records_without_id_are_dropped() {
    let cfg = LookupConfig::new("contact", "fullname");
    let recs = vec![
      record(json!({ "fullname": "Ghost" })),
      record(json!({ "contactid": "", "fullname": "Blank" })),
      record(json!({ "contactid": "c-2", "fullname": "Bob" })),
    ];
    let items = to_items(&recs, &cfg);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "c-2");
  }
}

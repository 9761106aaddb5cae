//! Helpers between directory types and the stored row representation.
//!
//! Field names become SQLite JSON paths (`$.fullname`); stored rows are
//! projected back onto the requested `select` list.

use lookup_core::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

// ─── Field names ─────────────────────────────────────────────────────────────

pub fn validate_field(field: &str) -> Result<&str> {
  let valid = !field.is_empty()
    && field
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '_');
  if valid {
    Ok(field)
  } else {
    Err(Error::InvalidField(field.to_owned()))
  }
}

pub fn json_path(field: &str) -> Result<String> {
  Ok(format!("$.{}", validate_field(field)?))
}

pub fn validate_all(fields: &[String]) -> Result<()> {
  fields.iter().try_for_each(|f| validate_field(f).map(drop))
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// Project a stored row onto `select`, always including `id_field`.
/// Fields the row lacks are left out.
pub fn project(record_id: &str, fields_json: &str, select: &[String], id_field: &str) -> Result<Record> {
  let mut stored: Record = serde_json::from_str(fields_json)?;
  let mut out = Record::new();
  for field in select {
    if let Some(value) = stored.remove(field) {
      out.insert(field.clone(), value);
    }
  }
  out.insert(id_field.to_owned(), Value::String(record_id.to_owned()));
  Ok(out)
}

// ─── Seed input ──────────────────────────────────────────────────────────────

/// One record in a seed file, e.g.
/// `{"entity":"contact","id":"c-1","fields":{"fullname":"Alice"}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRecord {
  pub entity: String,
  pub id:     String,
  #[serde(default = "active_by_default")]
  pub active: bool,
  pub fields: Record,
}

fn active_by_default() -> bool { true }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn field_names_are_identifiers() {
    assert_eq!(json_path("full_name1").unwrap(), "$.full_name1");
    for bad in ["", "name')", "a.b", "a b", "naïve"] {
      assert!(matches!(json_path(bad), Err(Error::InvalidField(_))), "{bad:?}");
    }
  }

  #[test]
  fn project_keeps_selected_fields_and_id() {
    let json = r#"{"fullname":"Alice","email":"a@example.com","secret":"x"}"#;
    let select = vec!["fullname".to_owned(), "email".to_owned(), "phone".to_owned()];
    let rec = project("c-1", json, &select, "contactid").unwrap();
    assert_eq!(
      Value::Object(rec),
      serde_json::json!({ "fullname": "Alice", "email": "a@example.com", "contactid": "c-1" })
    );
  }

  #[test]
  fn seed_record_defaults_to_active() {
    let seed: SeedRecord =
      serde_json::from_str(r#"{"entity":"contact","id":"c-1","fields":{}}"#).unwrap();
    assert!(seed.active);
  }
}

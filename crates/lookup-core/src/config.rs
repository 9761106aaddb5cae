//! Host configuration, resolved once when a control is initialised.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which directory to search and which of its fields to show.
///
/// Deserialisable so hosts can load it from TOML or environment sources;
/// every field except `entity` and `name_field` has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
  /// Logical name of the directory entity, e.g. `"contact"`.
  pub entity:         String,
  /// Identifier field. Defaults to `<entity>id`.
  #[serde(default)]
  pub id_field:       Option<String>,
  /// Field holding the display name.
  pub name_field:     String,
  #[serde(default)]
  pub subtext1_field: Option<String>,
  #[serde(default)]
  pub subtext2_field: Option<String>,
  /// Human-readable entity label, e.g. `"Contact"`.
  #[serde(default = "default_entity_label")]
  pub entity_label:   String,
  /// Maximum rows per query.
  #[serde(default = "default_page_size")]
  pub page_size:      usize,
  /// Quiet window for search input, in milliseconds.
  #[serde(default = "default_debounce_ms")]
  pub debounce_ms:    u64,
}

pub const DEFAULT_PAGE_SIZE: usize = 1000;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

fn default_entity_label() -> String { "Record".to_owned() }

fn default_page_size() -> usize { DEFAULT_PAGE_SIZE }

fn default_debounce_ms() -> u64 { DEFAULT_DEBOUNCE_MS }

impl LookupConfig {
  /// Config with every optional setting at its default.
  pub fn new(entity: impl Into<String>, name_field: impl Into<String>) -> Self {
    Self {
      entity:         entity.into(),
      id_field:       None,
      name_field:     name_field.into(),
      subtext1_field: None,
      subtext2_field: None,
      entity_label:   default_entity_label(),
      page_size:      DEFAULT_PAGE_SIZE,
      debounce_ms:    DEFAULT_DEBOUNCE_MS,
    }
  }

  pub fn with_subtexts(
    mut self,
    subtext1_field: Option<&str>,
    subtext2_field: Option<&str>,
  ) -> Self {
    self.subtext1_field = subtext1_field.map(str::to_owned);
    self.subtext2_field = subtext2_field.map(str::to_owned);
    self
  }

  pub fn id_field(&self) -> String {
    match non_blank(self.id_field.as_deref()) {
      Some(f) => f.to_owned(),
      None => format!("{}id", self.entity),
    }
  }

  pub fn subtext1_field(&self) -> Option<&str> {
    non_blank(self.subtext1_field.as_deref())
  }

  pub fn subtext2_field(&self) -> Option<&str> {
    non_blank(self.subtext2_field.as_deref())
  }

  pub fn debounce(&self) -> Duration { Duration::from_millis(self.debounce_ms) }

  /// Fields to retrieve: name, identifier, then the configured subtexts.
  pub fn select_fields(&self) -> Vec<String> {
    let mut fields = vec![self.name_field.clone(), self.id_field()];
    fields.extend(self.subtext1_field().map(str::to_owned));
    fields.extend(self.subtext2_field().map(str::to_owned));
    fields
  }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
  s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_apply_when_deserialising() {
    let cfg: LookupConfig = serde_json::from_value(serde_json::json!({
      "entity": "contact",
      "name_field": "fullname",
      "subtext1_field": "",
    }))
    .unwrap();
    assert_eq!(cfg, LookupConfig::new("contact", "fullname").with_subtexts(Some(""), None));
    assert_eq!(cfg.id_field(), "contactid");
    assert_eq!(cfg.subtext1_field(), None);
    assert_eq!(cfg.page_size, 1000);
    assert_eq!(cfg.debounce(), Duration::from_millis(300));
    assert_eq!(cfg.entity_label, "Record");
  }

  #[test]
  fn select_fields_order() {
    let cfg = LookupConfig::new("contact", "fullname")
      .with_subtexts(Some("emailaddress1"), Some("jobtitle"));
    assert_eq!(
      cfg.select_fields(),
      ["fullname", "contactid", "emailaddress1", "jobtitle"]
    );

    let mut cfg = LookupConfig::new("account", "name");
    cfg.id_field = Some("accountnumber".into());
    assert_eq!(cfg.select_fields(), ["name", "accountnumber"]);
  }
}

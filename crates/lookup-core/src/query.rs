//! Query planning: search text + config → [`QueryDescriptor`].
//!
//! Descriptors are plain values. Backends either execute the structured
//! fields directly (binding the search term as a parameter) or render them
//! with [`QueryDescriptor::filter_expression`], which applies OData quoting.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::LookupConfig;

/// State field tested by the active-only predicate; `0` means active.
pub const STATE_FIELD: &str = "statecode";

// ─── Descriptor ──────────────────────────────────────────────────────────────

/// Case-insensitive "name contains" predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameFilter {
  pub field: String,
  /// The trimmed search term, unescaped.
  pub term:  String,
}

impl NameFilter {
  /// The term as a quoted string literal, single quotes doubled.
  pub fn literal(&self) -> String {
    format!("'{}'", self.term.replace('\'', "''"))
  }
}

/// An immutable description of one directory query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
  /// Target directory entity.
  pub entity:        String,
  /// Identifier field; always part of `select`.
  pub id_field:      String,
  pub select:        Vec<String>,
  /// Restrict to records whose [`STATE_FIELD`] is `0`.
  pub active_only:   bool,
  pub name_contains: Option<NameFilter>,
  /// Results are ordered ascending by this field.
  pub order_by:      String,
  /// Row cap.
  pub top:           usize,
}

impl QueryDescriptor {
  /// The search term this query filters on, or `""` for an unfiltered query.
  pub fn search_term(&self) -> &str {
    self.name_contains.as_ref().map_or("", |f| f.term.as_str())
  }

  /// Predicates joined with `and`, e.g.
  /// `statecode eq 0 and contains(fullname,'O''Brien')`.
  pub fn filter_expression(&self) -> String {
    let mut conds = Vec::new();
    if self.active_only {
      conds.push(format!("{STATE_FIELD} eq 0"));
    }
    if let Some(filter) = &self.name_contains {
      conds.push(format!("contains({},{})", filter.field, filter.literal()));
    }
    conds.join(" and ")
  }
}

impl fmt::Display for QueryDescriptor {
  /// Renders the (unencoded) query string, for logs.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}?$select={}&$orderby={} asc&$top={}",
      self.entity,
      self.select.join(","),
      self.order_by,
      self.top
    )?;
    let filter = self.filter_expression();
    if !filter.is_empty() {
      write!(f, "&$filter={filter}")?;
    }
    Ok(())
  }
}

/// Lookup of one record by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRequest {
  pub entity:   String,
  pub id_field: String,
  pub id:       String,
  pub select:   Vec<String>,
}

// ─── Planner ─────────────────────────────────────────────────────────────────

/// Unfiltered, active-only, first `page_size` rows sorted by name.
pub fn build_initial_query(config: &LookupConfig) -> QueryDescriptor {
  QueryDescriptor {
    entity:        config.entity.clone(),
    id_field:      config.id_field(),
    select:        config.select_fields(),
    active_only:   true,
    name_contains: None,
    order_by:      config.name_field.clone(),
    top:           config.page_size,
  }
}

/// [`build_initial_query`] plus a name-contains predicate on the trimmed
/// `raw_search_text`. A blank term yields the initial query unchanged.
pub fn build_search_query(config: &LookupConfig, raw_search_text: &str) -> QueryDescriptor {
  let mut query = build_initial_query(config);
  let term = raw_search_text.trim();
  if !term.is_empty() {
    query.name_contains = Some(NameFilter {
      field: config.name_field.clone(),
      term:  term.to_owned(),
    });
  }
  query
}

/// Request for record `id` with the same field projection as a query.
pub fn build_record_request(config: &LookupConfig, id: &str) -> RecordRequest {
  RecordRequest {
    entity:   config.entity.clone(),
    id_field: config.id_field(),
    id:       id.to_owned(),
    select:   config.select_fields(),
  }
}

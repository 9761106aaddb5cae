//! [`SqliteDirectory`] — the SQLite implementation of [`Directory`].

use std::path::Path;

use lookup_core::{
  QueryDescriptor, Record, RecordRequest, directory::Directory, item::compare_names,
};
use rusqlite::{OptionalExtension as _, functions::FunctionFlags};
use tracing::debug;

use crate::{
  Result,
  encode::{SeedRecord, json_path, project, validate_all, validate_field},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A record directory backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteDirectory {
  conn: tokio_rusqlite::Connection,
}

impl SqliteDirectory {
  /// Open (or create) a directory at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory directory — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Register the text helpers and create the schema.
  ///
  /// SQLite's `lower()` and `NOCASE` only fold ASCII, so name matching uses
  /// `unicode_lower` and name ordering uses the `LOOKUP_NAME` collation, which
  /// agrees with the display order of items.
  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.create_scalar_function(
          "unicode_lower",
          1,
          FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
          |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
        )?;
        conn.create_collation("LOOKUP_NAME", compare_names)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert or replace one record.
  pub async fn insert_record(
    &self,
    entity: &str,
    id: &str,
    active: bool,
    fields: Record,
  ) -> Result<()> {
    self
      .seed(vec![SeedRecord {
        entity: entity.to_owned(),
        id: id.to_owned(),
        active,
        fields,
      }])
      .await?;
    Ok(())
  }

  /// Insert or replace `records` in one transaction. Returns the row count.
  pub async fn seed(&self, records: Vec<SeedRecord>) -> Result<usize> {
    let rows = records
      .into_iter()
      .map(|r| {
        let fields_json = serde_json::to_string(&r.fields)?;
        Ok((r.entity, r.id, if r.active { 0 } else { 1 }, fields_json))
      })
      .collect::<Result<Vec<(String, String, i64, String)>>>()?;

    let count = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO records (entity, record_id, statecode, fields_json)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (entity, record_id) DO UPDATE SET
               statecode   = excluded.statecode,
               fields_json = excluded.fields_json",
          )?;
          for (entity, id, state, fields_json) in &rows {
            stmt.execute(rusqlite::params![entity, id, state, fields_json])?;
          }
        }
        tx.commit()?;
        Ok(rows.len())
      })
      .await?;
    Ok(count)
  }
}

// ─── Directory impl ──────────────────────────────────────────────────────────

impl Directory for SqliteDirectory {
  type Error = crate::Error;

  async fn query(&self, query: &QueryDescriptor) -> Result<Vec<Record>> {
    validate_all(&query.select)?;
    validate_field(&query.id_field)?;
    let order_path = json_path(&query.order_by)?;
    let (filter_path, term) = match &query.name_contains {
      Some(f) => (Some(json_path(&f.field)?), Some(f.term.clone())),
      None => (None, None),
    };
    let entity      = query.entity.clone();
    let active_only = query.active_only;
    let top         = i64::try_from(query.top).unwrap_or(i64::MAX);

    let rows: Vec<(String, String)> = self
      .conn
      .call(move |conn| {
        let mut conds = vec!["entity = ?1"];
        if active_only {
          conds.push("statecode = 0");
        }
        if filter_path.is_some() {
          // Bound parameter: quotes and `%` in the term are literal.
          conds.push(
            "instr(unicode_lower(CAST(coalesce(json_extract(fields_json, ?2), '') AS TEXT)), \
              unicode_lower(CAST(?3 AS TEXT))) > 0",
          );
        }

        let sql = format!(
          "SELECT record_id, fields_json
           FROM records
           WHERE {}
           ORDER BY json_extract(fields_json, ?4) COLLATE LOOKUP_NAME ASC, record_id
           LIMIT ?5",
          conds.join(" AND ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![entity, filter_path, term, order_path, top],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    debug!(query = %query, rows = rows.len(), "directory query");
    rows
      .iter()
      .map(|(id, json)| project(id, json, &query.select, &query.id_field))
      .collect()
  }

  async fn fetch(&self, request: &RecordRequest) -> Result<Option<Record>> {
    validate_all(&request.select)?;
    validate_field(&request.id_field)?;
    let entity = request.entity.clone();
    let id     = request.id.clone();

    let row: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT fields_json FROM records WHERE entity = ?1 AND record_id = ?2",
            rusqlite::params![entity, id],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    row
      .map(|json| project(&request.id, &json, &request.select, &request.id_field))
      .transpose()
  }
}

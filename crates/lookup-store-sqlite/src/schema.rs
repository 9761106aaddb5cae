//! SQL schema for the lookup SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS records (
    entity      TEXT    NOT NULL,
    record_id   TEXT    NOT NULL,
    statecode   INTEGER NOT NULL DEFAULT 0,   -- 0 = active, 1 = inactive
    fields_json TEXT    NOT NULL,             -- JSON object: field name -> value
    PRIMARY KEY (entity, record_id)
);

CREATE INDEX IF NOT EXISTS records_state_idx ON records(entity, statecode);

PRAGMA user_version = 1;
";

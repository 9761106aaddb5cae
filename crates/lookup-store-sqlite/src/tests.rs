//! Integration tests for `SqliteDirectory` against an in-memory database.

use lookup_core::{
  LookupConfig, Record,
  directory::Directory,
  query::{build_initial_query, build_record_request, build_search_query},
  record::to_items,
};
use serde_json::{Value, json};

use crate::{Error, SeedRecord, SqliteDirectory};

fn fields(v: Value) -> Record {
  match v {
    Value::Object(map) => map,
    _ => panic!("fields fixture must be an object"),
  }
}

fn contact(id: &str, name: &str, email: &str, active: bool) -> SeedRecord {
  SeedRecord {
    entity: "contact".into(),
    id: id.into(),
    active,
    fields: fields(json!({ "fullname": name, "emailaddress1": email, "jobtitle": "Engineer" })),
  }
}

fn config() -> LookupConfig {
  LookupConfig::new("contact", "fullname").with_subtexts(Some("emailaddress1"), None)
}

async fn directory() -> SqliteDirectory {
  let dir = SqliteDirectory::open_in_memory()
    .await
    .expect("in-memory directory");
  let n = dir
    .seed(vec![
      contact("c-1", "Carol Danvers", "carol@example.com", true),
      contact("c-2", "alice Liddell", "alice@example.com", true),
      contact("c-3", "Miles O'Brien", "miles@example.com", true),
      contact("c-4", "Bob Inactive", "bob@example.com", false),
      contact("c-5", "Percent 100% Sure", "", true),
    ])
    .await
    .unwrap();
  assert_eq!(n, 5);
  dir
    .insert_record("account", "a-1", true, fields(json!({ "fullname": "Acme Corp" })))
    .await
    .unwrap();
  dir
}

fn names(records: &[Record]) -> Vec<&str> {
  records
    .iter()
    .map(|r| r["fullname"].as_str().unwrap_or_default())
    .collect()
}

// ─── Query ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn initial_query_returns_active_sorted() {
  let dir = directory().await;
  let rows = dir.query(&build_initial_query(&config())).await.unwrap();
  assert_eq!(
    names(&rows),
    ["alice Liddell", "Carol Danvers", "Miles O'Brien", "Percent 100% Sure"]
  );
}

#[tokio::test]
async fn query_respects_row_cap() {
  let dir = directory().await;
  let mut cfg = config();
  cfg.page_size = 2;
  let rows = dir.query(&build_initial_query(&cfg)).await.unwrap();
  assert_eq!(names(&rows), ["alice Liddell", "Carol Danvers"]);
}

#[tokio::test]
async fn contains_is_case_insensitive() {
  let dir = directory().await;
  let rows = dir.query(&build_search_query(&config(), "ALI")).await.unwrap();
  assert_eq!(names(&rows), ["alice Liddell"]);

  let rows = dir.query(&build_search_query(&config(), "bob")).await.unwrap();
  assert!(rows.is_empty(), "inactive records are excluded");
}

#[tokio::test]
async fn non_ascii_names_match_and_sort_by_base_letter() {
  let dir = directory().await;
  dir
    .seed(vec![
      contact("c-6", "Émile Zola", "emile@example.com", true),
      contact("c-7", "Zoë Ångström", "zoe@example.com", true),
    ])
    .await
    .unwrap();

  let rows = dir.query(&build_search_query(&config(), "émile")).await.unwrap();
  assert_eq!(names(&rows), ["Émile Zola"]);

  let rows = dir.query(&build_search_query(&config(), "ÅNGSTR")).await.unwrap();
  assert_eq!(names(&rows), ["Zoë Ångström"]);

  let rows = dir.query(&build_initial_query(&config())).await.unwrap();
  assert_eq!(
    names(&rows),
    [
      "alice Liddell",
      "Carol Danvers",
      "Émile Zola",
      "Miles O'Brien",
      "Percent 100% Sure",
      "Zoë Ångström",
    ]
  );
}

#[tokio::test]
async fn quote_in_term_matches_literally() {
  let dir = directory().await;
  let rows = dir.query(&build_search_query(&config(), "o'b")).await.unwrap();
  assert_eq!(names(&rows), ["Miles O'Brien"]);

  let rows = dir.query(&build_search_query(&config(), "'")).await.unwrap();
  assert_eq!(names(&rows), ["Miles O'Brien"]);
}

#[tokio::test]
async fn percent_is_not_a_wildcard() {
  let dir = directory().await;
  let rows = dir.query(&build_search_query(&config(), "0%")).await.unwrap();
  assert_eq!(names(&rows), ["Percent 100% Sure"]);

  let rows = dir.query(&build_search_query(&config(), "%s")).await.unwrap();
  assert!(rows.is_empty());
}

#[tokio::test]
async fn rows_are_projected_and_map_to_items() {
  let dir = directory().await;
  let rows = dir.query(&build_search_query(&config(), "carol")).await.unwrap();
  assert_eq!(
    Value::Object(rows[0].clone()),
    json!({
      "fullname": "Carol Danvers",
      "contactid": "c-1",
      "emailaddress1": "carol@example.com",
    })
  );

  let items = to_items(&rows, &config());
  assert_eq!(items[0].id, "c-1");
  assert_eq!(items[0].subtext(), "carol@example.com");
}

#[tokio::test]
async fn invalid_field_is_rejected() {
  let dir = directory().await;
  let mut query = build_initial_query(&config());
  query.order_by = "fullname') --".into();
  assert!(matches!(dir.query(&query).await, Err(Error::InvalidField(_))));
}

// ─── Writes and fetch ────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_replaces_existing_record() {
  let dir = directory().await;
  dir
    .insert_record("contact", "c-1", false, fields(json!({ "fullname": "Carol Danvers" })))
    .await
    .unwrap();
  let rows = dir.query(&build_search_query(&config(), "carol")).await.unwrap();
  assert!(rows.is_empty());
}

#[tokio::test]
async fn fetch_by_id() {
  let dir = directory().await;
  let rec = dir
    .fetch(&build_record_request(&config(), "c-3"))
    .await
    .unwrap()
    .expect("record exists");
  assert_eq!(rec["contactid"], "c-3");
  assert_eq!(rec["fullname"], "Miles O'Brien");

  // Inactive records can still be fetched directly.
  assert!(dir.fetch(&build_record_request(&config(), "c-4")).await.unwrap().is_some());
  assert!(dir.fetch(&build_record_request(&config(), "missing")).await.unwrap().is_none());
  assert!(dir.fetch(&build_record_request(&config(), "a-1")).await.unwrap().is_none());
}

#[tokio::test]
async fn file_backed_directory_persists() {
  let path = std::env::temp_dir().join(format!("lookup-store-{}.sqlite", std::process::id()));
  {
    let dir = SqliteDirectory::open(&path).await.unwrap();
    dir
      .insert_record("contact", "c-1", true, fields(json!({ "fullname": "Alice" })))
      .await
      .unwrap();
  }
  let dir = SqliteDirectory::open(&path).await.unwrap();
  let rows = dir.query(&build_initial_query(&config())).await.unwrap();
  assert_eq!(names(&rows), ["Alice"]);
  drop(dir);
  let _ = std::fs::remove_file(&path);
}

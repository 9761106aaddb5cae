//! Router tests against an in-memory SQLite directory.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use lookup_core::{
  LookupConfig,
  query::{build_initial_query, build_search_query},
};
use lookup_store_sqlite::{SeedRecord, SqliteDirectory};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

async fn router() -> axum::Router {
  let dir = SqliteDirectory::open_in_memory().await.unwrap();
  let seed: Vec<SeedRecord> = serde_json::from_value(json!([
    { "entity": "contact", "id": "c-1", "fields": { "fullname": "Alice", "emailaddress1": "alice@example.com" } },
    { "entity": "contact", "id": "c-2", "fields": { "fullname": "Bob" } },
    { "entity": "contact", "id": "c-3", "active": false, "fields": { "fullname": "Alina" } },
  ]))
  .unwrap();
  dir.seed(seed).await.unwrap();
  api_router(Arc::new(dir))
}

async fn send(router: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
  let res = router.oneshot(req).await.unwrap();
  let status = res.status();
  let bytes = axum::body::to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_query(body: &impl serde::Serialize) -> Request<Body> {
  Request::post("/query")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(serde_json::to_vec(body).unwrap()))
    .unwrap()
}

fn config() -> LookupConfig {
  LookupConfig::new("contact", "fullname").with_subtexts(Some("emailaddress1"), None)
}

#[tokio::test]
async fn query_returns_projected_records() {
  let (status, body) = send(router().await, post_query(&build_initial_query(&config()))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!([
      { "fullname": "Alice", "emailaddress1": "alice@example.com", "contactid": "c-1" },
      { "fullname": "Bob", "contactid": "c-2" },
    ])
  );
}

#[tokio::test]
async fn query_applies_name_filter() {
  let (status, body) = send(router().await, post_query(&build_search_query(&config(), "al"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().map(Vec::len), Some(1));
  assert_eq!(body[0]["fullname"], "Alice");
}

#[tokio::test]
async fn query_with_bad_field_is_server_error() {
  let mut query = build_initial_query(&config());
  query.select.push("bad field".into());
  let (status, body) = send(router().await, post_query(&query)).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(body["error"].as_str().unwrap().contains("invalid field name"));
}

#[tokio::test]
async fn get_record_by_id() {
  let req = Request::get("/records/contact/c-2?select=fullname")
    .body(Body::empty())
    .unwrap();
  let (status, body) = send(router().await, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "fullname": "Bob", "contactid": "c-2" }));
}

#[tokio::test]
async fn get_missing_record_is_404() {
  let req = Request::get("/records/contact/nope").body(Body::empty()).unwrap();
  let (status, body) = send(router().await, req).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "contact nope not found");
}

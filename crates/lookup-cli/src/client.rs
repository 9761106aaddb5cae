//! Async HTTP client for the lookup JSON API, usable as a [`Directory`].

use std::time::Duration;

use lookup_core::{QueryDescriptor, Record, RecordRequest, directory::Directory};
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("invalid URL: {0}")]
  InvalidUrl(String),

  #[error("{method} {path} → {status}")]
  Status {
    method: &'static str,
    path:   String,
    status: StatusCode,
  },
}

/// Async HTTP client for the lookup API served by `lookup-server`.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self {
      client,
      base_url: base_url.into(),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  /// `{base}/api/records/{entity}/{id}` with both segments percent-encoded.
  fn record_url(&self, entity: &str, id: &str) -> Result<Url, ClientError> {
    let mut url =
      Url::parse(&self.url("/records")).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
    url
      .path_segments_mut()
      .map_err(|()| ClientError::InvalidUrl(self.base_url.clone()))?
      .push(entity)
      .push(id);
    Ok(url)
  }
}

impl Directory for ApiClient {
  type Error = ClientError;

  /// `POST /api/query`
  async fn query(&self, query: &QueryDescriptor) -> Result<Vec<Record>, ClientError> {
    let resp = self.client.post(self.url("/query")).json(query).send().await?;
    let status = resp.status();
    if !status.is_success() {
      return Err(ClientError::Status {
        method: "POST",
        path: "/query".to_owned(),
        status,
      });
    }
    Ok(resp.json().await?)
  }

  /// `GET /api/records/{entity}/{id}?id_field=<f>&select=a,b`
  async fn fetch(&self, request: &RecordRequest) -> Result<Option<Record>, ClientError> {
    let url = self.record_url(&request.entity, &request.id)?;
    let path = url.path().to_owned();
    let resp = self
      .client
      .get(url)
      .query(&[
        ("id_field", request.id_field.clone()),
        ("select", request.select.join(",")),
      ])
      .send()
      .await?;

    match resp.status() {
      StatusCode::NOT_FOUND => Ok(None),
      status if status.is_success() => Ok(Some(resp.json().await?)),
      status => Err(ClientError::Status {
        method: "GET",
        path,
        status,
      }),
    }
  }
}

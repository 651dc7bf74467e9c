//! Hosted backend-as-a-service reached over its REST dialect.
//!
//! Each collection is exposed at `{url}/rest/v1/{collection}`; rows are
//! filtered with `id=eq.{id}` and writes ask for the stored rows back via
//! `Prefer: return=representation`.

use async_trait::async_trait;
use serde::Deserialize;

use super::backend::{BackendKind, CollectionBackend, Row};
use super::sanitize::{validate_collection_name, validate_row_keys};

#[derive(Debug, thiserror::Error)]
pub enum RestError {
  #[error("{message}")]
  Server { status: u16, message: String },

  #[error("network: {0}")]
  Network(#[from] reqwest::Error),

  #[error("decode: {0}")]
  Decode(String),
}

/// Error body shape of the REST dialect. Only `message` is surfaced.
#[derive(Debug, Deserialize)]
struct ErrorBody {
  message: Option<String>,
}

/// Pull the human message out of an error response body.
fn error_message(status: u16, body: &str) -> String {
  match serde_json::from_str::<ErrorBody>(body) {
    Ok(ErrorBody { message: Some(m) }) if !m.is_empty() => m,
    _ if body.trim().is_empty() => format!("HTTP {}", status),
    _ => body.trim().to_string(),
  }
}

pub struct RestBackend {
  http: reqwest::Client,
  base_url: String,
  api_key: String,
}

impl RestBackend {
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
    Self {
      http: reqwest::Client::new(),
      base_url: base_url.into().trim_end_matches('/').to_string(),
      api_key: api_key.into(),
    }
  }

  fn collection_url(&self, collection: &str) -> String {
    format!("{}/rest/v1/{}", self.base_url, collection)
  }

  fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    builder
      .header("apikey", &self.api_key)
      .bearer_auth(&self.api_key)
  }

  async fn check(resp: reqwest::Response) -> Result<reqwest::Response, RestError> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let code = status.as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(RestError::Server {
      status: code,
      message: error_message(code, &body),
    })
  }

  async fn rows(resp: reqwest::Response) -> Result<Vec<Row>, RestError> {
    let resp = Self::check(resp).await?;
    resp
      .json::<Vec<Row>>()
      .await
      .map_err(|e| RestError::Decode(format!("response body: {}", e)))
  }
}

#[async_trait]
impl CollectionBackend for RestBackend {
  fn kind(&self) -> BackendKind {
    BackendKind::Rest
  }

  async fn init_schema(&self) -> Result<(), anyhow::Error> {
    tracing::info!(url = %self.base_url, "Hosted backend manages its own schema");
    Ok(())
  }

  async fn select_all(&self, collection: &str) -> Result<Vec<Row>, anyhow::Error> {
    validate_collection_name(collection)?;

    let req = self
      .http
      .get(self.collection_url(collection))
      .query(&[("select", "*"), ("order", "created_at.desc")]);
    let resp = self.authed(req).send().await.map_err(RestError::from)?;
    Ok(Self::rows(resp).await?)
  }

  async fn insert(&self, collection: &str, mut row: Row) -> Result<Option<Row>, anyhow::Error> {
    validate_collection_name(collection)?;
    row.remove("id");
    row.remove("created_at");
    validate_row_keys(row.keys())?;

    let req = self
      .http
      .post(self.collection_url(collection))
      .header("Prefer", "return=representation")
      .json(&[row]);
    let resp = self.authed(req).send().await.map_err(RestError::from)?;
    Ok(Self::rows(resp).await?.into_iter().next())
  }

  async fn update(
    &self,
    collection: &str,
    id: i64,
    mut patch: Row,
  ) -> Result<Option<Row>, anyhow::Error> {
    validate_collection_name(collection)?;
    patch.remove("id");
    patch.remove("created_at");
    validate_row_keys(patch.keys())?;

    let req = self
      .http
      .patch(self.collection_url(collection))
      .query(&[("id", format!("eq.{}", id))])
      .header("Prefer", "return=representation")
      .json(&patch);
    let resp = self.authed(req).send().await.map_err(RestError::from)?;
    Ok(Self::rows(resp).await?.into_iter().next())
  }

  async fn delete(&self, collection: &str, id: i64) -> Result<(), anyhow::Error> {
    validate_collection_name(collection)?;

    let req = self
      .http
      .delete(self.collection_url(collection))
      .query(&[("id", format!("eq.{}", id))]);
    let resp = self.authed(req).send().await.map_err(RestError::from)?;
    Self::check(resp).await?;
    Ok(())
  }
}

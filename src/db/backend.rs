use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One record as it travels to and from a backend.
pub type Row = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
  Rest,
  Postgres,
  Sqlite,
}

impl fmt::Display for BackendKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Rest => "rest",
      Self::Postgres => "postgres",
      Self::Sqlite => "sqlite",
    })
  }
}

/// Four-operation contract the collection stores are built on.
///
/// Every call names its collection; implementations validate the name and
/// all row keys before building a request.
#[async_trait]
pub trait CollectionBackend: Send + Sync {
  fn kind(&self) -> BackendKind;

  /// Create whatever storage the backend needs. Backends that talk to a
  /// hosted service treat this as a no-op.
  async fn init_schema(&self) -> Result<(), anyhow::Error>;

  /// All rows of a collection, newest `created_at` first.
  async fn select_all(&self, collection: &str) -> Result<Vec<Row>, anyhow::Error>;

  /// Insert a row and return it as stored, with `id` and `created_at`
  /// assigned by the backend.
  async fn insert(&self, collection: &str, row: Row) -> Result<Option<Row>, anyhow::Error>;

  /// Merge `patch` into the row with the given id. `None` when no row
  /// matched.
  async fn update(&self, collection: &str, id: i64, patch: Row)
    -> Result<Option<Row>, anyhow::Error>;

  /// Delete by id. Deleting a missing id is not an error.
  async fn delete(&self, collection: &str, id: i64) -> Result<(), anyhow::Error>;
}

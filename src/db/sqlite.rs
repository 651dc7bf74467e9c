use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use tokio_rusqlite::Connection;

use super::backend::{BackendKind, CollectionBackend, Row};
use super::sanitize::{validate_collection_name, validate_row_keys};

const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA cache_size = -16000;
PRAGMA temp_store = MEMORY;
"#;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_records_collection ON records(collection, created_at);
"#;

/// Raw columns of one `records` row: id, data, created_at, updated_at.
type RawRecord = (i64, String, String, String);

/// Local backend keeping every collection as JSON documents in one table.
pub struct SqliteBackend {
  conn: Connection,
}

impl SqliteBackend {
  pub async fn new(path: &str) -> Result<Self, anyhow::Error> {
    let conn = if path == ":memory:" {
      Connection::open_in_memory().await?
    } else {
      Connection::open(path).await?
    };

    conn
      .call(|conn| conn.execute_batch(PRAGMAS).map_err(|e| e.into()))
      .await?;

    Ok(Self { conn })
  }

  pub async fn in_memory() -> Result<Self, anyhow::Error> {
    Self::new(":memory:").await
  }
}

fn now_timestamp() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Split a payload into the document body and its `updated_at`, dropping
/// the keys the table owns.
fn split_payload(mut row: Row) -> Result<(String, String), anyhow::Error> {
  validate_row_keys(row.keys())?;
  row.remove("id");
  row.remove("created_at");
  let updated_at = match row.remove("updated_at") {
    Some(Value::String(s)) => s,
    _ => now_timestamp(),
  };
  Ok((serde_json::to_string(&row)?, updated_at))
}

fn assemble((id, data, created_at, updated_at): RawRecord) -> Result<Row, anyhow::Error> {
  let mut row: Row = serde_json::from_str(&data)?;
  row.insert("id".into(), Value::from(id));
  row.insert("created_at".into(), Value::String(created_at));
  row.insert("updated_at".into(), Value::String(updated_at));
  Ok(row)
}

fn read_raw(row: &rusqlite::Row) -> Result<RawRecord, rusqlite::Error> {
  Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

#[async_trait]
impl CollectionBackend for SqliteBackend {
  fn kind(&self) -> BackendKind {
    BackendKind::Sqlite
  }

  async fn init_schema(&self) -> Result<(), anyhow::Error> {
    self
      .conn
      .call(|conn| conn.execute_batch(SCHEMA).map_err(|e| e.into()))
      .await?;
    tracing::info!("SQLite schema initialized");
    Ok(())
  }

  async fn select_all(&self, collection: &str) -> Result<Vec<Row>, anyhow::Error> {
    validate_collection_name(collection)?;
    let col = collection.to_string();

    let raw = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT id, data, created_at, updated_at FROM records
           WHERE collection = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt
          .query_map(params![col], read_raw)?
          .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;

    raw.into_iter().map(assemble).collect()
  }

  async fn insert(&self, collection: &str, row: Row) -> Result<Option<Row>, anyhow::Error> {
    validate_collection_name(collection)?;
    let (data, updated_at) = split_payload(row)?;
    let col = collection.to_string();
    let created_at = now_timestamp();

    let id = self
      .conn
      .call({
        let data = data.clone();
        let created_at = created_at.clone();
        let updated_at = updated_at.clone();
        move |conn| {
          conn.execute(
            "INSERT INTO records (collection, data, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![col, data, created_at, updated_at],
          )?;
          Ok(conn.last_insert_rowid())
        }
      })
      .await?;

    assemble((id, data, created_at, updated_at)).map(Some)
  }

  async fn update(
    &self,
    collection: &str,
    id: i64,
    patch: Row,
  ) -> Result<Option<Row>, anyhow::Error> {
    validate_collection_name(collection)?;
    let (data, updated_at) = split_payload(patch)?;
    let col = collection.to_string();

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE records SET data = json_patch(data, ?1), updated_at = ?2
           WHERE collection = ?3 AND id = ?4",
          params![data, updated_at, col, id],
        )?;
        if changed == 0 {
          return Ok(None);
        }

        let mut stmt = conn.prepare_cached(
          "SELECT id, data, created_at, updated_at FROM records WHERE id = ?1",
        )?;
        Ok(stmt.query_row(params![id], read_raw).optional()?)
      })
      .await?;

    raw.map(assemble).transpose()
  }

  async fn delete(&self, collection: &str, id: i64) -> Result<(), anyhow::Error> {
    validate_collection_name(collection)?;
    let col = collection.to_string();

    let removed = self
      .conn
      .call(move |conn| {
        conn
          .execute(
            "DELETE FROM records WHERE collection = ?1 AND id = ?2",
            params![col, id],
          )
          .map_err(|e| e.into())
      })
      .await?;
    tracing::debug!(collection, id, removed, "Deleted row");
    Ok(())
  }
}

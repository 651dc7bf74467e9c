use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use serde_json::Value;
use tokio_postgres::NoTls;

use super::backend::{BackendKind, CollectionBackend, Row};
use super::sanitize::{validate_known_collection, validate_row_keys};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    contact_person TEXT,
    address TEXT,
    email TEXT,
    phone TEXT,
    segment TEXT,
    status INTEGER DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS employees (
    id BIGSERIAL PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT,
    department TEXT,
    phone TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS projects (
    id BIGSERIAL PRIMARY KEY,
    project_number TEXT NOT NULL,
    customer_name TEXT NOT NULL,
    start_date DATE NOT NULL,
    status TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS vendors (
    id BIGSERIAL PRIMARY KEY,
    vendor_no TEXT NOT NULL,
    vendor_name TEXT NOT NULL,
    vendor_type INTEGER,
    contact_person TEXT,
    contact_phone TEXT,
    contact_email TEXT,
    payment TEXT,
    status INTEGER DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS purchase_orders (
    id BIGSERIAL PRIMARY KEY,
    project_id BIGINT NOT NULL,
    vendor_id BIGINT NOT NULL,
    project_no TEXT,
    vendor_name TEXT,
    cost_type TEXT,
    amount DOUBLE PRECISION NOT NULL,
    currency TEXT,
    status INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS invoices (
    id BIGSERIAL PRIMARY KEY,
    invoice_no TEXT NOT NULL,
    project_id BIGINT NOT NULL,
    project_no TEXT,
    amount DOUBLE PRECISION NOT NULL,
    currency TEXT,
    invoice_date DATE NOT NULL,
    status TEXT,
    due_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

/// One real table per managed collection, rows exchanged as `jsonb`.
///
/// Only the six entity collections have tables, so other names are
/// rejected before any SQL is built.
pub struct PostgresBackend {
  pool: Pool,
}

impl PostgresBackend {
  pub fn new(url: &str, max_connections: usize) -> Result<Self, anyhow::Error> {
    let mut cfg = Config::new();
    cfg.url = Some(url.into());
    cfg.manager = Some(ManagerConfig {
      recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(max_connections.max(1)));
    let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;
    Ok(Self { pool })
  }
}

/// Validated, quoted column list of a payload.
fn columns(row: &Row) -> Result<Vec<String>, anyhow::Error> {
  validate_row_keys(row.keys())?;
  Ok(row.keys().map(|k| format!("\"{}\"", k)).collect())
}

fn into_row(value: Value) -> Result<Row, anyhow::Error> {
  match value {
    Value::Object(map) => Ok(map),
    other => anyhow::bail!("Expected a JSON object row, got {}", other),
  }
}

fn insert_sql(collection: &str, cols: &[String]) -> String {
  if cols.is_empty() {
    return format!(
      "INSERT INTO \"{0}\" AS t DEFAULT VALUES RETURNING to_jsonb(t)",
      collection
    );
  }
  let list = cols.join(", ");
  format!(
    "INSERT INTO \"{0}\" AS t ({1}) SELECT {1} FROM jsonb_populate_record(NULL::\"{0}\", $1::jsonb) RETURNING to_jsonb(t)",
    collection, list
  )
}

fn update_sql(collection: &str, cols: &[String]) -> String {
  let assignments = cols
    .iter()
    .map(|c| format!("{0} = r.{0}", c))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "UPDATE \"{0}\" AS t SET {1} FROM jsonb_populate_record(NULL::\"{0}\", $1::jsonb) AS r WHERE t.id = $2::bigint RETURNING to_jsonb(t)",
    collection, assignments
  )
}

#[async_trait]
impl CollectionBackend for PostgresBackend {
  fn kind(&self) -> BackendKind {
    BackendKind::Postgres
  }

  async fn init_schema(&self) -> Result<(), anyhow::Error> {
    self.pool.get().await?.batch_execute(SCHEMA).await?;
    tracing::info!("PostgreSQL schema initialized");
    Ok(())
  }

  async fn select_all(&self, collection: &str) -> Result<Vec<Row>, anyhow::Error> {
    validate_known_collection(collection)?;

    let sql = format!(
      "SELECT to_jsonb(t) FROM \"{}\" AS t ORDER BY t.created_at DESC, t.id DESC",
      collection
    );
    let rows = self.pool.get().await?.query(&sql, &[]).await?;
    rows
      .into_iter()
      .map(|r| into_row(r.try_get::<_, Value>(0)?))
      .collect()
  }

  async fn insert(&self, collection: &str, mut row: Row) -> Result<Option<Row>, anyhow::Error> {
    validate_known_collection(collection)?;
    row.remove("id");
    row.remove("created_at");
    let cols = columns(&row)?;

    let sql = insert_sql(collection, &cols);
    let client = self.pool.get().await?;
    let returned = if cols.is_empty() {
      client.query_opt(&sql, &[]).await?
    } else {
      let payload = Value::Object(row);
      client.query_opt(&sql, &[&payload]).await?
    };
    returned
      .map(|r| into_row(r.try_get::<_, Value>(0)?))
      .transpose()
  }

  async fn update(
    &self,
    collection: &str,
    id: i64,
    mut patch: Row,
  ) -> Result<Option<Row>, anyhow::Error> {
    validate_known_collection(collection)?;
    patch.remove("id");
    patch.remove("created_at");
    let cols = columns(&patch)?;

    let client = self.pool.get().await?;
    let returned = if cols.is_empty() {
      let sql = format!("SELECT to_jsonb(t) FROM \"{}\" AS t WHERE t.id = $1::bigint", collection);
      client.query_opt(&sql, &[&id]).await?
    } else {
      let payload = Value::Object(patch);
      client
        .query_opt(&update_sql(collection, &cols), &[&payload, &id])
        .await?
    };
    returned
      .map(|r| into_row(r.try_get::<_, Value>(0)?))
      .transpose()
  }

  async fn delete(&self, collection: &str, id: i64) -> Result<(), anyhow::Error> {
    validate_known_collection(collection)?;

    let sql = format!("DELETE FROM \"{}\" WHERE id = $1::bigint", collection);
    let removed = self.pool.get().await?.execute(&sql, &[&id]).await?;
    tracing::debug!(collection, id, removed, "Deleted row");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_insert_sql() {
    let cols = vec!["\"name\"".to_string(), "\"email\"".to_string()];
    assert_eq!(
      insert_sql("customers", &cols),
      "INSERT INTO \"customers\" AS t (\"name\", \"email\") SELECT \"name\", \"email\" \
       FROM jsonb_populate_record(NULL::\"customers\", $1::jsonb) RETURNING to_jsonb(t)"
    );
    assert_eq!(
      insert_sql("customers", &[]),
      "INSERT INTO \"customers\" AS t DEFAULT VALUES RETURNING to_jsonb(t)"
    );
  }

  #[test]
  fn test_update_sql_only_sets_given_columns() {
    let cols = vec!["\"status\"".to_string(), "\"updated_at\"".to_string()];
    assert_eq!(
      update_sql("invoices", &cols),
      "UPDATE \"invoices\" AS t SET \"status\" = r.\"status\", \"updated_at\" = r.\"updated_at\" \
       FROM jsonb_populate_record(NULL::\"invoices\", $1::jsonb) AS r WHERE t.id = $2::bigint \
       RETURNING to_jsonb(t)"
    );
  }

  #[test]
  fn test_columns_rejects_injection() {
    let mut row = Row::new();
    row.insert("name\"; DROP TABLE customers; --".into(), Value::Null);
    assert!(columns(&row).is_err());
  }
}

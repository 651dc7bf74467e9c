use serde_json::{json, Value};
use erpdesk::db::{BackendKind, CollectionBackend, Row, SqliteBackend};

fn row(value: Value) -> Row {
  value.as_object().cloned().unwrap()
}

async fn backend() -> SqliteBackend {
  let backend = SqliteBackend::in_memory().await.unwrap();
  backend.init_schema().await.unwrap();
  backend
}

#[tokio::test]
async fn test_sqlite_backend_init_schema() {
  let backend = SqliteBackend::in_memory().await.unwrap();
  backend.init_schema().await.unwrap();
  // Should not panic on re-init
  backend.init_schema().await.unwrap();
}

#[tokio::test]
async fn test_sqlite_backend_kind() {
  let backend = SqliteBackend::in_memory().await.unwrap();
  assert_eq!(backend.kind(), BackendKind::Sqlite);
}

#[tokio::test]
async fn test_sqlite_backend_insert_assigns_system_fields() {
  let backend = backend().await;

  let stored = backend
    .insert(
      "customers",
      row(json!({"id": 999, "name": "Alice", "status": 1, "created_at": "1999-01-01"})),
    )
    .await
    .unwrap()
    .unwrap();

  assert_eq!(stored["name"], "Alice");
  assert_eq!(stored["status"], 1);
  let id = stored["id"].as_i64().unwrap();
  assert_ne!(id, 999);
  assert_ne!(stored["created_at"], "1999-01-01");
  assert!(stored["updated_at"].is_string());
}

#[tokio::test]
async fn test_sqlite_backend_keeps_given_updated_at() {
  let backend = backend().await;
  let stored = backend
    .insert(
      "vendors",
      row(json!({"vendor_name": "Steelworks", "updated_at": "2024-05-01T10:00:00.000Z"})),
    )
    .await
    .unwrap()
    .unwrap();
  assert_eq!(stored["updated_at"], "2024-05-01T10:00:00.000Z");
}

#[tokio::test]
async fn test_sqlite_backend_select_newest_first() {
  let backend = backend().await;
  for name in ["first", "second", "third"] {
    backend
      .insert("customers", row(json!({"name": name})))
      .await
      .unwrap();
  }

  let rows = backend.select_all("customers").await.unwrap();
  let names: Vec<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
  assert_eq!(names, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_sqlite_backend_collections_are_isolated() {
  let backend = backend().await;
  backend
    .insert("customers", row(json!({"name": "Acme"})))
    .await
    .unwrap();
  backend
    .insert("vendors", row(json!({"vendor_name": "Steelworks"})))
    .await
    .unwrap();

  assert_eq!(backend.select_all("customers").await.unwrap().len(), 1);
  assert_eq!(backend.select_all("vendors").await.unwrap().len(), 1);
  assert!(backend.select_all("invoices").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sqlite_backend_update_merges() {
  let backend = backend().await;

  let stored = backend
    .insert("employees", row(json!({"first_name": "Bob", "department": "Ops"})))
    .await
    .unwrap()
    .unwrap();
  let id = stored["id"].as_i64().unwrap();

  let updated = backend
    .update("employees", id, row(json!({"department": "Finance"})))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated["first_name"], "Bob");
  assert_eq!(updated["department"], "Finance");
  assert_eq!(updated["created_at"], stored["created_at"]);
}

#[tokio::test]
async fn test_sqlite_backend_update_missing() {
  let backend = backend().await;
  let result = backend
    .update("employees", 12345, row(json!({"department": "Finance"})))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn test_sqlite_backend_update_scoped_to_collection() {
  let backend = backend().await;
  let stored = backend
    .insert("customers", row(json!({"name": "Acme"})))
    .await
    .unwrap()
    .unwrap();
  let id = stored["id"].as_i64().unwrap();

  let result = backend
    .update("vendors", id, row(json!({"vendor_name": "Nope"})))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn test_sqlite_backend_delete() {
  let backend = backend().await;

  let stored = backend
    .insert("projects", row(json!({"project_number": "P-100"})))
    .await
    .unwrap()
    .unwrap();
  let id = stored["id"].as_i64().unwrap();

  backend.delete("projects", id).await.unwrap();
  assert!(backend.select_all("projects").await.unwrap().is_empty());

  // Deleting again is not an error
  backend.delete("projects", id).await.unwrap();
}

#[tokio::test]
async fn test_sqlite_backend_rejects_bad_names() {
  let backend = backend().await;

  assert!(backend.select_all("Customers").await.is_err());
  assert!(backend.select_all("customers; DROP TABLE records").await.is_err());
  assert!(backend
    .insert("customers", row(json!({"name; --": "x"})))
    .await
    .is_err());
  assert!(backend.select_all("customers").await.unwrap().is_empty());
}

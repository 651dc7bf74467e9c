use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error::{Operation, StoreError};
use crate::db::{CollectionBackend, Row};
use crate::types::{Entity, SYSTEM_FIELDS};

/// Point-in-time copy of a store's observable state.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot<T> {
  pub data: Vec<T>,
  pub loading: bool,
  pub error: Option<String>,
}

struct StoreState<T> {
  data: Vec<T>,
  error: Option<String>,
  in_flight: usize,
  settled: bool,
}

/// Cached copy of one remote collection.
///
/// Every successful mutation is followed by a full re-fetch, so the cache
/// only ever holds what the backend last returned. Readers get clones;
/// the cache itself is never handed out.
pub struct CollectionStore<T> {
  backend: Arc<dyn CollectionBackend>,
  collection: RwLock<String>,
  state: RwLock<StoreState<T>>,
  /// Collection name the first fetch has run for
  loaded: tokio::sync::Mutex<Option<String>>,
  _marker: PhantomData<fn() -> T>,
}

fn now_timestamp() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serialize a caller payload into a row, replacing the system fields
/// with a fresh `updated_at`.
fn prepare_payload<I: Serialize + ?Sized>(item: &I) -> Result<Row, StoreError> {
  let mut row = match serde_json::to_value(item) {
    Ok(Value::Object(map)) => map,
    Ok(other) => return Err(StoreError::Encode(format!("expected a JSON object, got {}", other))),
    Err(e) => return Err(StoreError::Encode(e.to_string())),
  };
  for key in SYSTEM_FIELDS {
    row.remove(*key);
  }
  row.insert("updated_at".into(), Value::String(now_timestamp()));
  Ok(row)
}

impl<T: Entity> CollectionStore<T> {
  /// Store bound to the entity's own collection.
  pub fn for_entity(backend: Arc<dyn CollectionBackend>) -> Self {
    Self::new(backend, T::COLLECTION)
  }
}

impl<T> CollectionStore<T>
where
  T: DeserializeOwned + Clone + Send + Sync,
{
  pub fn new(backend: Arc<dyn CollectionBackend>, collection: impl Into<String>) -> Self {
    Self {
      backend,
      collection: RwLock::new(collection.into()),
      state: RwLock::new(StoreState {
        data: Vec::new(),
        error: None,
        in_flight: 0,
        settled: false,
      }),
      loaded: tokio::sync::Mutex::new(None),
      _marker: PhantomData,
    }
  }

  pub fn collection(&self) -> String {
    self.collection.read().clone()
  }

  pub fn snapshot(&self) -> StoreSnapshot<T> {
    let state = self.state.read();
    StoreSnapshot {
      data: state.data.clone(),
      loading: state.in_flight > 0 || !state.settled,
      error: state.error.clone(),
    }
  }

  pub fn data(&self) -> Vec<T> {
    self.state.read().data.clone()
  }

  /// True while a fetch is in flight, and until the first one settles.
  pub fn is_loading(&self) -> bool {
    let state = self.state.read();
    state.in_flight > 0 || !state.settled
  }

  pub fn error(&self) -> Option<String> {
    self.state.read().error.clone()
  }

  fn decode(&self, collection: &str, row: Row) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(row)).map_err(|source| StoreError::Decode {
      collection: collection.to_string(),
      source,
    })
  }

  /// Reject a create payload that would not read back as `T` once the
  /// backend has assigned `id` and `created_at`.
  fn check_insertable(&self, row: &Row) -> Result<(), StoreError> {
    let mut candidate = row.clone();
    candidate.insert("id".into(), Value::from(0));
    candidate.insert("created_at".into(), Value::String(now_timestamp()));
    serde_json::from_value::<T>(Value::Object(candidate))
      .map(|_| ())
      .map_err(|e| StoreError::Encode(e.to_string()))
  }

  async fn load(&self, collection: &str) -> Result<Vec<T>, StoreError> {
    let rows = self
      .backend
      .select_all(collection)
      .await
      .map_err(|e| StoreError::backend(Operation::Fetch, &e))?;
    rows
      .into_iter()
      .map(|row| self.decode(collection, row))
      .collect()
  }

  /// Load the whole collection and replace the cache.
  ///
  /// On failure the previous cache is kept and the error is recorded. A
  /// result for a collection the store has since moved away from is
  /// discarded.
  pub async fn fetch(&self) -> Result<(), StoreError> {
    let collection = self.collection();
    self.state.write().in_flight += 1;
    tracing::debug!(collection = %collection, "Fetching collection");

    let result = self.load(&collection).await;
    let current = self.collection();

    let mut state = self.state.write();
    state.in_flight = state.in_flight.saturating_sub(1);
    state.settled = true;
    if current != collection {
      tracing::debug!(collection = %collection, "Discarding fetch for stale collection");
      return result.map(|_| ());
    }

    match result {
      Ok(data) => {
        tracing::debug!(collection = %collection, rows = data.len(), "Collection fetched");
        state.data = data;
        state.error = None;
        Ok(())
      }
      Err(e) => {
        tracing::warn!(collection = %collection, "Fetch failed: {}", e);
        state.error = Some(e.to_string());
        Err(e)
      }
    }
  }

  pub async fn refresh(&self) -> Result<(), StoreError> {
    self.fetch().await
  }

  /// Run the first fetch for the current collection exactly once, even
  /// when called concurrently.
  pub async fn ensure_loaded(&self) -> Result<(), StoreError> {
    let mut loaded = self.loaded.lock().await;
    let collection = self.collection();
    if loaded.as_deref() == Some(collection.as_str()) {
      return Ok(());
    }
    *loaded = Some(collection);
    self.fetch().await
  }

  /// Point the store at another collection and load it.
  pub async fn set_collection(&self, collection: impl Into<String>) -> Result<(), StoreError> {
    let collection = collection.into();
    let changed = {
      let mut current = self.collection.write();
      if *current == collection {
        false
      } else {
        *current = collection;
        true
      }
    };
    if changed {
      let mut state = self.state.write();
      state.data.clear();
      state.error = None;
    }
    self.ensure_loaded().await
  }

  /// Re-fetch after a successful mutation. A failure here is recorded in
  /// the store state but does not fail the mutation.
  async fn converge(&self, operation: Operation) {
    if let Err(e) = self.fetch().await {
      tracing::warn!(%operation, "Refresh after mutation failed: {}", e);
    }
  }

  /// Insert a record and return it as stored by the backend.
  pub async fn create<I: Serialize + ?Sized>(&self, item: &I) -> Result<T, StoreError> {
    let collection = self.collection();
    let row = prepare_payload(item)?;
    self.check_insertable(&row)?;

    let created = match self.backend.insert(&collection, row).await {
      Ok(Some(row)) => row,
      Ok(None) => return Err(StoreError::Empty(Operation::Create)),
      Err(e) => {
        tracing::warn!(collection = %collection, "Create failed: {}", e);
        return Err(StoreError::backend(Operation::Create, &e));
      }
    };
    tracing::info!(collection = %collection, id = ?created.get("id"), "Record created");

    self.converge(Operation::Create).await;
    self.decode(&collection, created)
  }

  /// Apply a partial change to the record with `id`.
  ///
  /// Returns the updated record when the backend sent one back.
  pub async fn update<I: Serialize + ?Sized>(
    &self,
    id: i64,
    changes: &I,
  ) -> Result<Option<T>, StoreError> {
    let collection = self.collection();
    let patch = prepare_payload(changes)?;

    let updated = match self.backend.update(&collection, id, patch).await {
      Ok(row) => row,
      Err(e) => {
        tracing::warn!(collection = %collection, id, "Update failed: {}", e);
        return Err(StoreError::backend(Operation::Update, &e));
      }
    };
    tracing::info!(collection = %collection, id, "Record updated");

    self.converge(Operation::Update).await;
    updated.map(|row| self.decode(&collection, row)).transpose()
  }

  pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
    let collection = self.collection();

    if let Err(e) = self.backend.delete(&collection, id).await {
      tracing::warn!(collection = %collection, id, "Delete failed: {}", e);
      return Err(StoreError::backend(Operation::Delete, &e));
    }
    tracing::info!(collection = %collection, id, "Record deleted");

    self.converge(Operation::Delete).await;
    Ok(())
  }
}

use std::sync::Arc;

use async_trait::async_trait;
use colored::Colorize;
use serde_json::Value;

use super::render::{render_table, RenderContext, TableRow};
use crate::db::CollectionBackend;
use crate::query::{ListQuery, QueryError, SortState};
use crate::store::{CollectionStore, StoreError};
use crate::types::{Customer, Employee, Entity, EntityKind, Invoice, Project, PurchaseOrder, Vendor};

/// One entity page: its own store plus the list view state.
#[async_trait]
pub trait PageView: Send + Sync {
  fn kind(&self) -> EntityKind;

  /// First visit loads the collection; later visits reuse the cache.
  async fn open(&self) -> Result<(), StoreError>;

  async fn refresh(&self) -> Result<(), StoreError>;

  fn set_search(&mut self, term: &str);

  fn sort(&self) -> SortState;

  fn select_sort(&mut self, field: &str) -> Result<SortState, QueryError>;

  fn set_sort(&mut self, sort: SortState) -> Result<SortState, QueryError>;

  fn render(&self, ctx: &RenderContext) -> String;

  /// Label of a cached record, for confirmations.
  fn describe(&self, id: i64) -> Option<String>;

  async fn create(&self, payload: &Value) -> Result<String, StoreError>;

  async fn update(&self, id: i64, payload: &Value) -> Result<Option<String>, StoreError>;

  async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

pub struct EntityPage<T> {
  store: CollectionStore<T>,
  query: ListQuery,
}

impl<T: TableRow> EntityPage<T> {
  pub fn new(backend: Arc<dyn CollectionBackend>) -> Self {
    Self {
      store: CollectionStore::for_entity(backend),
      query: ListQuery::new(T::LIST),
    }
  }

  pub fn store(&self) -> &CollectionStore<T> {
    &self.store
  }

  pub fn query(&self) -> &ListQuery {
    &self.query
  }

  /// The rows the table shows right now.
  pub fn visible(&self) -> Vec<T> {
    self.query.apply(&self.store.data())
  }
}

#[async_trait]
impl<T: TableRow> PageView for EntityPage<T> {
  fn kind(&self) -> EntityKind {
    T::KIND
  }

  async fn open(&self) -> Result<(), StoreError> {
    self.store.ensure_loaded().await
  }

  async fn refresh(&self) -> Result<(), StoreError> {
    self.store.refresh().await
  }

  fn set_search(&mut self, term: &str) {
    self.query.set_search(term);
  }

  fn sort(&self) -> SortState {
    self.query.sort().clone()
  }

  fn select_sort(&mut self, field: &str) -> Result<SortState, QueryError> {
    self.query.select_sort(field).cloned()
  }

  fn set_sort(&mut self, sort: SortState) -> Result<SortState, QueryError> {
    self.query.set_sort(sort).cloned()
  }

  fn render(&self, ctx: &RenderContext) -> String {
    let snapshot = self.store.snapshot();
    if let Some(error) = snapshot.error {
      return format!("{} {}", "Error:".red().bold(), error);
    }
    if snapshot.loading && snapshot.data.is_empty() {
      return "Loading...".dimmed().to_string();
    }
    let rows = self.query.apply(&snapshot.data);
    render_table(&rows, &self.query, ctx)
  }

  fn describe(&self, id: i64) -> Option<String> {
    self
      .store
      .data()
      .iter()
      .find(|r| r.id() == id)
      .map(Entity::describe)
  }

  async fn create(&self, payload: &Value) -> Result<String, StoreError> {
    let created = self.store.create(payload).await?;
    Ok(created.describe())
  }

  async fn update(&self, id: i64, payload: &Value) -> Result<Option<String>, StoreError> {
    let updated = self.store.update(id, payload).await?;
    Ok(updated.map(|r| r.describe()))
  }

  async fn delete(&self, id: i64) -> Result<(), StoreError> {
    self.store.delete(id).await
  }
}

/// Build the page for an entity kind.
pub fn page_for(kind: EntityKind, backend: Arc<dyn CollectionBackend>) -> Box<dyn PageView> {
  match kind {
    EntityKind::Customers => Box::new(EntityPage::<Customer>::new(backend)),
    EntityKind::Employees => Box::new(EntityPage::<Employee>::new(backend)),
    EntityKind::Projects => Box::new(EntityPage::<Project>::new(backend)),
    EntityKind::Vendors => Box::new(EntityPage::<Vendor>::new(backend)),
    EntityKind::PurchaseOrders => Box::new(EntityPage::<PurchaseOrder>::new(backend)),
    EntityKind::Invoices => Box::new(EntityPage::<Invoice>::new(backend)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::SqliteBackend;
  use crate::display::Locale;
  use chrono::NaiveDate;
  use serde_json::json;

  fn ctx() -> RenderContext {
    RenderContext {
      today: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      currency: "CAD".to_string(),
      locale: Locale::EnCa,
    }
  }

  async fn sqlite() -> Arc<dyn CollectionBackend> {
    let backend = SqliteBackend::in_memory().await.unwrap();
    backend.init_schema().await.unwrap();
    Arc::new(backend)
  }

  #[test]
  fn test_page_lifecycle() {
    tokio_test::block_on(async {
      let mut page = EntityPage::<Customer>::new(sqlite().await);
      assert!(page.render(&ctx()).contains("Loading..."));

      page.open().await.unwrap();
      assert!(page.render(&ctx()).contains("No customers registered yet"));

      page.create(&json!({"name": "Acme"})).await.unwrap();
      let label = page.create(&json!({"name": "Globex"})).await.unwrap();
      assert_eq!(label, "Globex");

      page.set_search("glo");
      let visible = page.visible();
      assert_eq!(visible.len(), 1);
      assert_eq!(page.describe(visible[0].id).as_deref(), Some("Globex"));

      let table = page.render(&ctx());
      assert!(table.contains("Globex"));
      assert!(!table.contains("Acme"));
    });
  }

  #[test]
  fn test_page_for_kinds() {
    tokio_test::block_on(async {
      let backend = sqlite().await;
      for kind in EntityKind::ALL {
        assert_eq!(page_for(kind, backend.clone()).kind(), kind);
      }
    });
  }

  #[test]
  fn test_sort_rejects_unsortable() {
    tokio_test::block_on(async {
      let mut page = page_for(EntityKind::PurchaseOrders, sqlite().await);
      assert!(page.select_sort("vendor_name").is_err());
      assert_eq!(page.select_sort("amount").unwrap().field, "amount");
    });
  }
}

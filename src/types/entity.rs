use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::query::{Fields, ListSpec};

/// Keys owned by the backend or the store, never taken from caller payloads.
pub const SYSTEM_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

/// A record type stored in one remote collection.
pub trait Entity: Fields + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
  /// Remote collection name
  const COLLECTION: &'static str;
  /// Search and sort configuration of the list view
  const LIST: ListSpec;

  fn id(&self) -> i64;

  /// Short human label, used in delete confirmations
  fn describe(&self) -> String;
}

/// The six collections managed by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
  Customers,
  Employees,
  Projects,
  Vendors,
  PurchaseOrders,
  Invoices,
}

impl EntityKind {
  pub const ALL: [EntityKind; 6] = [
    Self::Customers,
    Self::Employees,
    Self::Projects,
    Self::Vendors,
    Self::PurchaseOrders,
    Self::Invoices,
  ];

  pub fn collection(self) -> &'static str {
    match self {
      Self::Customers => "customers",
      Self::Employees => "employees",
      Self::Projects => "projects",
      Self::Vendors => "vendors",
      Self::PurchaseOrders => "purchase_orders",
      Self::Invoices => "invoices",
    }
  }

  /// Route path of the entity page
  pub fn path(self) -> &'static str {
    match self {
      Self::Customers => "/customers",
      Self::Employees => "/employees",
      Self::Projects => "/projects",
      Self::Vendors => "/vendors",
      Self::PurchaseOrders => "/purchase-orders",
      Self::Invoices => "/invoices",
    }
  }

  /// Plural noun used in table footers
  pub fn noun(self) -> &'static str {
    match self {
      Self::Customers => "customers",
      Self::Employees => "employees",
      Self::Projects => "projects",
      Self::Vendors => "vendors",
      Self::PurchaseOrders => "purchase orders",
      Self::Invoices => "invoices",
    }
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.collection())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity '{0}' (expected one of: customers, employees, projects, vendors, purchase_orders, invoices)")]
pub struct UnknownEntity(pub String);

impl FromStr for EntityKind {
  type Err = UnknownEntity;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().replace('-', "_").as_str() {
      "customers" | "customer" => Ok(Self::Customers),
      "employees" | "employee" => Ok(Self::Employees),
      "projects" | "project" => Ok(Self::Projects),
      "vendors" | "vendor" => Ok(Self::Vendors),
      "purchase_orders" | "purchase_order" | "po" => Ok(Self::PurchaseOrders),
      "invoices" | "invoice" => Ok(Self::Invoices),
      _ => Err(UnknownEntity(s.to_string())),
    }
  }
}

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::display::PurchaseOrderStatus;
use crate::query::{Fields, ListSpec, SortDirection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
  pub id: i64,
  pub project_id: i64,
  pub vendor_id: i64,
  /// Denormalized project number
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project_no: Option<String>,
  /// Denormalized vendor name
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub vendor_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cost_type: Option<String>,
  pub amount: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub currency: Option<String>,
  /// 0 cancelled, 1 received, 2 ordered, 3 under review
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<String>,
}

impl PurchaseOrder {
  pub fn status(&self) -> PurchaseOrderStatus {
    PurchaseOrderStatus::from_optional(self.status)
  }
}

impl Fields for PurchaseOrder {
  fn field(&self, name: &str) -> Option<Cow<'_, str>> {
    match name {
      "id" => Some(Cow::Owned(self.id.to_string())),
      "project_id" => Some(Cow::Owned(self.project_id.to_string())),
      "vendor_id" => Some(Cow::Owned(self.vendor_id.to_string())),
      "project_no" => self.project_no.as_deref().map(Cow::Borrowed),
      "vendor_name" => self.vendor_name.as_deref().map(Cow::Borrowed),
      "cost_type" => self.cost_type.as_deref().map(Cow::Borrowed),
      "amount" => Some(Cow::Owned(self.amount.to_string())),
      "currency" => self.currency.as_deref().map(Cow::Borrowed),
      "status" => self.status.map(|s| Cow::Owned(s.to_string())),
      "created_at" => self.created_at.as_deref().map(Cow::Borrowed),
      "updated_at" => self.updated_at.as_deref().map(Cow::Borrowed),
      _ => None,
    }
  }
}

impl Entity for PurchaseOrder {
  const COLLECTION: &'static str = "purchase_orders";
  const LIST: ListSpec = ListSpec {
    searchable: &["project_no", "vendor_name", "cost_type"],
    sortable: &["amount", "created_at"],
    default_field: "created_at",
    default_direction: SortDirection::Desc,
  };

  fn id(&self) -> i64 {
    self.id
  }

  fn describe(&self) -> String {
    format!("PO #{}", self.id)
  }
}

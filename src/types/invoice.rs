use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::display;
use crate::query::{Fields, ListSpec, SortDirection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
  pub id: i64,
  pub invoice_no: String,
  pub project_id: i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project_no: Option<String>,
  pub amount: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub currency: Option<String>,
  pub invoice_date: String,
  /// Paid, Pending, Overdue or Cancelled; absent reads as Pending
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  pub due_date: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<String>,
}

impl Invoice {
  pub fn status_label(&self) -> &str {
    self.status.as_deref().unwrap_or(display::DEFAULT_INVOICE_STATUS)
  }

  pub fn is_overdue(&self, today: NaiveDate) -> bool {
    display::is_overdue(self.status.as_deref(), &self.due_date, today)
  }
}

impl Fields for Invoice {
  fn field(&self, name: &str) -> Option<Cow<'_, str>> {
    match name {
      "id" => Some(Cow::Owned(self.id.to_string())),
      "invoice_no" => Some(Cow::Borrowed(self.invoice_no.as_str())),
      "project_id" => Some(Cow::Owned(self.project_id.to_string())),
      "project_no" => self.project_no.as_deref().map(Cow::Borrowed),
      "amount" => Some(Cow::Owned(self.amount.to_string())),
      "currency" => self.currency.as_deref().map(Cow::Borrowed),
      "invoice_date" => Some(Cow::Borrowed(self.invoice_date.as_str())),
      "status" => self.status.as_deref().map(Cow::Borrowed),
      "due_date" => Some(Cow::Borrowed(self.due_date.as_str())),
      "created_at" => self.created_at.as_deref().map(Cow::Borrowed),
      "updated_at" => self.updated_at.as_deref().map(Cow::Borrowed),
      _ => None,
    }
  }
}

impl Entity for Invoice {
  const COLLECTION: &'static str = "invoices";
  const LIST: ListSpec = ListSpec {
    searchable: &["invoice_no", "project_no"],
    sortable: &["invoice_no", "amount", "invoice_date", "due_date"],
    default_field: "invoice_date",
    default_direction: SortDirection::Desc,
  };

  fn id(&self) -> i64 {
    self.id
  }

  fn describe(&self) -> String {
    self.invoice_no.clone()
  }
}

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::query::{Fields, ListSpec, SortDirection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
  pub id: i64,
  pub project_number: String,
  /// Denormalized customer display name
  pub customer_name: String,
  pub start_date: String,
  /// Free-form label; absent reads as "Active"
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<String>,
}

impl Fields for Project {
  fn field(&self, name: &str) -> Option<Cow<'_, str>> {
    match name {
      "id" => Some(Cow::Owned(self.id.to_string())),
      "project_number" => Some(Cow::Borrowed(self.project_number.as_str())),
      "customer_name" => Some(Cow::Borrowed(self.customer_name.as_str())),
      "start_date" => Some(Cow::Borrowed(self.start_date.as_str())),
      "status" => self.status.as_deref().map(Cow::Borrowed),
      "created_at" => self.created_at.as_deref().map(Cow::Borrowed),
      "updated_at" => self.updated_at.as_deref().map(Cow::Borrowed),
      _ => None,
    }
  }
}

impl Entity for Project {
  const COLLECTION: &'static str = "projects";
  const LIST: ListSpec = ListSpec {
    searchable: &["project_number", "customer_name"],
    sortable: &["project_number", "customer_name", "start_date", "status", "created_at"],
    default_field: "project_number",
    default_direction: SortDirection::Asc,
  };

  fn id(&self) -> i64 {
    self.id
  }

  fn describe(&self) -> String {
    self.project_number.clone()
  }
}

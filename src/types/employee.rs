use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::query::{Fields, ListSpec, SortDirection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
  pub id: i64,
  pub first_name: String,
  pub last_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub department: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<String>,
}

impl Employee {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

impl Fields for Employee {
  fn field(&self, name: &str) -> Option<Cow<'_, str>> {
    match name {
      "id" => Some(Cow::Owned(self.id.to_string())),
      "first_name" => Some(Cow::Borrowed(self.first_name.as_str())),
      "last_name" => Some(Cow::Borrowed(self.last_name.as_str())),
      "email" => self.email.as_deref().map(Cow::Borrowed),
      "department" => self.department.as_deref().map(Cow::Borrowed),
      "phone" => self.phone.as_deref().map(Cow::Borrowed),
      "created_at" => self.created_at.as_deref().map(Cow::Borrowed),
      "updated_at" => self.updated_at.as_deref().map(Cow::Borrowed),
      _ => None,
    }
  }
}

impl Entity for Employee {
  const COLLECTION: &'static str = "employees";
  const LIST: ListSpec = ListSpec {
    searchable: &["first_name", "last_name", "email", "department"],
    sortable: &["first_name", "last_name", "department", "created_at"],
    default_field: "first_name",
    default_direction: SortDirection::Asc,
  };

  fn id(&self) -> i64 {
    self.id
  }

  fn describe(&self) -> String {
    self.full_name()
  }
}

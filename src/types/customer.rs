use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::query::{Fields, ListSpec, SortDirection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
  pub id: i64,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contact_person: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub segment: Option<String>,
  /// 1 = active, anything else inactive
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<String>,
}

impl Fields for Customer {
  fn field(&self, name: &str) -> Option<Cow<'_, str>> {
    match name {
      "id" => Some(Cow::Owned(self.id.to_string())),
      "name" => Some(Cow::Borrowed(self.name.as_str())),
      "contact_person" => self.contact_person.as_deref().map(Cow::Borrowed),
      "address" => self.address.as_deref().map(Cow::Borrowed),
      "email" => self.email.as_deref().map(Cow::Borrowed),
      "phone" => self.phone.as_deref().map(Cow::Borrowed),
      "segment" => self.segment.as_deref().map(Cow::Borrowed),
      "status" => self.status.map(|s| Cow::Owned(s.to_string())),
      "created_at" => self.created_at.as_deref().map(Cow::Borrowed),
      "updated_at" => self.updated_at.as_deref().map(Cow::Borrowed),
      _ => None,
    }
  }
}

impl Entity for Customer {
  const COLLECTION: &'static str = "customers";
  const LIST: ListSpec = ListSpec {
    searchable: &["name", "contact_person", "email"],
    sortable: &["name", "contact_person", "email", "created_at"],
    default_field: "name",
    default_direction: SortDirection::Asc,
  };

  fn id(&self) -> i64 {
    self.id
  }

  fn describe(&self) -> String {
    self.name.clone()
  }
}

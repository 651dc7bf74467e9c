use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::query::{Fields, ListSpec, SortDirection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
  pub id: i64,
  pub vendor_no: String,
  pub vendor_name: String,
  /// 1 = supplier, anything else contractor
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub vendor_type: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contact_person: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contact_phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contact_email: Option<String>,
  /// Payment terms, e.g. "Net 30"
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub payment: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<String>,
}

impl Fields for Vendor {
  fn field(&self, name: &str) -> Option<Cow<'_, str>> {
    match name {
      "id" => Some(Cow::Owned(self.id.to_string())),
      "vendor_no" => Some(Cow::Borrowed(self.vendor_no.as_str())),
      "vendor_name" => Some(Cow::Borrowed(self.vendor_name.as_str())),
      "vendor_type" => self.vendor_type.map(|t| Cow::Owned(t.to_string())),
      "contact_person" => self.contact_person.as_deref().map(Cow::Borrowed),
      "contact_phone" => self.contact_phone.as_deref().map(Cow::Borrowed),
      "contact_email" => self.contact_email.as_deref().map(Cow::Borrowed),
      "payment" => self.payment.as_deref().map(Cow::Borrowed),
      "status" => self.status.map(|s| Cow::Owned(s.to_string())),
      "created_at" => self.created_at.as_deref().map(Cow::Borrowed),
      "updated_at" => self.updated_at.as_deref().map(Cow::Borrowed),
      _ => None,
    }
  }
}

impl Entity for Vendor {
  const COLLECTION: &'static str = "vendors";
  const LIST: ListSpec = ListSpec {
    searchable: &["vendor_name", "vendor_no", "contact_person", "contact_email"],
    sortable: &["vendor_no", "vendor_name", "created_at"],
    default_field: "vendor_name",
    default_direction: SortDirection::Asc,
  };

  fn id(&self) -> i64 {
    self.id
  }

  fn describe(&self) -> String {
    self.vendor_name.clone()
  }
}

//! Search and sort over an in-memory collection.

use std::borrow::Cow;
use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use super::collate::CollationKey;

/// Named field access used by filtering and sorting.
///
/// Values are exposed as text; `None` means the field is absent and is
/// treated as the empty string.
pub trait Fields {
  fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl Fields for serde_json::Map<String, serde_json::Value> {
  fn field(&self, name: &str) -> Option<Cow<'_, str>> {
    match self.get(name)? {
      serde_json::Value::Null => None,
      serde_json::Value::String(s) => Some(Cow::Borrowed(s.as_str())),
      serde_json::Value::Bool(b) => Some(Cow::Owned(b.to_string())),
      serde_json::Value::Number(n) => Some(Cow::Owned(match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
      })),
      other => Some(Cow::Owned(other.to_string())),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

impl SortDirection {
  pub fn flip(self) -> Self {
    match self {
      Self::Asc => Self::Desc,
      Self::Desc => Self::Asc,
    }
  }

  pub fn arrow(self) -> &'static str {
    match self {
      Self::Asc => "↑",
      Self::Desc => "↓",
    }
  }
}

/// Active sort column and direction of a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
  pub field: String,
  pub direction: SortDirection,
}

impl SortState {
  pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
    Self {
      field: field.into(),
      direction,
    }
  }

  /// Selecting the active field flips the direction; any other field
  /// becomes active in ascending order.
  pub fn toggle(&self, field: &str) -> Self {
    if self.field == field {
      Self::new(field, self.direction.flip())
    } else {
      Self::new(field, SortDirection::Asc)
    }
  }
}

/// Per-entity list configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSpec {
  pub searchable: &'static [&'static str],
  pub sortable: &'static [&'static str],
  pub default_field: &'static str,
  pub default_direction: SortDirection,
}

impl ListSpec {
  pub fn default_sort(&self) -> SortState {
    SortState::new(self.default_field, self.default_direction)
  }

  pub fn is_sortable(&self, field: &str) -> bool {
    self.sortable.contains(&field)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
  #[error("'{field}' is not sortable (expected one of: {})", .allowed.join(", "))]
  UnsortableField {
    field: String,
    allowed: Vec<&'static str>,
  },
}

/// Search term and sort state of one list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
  spec: ListSpec,
  search: String,
  sort: SortState,
}

impl ListQuery {
  pub fn new(spec: ListSpec) -> Self {
    Self {
      spec,
      search: String::new(),
      sort: spec.default_sort(),
    }
  }

  pub fn spec(&self) -> &ListSpec {
    &self.spec
  }

  pub fn search(&self) -> &str {
    &self.search
  }

  pub fn set_search(&mut self, term: impl Into<String>) {
    self.search = term.into();
  }

  pub fn sort(&self) -> &SortState {
    &self.sort
  }

  /// Apply the toggle rule for a column header click.
  pub fn select_sort(&mut self, field: &str) -> Result<&SortState, QueryError> {
    if !self.spec.is_sortable(field) {
      return Err(QueryError::UnsortableField {
        field: field.to_string(),
        allowed: self.spec.sortable.to_vec(),
      });
    }
    self.sort = self.sort.toggle(field);
    Ok(&self.sort)
  }

  /// Replace the sort state outright, e.g. from command line flags.
  pub fn set_sort(&mut self, sort: SortState) -> Result<&SortState, QueryError> {
    if !self.spec.is_sortable(&sort.field) {
      return Err(QueryError::UnsortableField {
        field: sort.field,
        allowed: self.spec.sortable.to_vec(),
      });
    }
    self.sort = sort;
    Ok(&self.sort)
  }

  pub fn matches<R: Fields>(&self, record: &R) -> bool {
    matches_search(record, self.spec.searchable, &self.search.to_lowercase())
  }

  /// Filter then sort, returning a new sequence.
  pub fn apply<R: Fields + Clone>(&self, records: &[R]) -> Vec<R> {
    let mut visible = filter_records(records, self.spec.searchable, &self.search);
    sort_records(&mut visible, &self.sort);
    visible.into_iter().cloned().collect()
  }
}

fn matches_search<R: Fields>(record: &R, searchable: &[&str], needle: &str) -> bool {
  if needle.is_empty() {
    return true;
  }
  searchable.iter().any(|name| {
    record
      .field(name)
      .is_some_and(|value| value.to_lowercase().contains(needle))
  })
}

/// Keep records where the lowercase term occurs in any searchable field.
pub fn filter_records<'a, R: Fields>(
  records: &'a [R],
  searchable: &[&str],
  term: &str,
) -> Vec<&'a R> {
  let needle = term.to_lowercase();
  records
    .iter()
    .filter(|r| matches_search(*r, searchable, &needle))
    .collect()
}

/// Stable sort by the text value of the sort field.
pub fn sort_records<R: Fields>(records: &mut [&R], sort: &SortState) {
  let key = |r: &&R| CollationKey::new(r.field(&sort.field).as_deref().unwrap_or(""));
  match sort.direction {
    SortDirection::Asc => records.sort_by_cached_key(key),
    SortDirection::Desc => records.sort_by_cached_key(|r| Reverse(key(r))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_toggle_same_field_flips() {
    let sort = SortState::new("name", SortDirection::Asc);
    assert_eq!(sort.toggle("name"), SortState::new("name", SortDirection::Desc));
    assert_eq!(
      sort.toggle("name").toggle("name"),
      SortState::new("name", SortDirection::Asc)
    );
  }

  #[test]
  fn test_toggle_new_field_resets_to_ascending() {
    let sort = SortState::new("name", SortDirection::Desc);
    assert_eq!(sort.toggle("email"), SortState::new("email", SortDirection::Asc));
  }

  #[test]
  fn test_direction_arrow() {
    assert_eq!(SortDirection::Asc.arrow(), "↑");
    assert_eq!(SortDirection::Desc.arrow(), "↓");
  }
}

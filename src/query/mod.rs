mod collate;
mod transform;

pub use collate::{locale_cmp, CollationKey};
pub use transform::{
  filter_records, sort_records, Fields, ListQuery, ListSpec, QueryError, SortDirection, SortState,
};

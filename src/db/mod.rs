mod backend;
mod postgres;
mod rest;
pub mod sanitize;
mod sqlite;

pub use backend::{BackendKind, CollectionBackend, Row};
pub use postgres::PostgresBackend;
pub use rest::{RestBackend, RestError};
pub use sanitize::{
  validate_collection_name, validate_identifier, validate_known_collection, validate_row_keys,
  SqlSanitizeError,
};
pub use sqlite::SqliteBackend;

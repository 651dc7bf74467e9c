//! Identifier validation for collection and column names.
//!
//! Collection names and row keys end up inside SQL text (table and column
//! names cannot be bound as parameters) and inside REST paths, so they are
//! checked here before any backend touches them.

use crate::types::EntityKind;

/// Maximum length for identifiers (collection names, column names)
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

fn check_shape(s: &str) -> Result<(), SqlSanitizeError> {
  let Some(first) = s.chars().next() else {
    return Err(SqlSanitizeError::EmptyIdentifier);
  };

  if s.len() > MAX_IDENTIFIER_LENGTH {
    return Err(SqlSanitizeError::IdentifierTooLong(s.len()));
  }

  if !first.is_ascii_alphabetic() && first != '_' {
    return Err(SqlSanitizeError::InvalidIdentifierStart(first));
  }

  Ok(())
}

fn check_keyword(s: &str) -> Result<(), SqlSanitizeError> {
  let upper = s.to_uppercase();
  if SQL_KEYWORDS.contains(&upper.as_str()) {
    return Err(SqlSanitizeError::ReservedKeyword(s.to_string()));
  }
  Ok(())
}

/// Validates a column name: letters, digits and underscores only.
pub fn validate_identifier(s: &str) -> Result<(), SqlSanitizeError> {
  check_shape(s)?;

  for c in s.chars() {
    if !c.is_ascii_alphanumeric() && c != '_' {
      return Err(SqlSanitizeError::InvalidIdentifierChar(c));
    }
  }

  check_keyword(s)
}

/// Validates a collection name. Must be lowercase alphanumeric + underscore.
pub fn validate_collection_name(s: &str) -> Result<(), SqlSanitizeError> {
  check_shape(s)?;

  for c in s.chars() {
    if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '_' {
      return Err(SqlSanitizeError::InvalidCollectionChar(c));
    }
  }

  check_keyword(s)
}

/// Validates a collection name and requires it to be one of the managed
/// entity collections.
pub fn validate_known_collection(s: &str) -> Result<EntityKind, SqlSanitizeError> {
  validate_collection_name(s)?;
  EntityKind::ALL
    .into_iter()
    .find(|kind| kind.collection() == s)
    .ok_or_else(|| SqlSanitizeError::UnknownCollection(s.to_string()))
}

/// Validates every key of a row payload as a column name.
pub fn validate_row_keys<'a>(keys: impl IntoIterator<Item = &'a String>) -> Result<(), SqlSanitizeError> {
  for key in keys {
    validate_identifier(key)?;
  }
  Ok(())
}

/// SQL sanitization errors
#[derive(Debug, Clone, PartialEq)]
pub enum SqlSanitizeError {
  EmptyIdentifier,
  IdentifierTooLong(usize),
  InvalidIdentifierStart(char),
  InvalidIdentifierChar(char),
  InvalidCollectionChar(char),
  ReservedKeyword(String),
  UnknownCollection(String),
}

impl std::fmt::Display for SqlSanitizeError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::EmptyIdentifier => write!(f, "Identifier cannot be empty"),
      Self::IdentifierTooLong(len) => {
        write!(
          f,
          "Identifier too long: {} > {}",
          len, MAX_IDENTIFIER_LENGTH
        )
      }
      Self::InvalidIdentifierStart(c) => {
        write!(
          f,
          "Identifier must start with letter or underscore, got '{}'",
          c
        )
      }
      Self::InvalidIdentifierChar(c) => {
        write!(f, "Invalid character in identifier: '{}'", c)
      }
      Self::InvalidCollectionChar(c) => {
        write!(
          f,
          "Collection names must be lowercase alphanumeric, got '{}'",
          c
        )
      }
      Self::ReservedKeyword(s) => write!(f, "'{}' is a reserved SQL keyword", s),
      Self::UnknownCollection(s) => write!(f, "Unknown collection: {}", s),
    }
  }
}

impl std::error::Error for SqlSanitizeError {}

/// Common SQL keywords that cannot be used as identifiers
const SQL_KEYWORDS: &[&str] = &[
  "SELECT", "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "TABLE", "INDEX", "FROM",
  "WHERE", "AND", "OR", "NOT", "NULL", "TRUE", "FALSE", "ORDER", "BY", "ASC", "DESC", "LIMIT",
  "OFFSET", "JOIN", "ON", "AS", "IN", "LIKE", "IS", "UNION", "ALL", "GROUP", "HAVING", "INTO",
  "VALUES", "SET", "CASCADE", "REFERENCES", "PRIMARY", "KEY", "DEFAULT", "GRANT", "TRUNCATE",
];

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::display::{Locale, DEFAULT_CURRENCY};

/// Expand environment variables in a string.
/// Supports $VAR_NAME and ${VAR_NAME} syntax; unset variables expand to
/// the empty string.
fn expand_env_vars(input: &str) -> String {
  let mut result = String::with_capacity(input.len());
  let mut rest = input;

  while let Some(pos) = rest.find('$') {
    result.push_str(&rest[..pos]);
    let after = &rest[pos + 1..];

    if let Some(braced) = after.strip_prefix('{') {
      if let Some(end) = braced.find('}') {
        result.push_str(&std::env::var(&braced[..end]).unwrap_or_default());
        rest = &braced[end + 1..];
        continue;
      }
      // Unterminated: keep the text as written
      result.push('$');
      rest = after;
      continue;
    }

    let var_len = after
      .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
      .unwrap_or(after.len());
    if var_len > 0 {
      result.push_str(&std::env::var(&after[..var_len]).unwrap_or_default());
    } else {
      result.push('$');
    }
    rest = &after[var_len..];
  }

  result.push_str(rest);
  result
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
  #[default]
  Rest,
  Postgres,
  Sqlite,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
  #[serde(default)]
  pub backend: BackendType,
  #[serde(default)]
  pub rest: RestSection,
  #[serde(default)]
  pub postgres: PostgresSection,
  #[serde(default)]
  pub sqlite: SqliteSection,
  #[serde(default)]
  pub logging: LoggingSection,
  #[serde(default)]
  pub display: DisplaySection,
}

/// Hosted REST backend: project URL and anon/service key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestSection {
  #[serde(default)]
  pub url: String,
  #[serde(default)]
  pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresSection {
  #[serde(default = "default_pg_url")]
  pub url: String,
  #[serde(default = "default_max_conn")]
  pub max_connections: usize,
}
fn default_pg_url() -> String {
  "postgres://localhost/erpdesk".into()
}
fn default_max_conn() -> usize {
  4
}
impl Default for PostgresSection {
  fn default() -> Self {
    Self {
      url: default_pg_url(),
      max_connections: default_max_conn(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteSection {
  #[serde(default = "default_sqlite_path")]
  pub path: String,
}
fn default_sqlite_path() -> String {
  "erpdesk.db".into()
}
impl Default for SqliteSection {
  fn default() -> Self {
    Self {
      path: default_sqlite_path(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
  #[serde(default = "default_level")]
  pub level: String,
}
fn default_level() -> String {
  "warn".into()
}
impl Default for LoggingSection {
  fn default() -> Self {
    Self {
      level: default_level(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySection {
  /// Used for amounts stored without a currency code
  #[serde(default = "default_currency")]
  pub currency: String,
  /// Locale of the dashboard amounts
  #[serde(default = "default_locale")]
  pub locale: Locale,
}
fn default_currency() -> String {
  DEFAULT_CURRENCY.into()
}
fn default_locale() -> Locale {
  Locale::EnCa
}
impl Default for DisplaySection {
  fn default() -> Self {
    Self {
      currency: default_currency(),
      locale: default_locale(),
    }
  }
}

impl ConsoleConfig {
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
    let content = std::fs::read_to_string(&path)?;
    Self::from_yaml(&content)
  }

  pub fn from_yaml(content: &str) -> Result<Self, anyhow::Error> {
    let expanded = expand_env_vars(content);
    Ok(serde_yaml::from_str(&expanded)?)
  }

  /// Look for `erpdesk.yaml` or `erpdesk.yml` in `dir`.
  pub fn find_in(dir: impl AsRef<Path>) -> Result<Option<Self>, anyhow::Error> {
    for name in ["erpdesk.yaml", "erpdesk.yml"] {
      let p = dir.as_ref().join(name);
      if p.exists() {
        tracing::info!("Loading config from {}", p.display());
        return Ok(Some(Self::from_file(p)?));
      }
    }
    Ok(None)
  }

  pub fn find_and_load() -> Result<Option<Self>, anyhow::Error> {
    Self::find_in(".")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_expand_leaves_plain_text() {
    assert_eq!(expand_env_vars("no variables here"), "no variables here");
    assert_eq!(expand_env_vars("price: 5$"), "price: 5$");
    assert_eq!(expand_env_vars("broken ${OPEN"), "broken ${OPEN");
  }

  #[test]
  fn test_expand_unset_is_empty() {
    assert_eq!(
      expand_env_vars("key: ${ERPDESK_TEST_SURELY_UNSET_VAR}!"),
      "key: !"
    );
    assert_eq!(expand_env_vars("key: $ERPDESK_TEST_SURELY_UNSET_VAR/x"), "key: /x");
  }

  #[test]
  fn test_expand_keeps_multibyte_text() {
    assert_eq!(expand_env_vars("şirket: Çelik $"), "şirket: Çelik $");
  }

  #[test]
  fn test_defaults() {
    let config = ConsoleConfig::default();
    assert_eq!(config.backend, BackendType::Rest);
    assert_eq!(config.sqlite.path, "erpdesk.db");
    assert_eq!(config.display.currency, "CAD");
    assert_eq!(config.display.locale, Locale::EnCa);
  }
}

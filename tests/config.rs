//! Configuration loading: defaults, YAML sections, env expansion, discovery

use erpdesk::config::{BackendType, ConsoleConfig};
use erpdesk::display::Locale;

#[test]
fn test_defaults() {
  let config = ConsoleConfig::default();
  assert_eq!(config.backend, BackendType::Rest);
  assert!(config.rest.url.is_empty());
  assert_eq!(config.postgres.url, "postgres://localhost/erpdesk");
  assert_eq!(config.postgres.max_connections, 4);
  assert_eq!(config.sqlite.path, "erpdesk.db");
  assert_eq!(config.logging.level, "warn");
  assert_eq!(config.display.currency, "CAD");
  assert_eq!(config.display.locale, Locale::EnCa);
}

#[test]
fn test_empty_yaml_uses_defaults() {
  let config = ConsoleConfig::from_yaml("{}").unwrap();
  assert_eq!(config.backend, BackendType::Rest);
  assert_eq!(config.sqlite.path, "erpdesk.db");
}

#[test]
fn test_partial_sections_fill_defaults() {
  let yaml = r#"
backend: postgres
postgres:
  url: postgres://erp@db/erp
display:
  locale: en-US
"#;
  let config = ConsoleConfig::from_yaml(yaml).unwrap();
  assert_eq!(config.backend, BackendType::Postgres);
  assert_eq!(config.postgres.url, "postgres://erp@db/erp");
  assert_eq!(config.postgres.max_connections, 4);
  assert_eq!(config.display.locale, Locale::EnUs);
  assert_eq!(config.display.currency, "CAD");
}

#[test]
fn test_rest_section_with_env_expansion() {
  std::env::set_var("ERPDESK_CONFIG_TEST_KEY", "anon-key-123");
  std::env::set_var("ERPDESK_CONFIG_TEST_HOST", "erp.example.com");
  let yaml = r#"
backend: rest
rest:
  url: https://${ERPDESK_CONFIG_TEST_HOST}
  api_key: $ERPDESK_CONFIG_TEST_KEY
"#;
  let config = ConsoleConfig::from_yaml(yaml).unwrap();
  assert_eq!(config.rest.url, "https://erp.example.com");
  assert_eq!(config.rest.api_key, "anon-key-123");
}

#[test]
fn test_unknown_backend_is_rejected() {
  assert!(ConsoleConfig::from_yaml("backend: mongo").is_err());
}

#[test]
fn test_unknown_locale_is_rejected() {
  assert!(ConsoleConfig::from_yaml("display:\n  locale: fr-FR").is_err());
}

#[test]
fn test_from_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("custom.yaml");
  std::fs::write(&path, "backend: sqlite\nsqlite:\n  path: /tmp/erp.db\n").unwrap();

  let config = ConsoleConfig::from_file(&path).unwrap();
  assert_eq!(config.backend, BackendType::Sqlite);
  assert_eq!(config.sqlite.path, "/tmp/erp.db");
}

#[test]
fn test_from_missing_file_fails() {
  let dir = tempfile::tempdir().unwrap();
  assert!(ConsoleConfig::from_file(dir.path().join("nope.yaml")).is_err());
}

#[test]
fn test_find_in_prefers_yaml_extension() {
  let dir = tempfile::tempdir().unwrap();
  std::fs::write(dir.path().join("erpdesk.yml"), "logging:\n  level: debug\n").unwrap();
  std::fs::write(dir.path().join("erpdesk.yaml"), "logging:\n  level: info\n").unwrap();

  let config = ConsoleConfig::find_in(dir.path()).unwrap().unwrap();
  assert_eq!(config.logging.level, "info");
}

#[test]
fn test_find_in_falls_back_to_yml() {
  let dir = tempfile::tempdir().unwrap();
  std::fs::write(dir.path().join("erpdesk.yml"), "logging:\n  level: debug\n").unwrap();

  let config = ConsoleConfig::find_in(dir.path()).unwrap().unwrap();
  assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_find_in_empty_dir() {
  let dir = tempfile::tempdir().unwrap();
  assert!(ConsoleConfig::find_in(dir.path()).unwrap().is_none());
}

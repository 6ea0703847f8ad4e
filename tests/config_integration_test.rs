//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold ENV_MUTEX so they don't
//! interfere with each other.

use catalog::config::{load_config, DuplicateNamePolicy, StoreBackend};
use catalog::domain::CatalogError;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    for var in [
        "CATALOG_APPLICATION_LOG_LEVEL",
        "CATALOG_STORE_BACKEND",
        "CATALOG_STORE_PATH",
        "CATALOG_STORE_COUNTER_START",
        "CATALOG_STORE_DUPLICATE_NAMES",
        "CATALOG_STAFF_PASSCODE_SHA256",
        "CATALOG_STAFF_AUTH_TIMEOUT_SECONDS",
        "CATALOG_STAFF_UNLOCK_TTL_SECONDS",
        "CATALOG_LOGGING_LOCAL_ENABLED",
        "CATALOG_LOGGING_LOCAL_PATH",
        "TEST_CATALOG_DIGEST",
    ] {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let digest = "ab".repeat(32);
    let file = write_config(&format!(
        r#"
[application]
log_level = "debug"

[store]
backend = "memory"
path = "/tmp/catalog/records.json"
counter_start = 7000
duplicate_names = "reject"

[staff]
passcode_sha256 = "{digest}"
auth_timeout_seconds = 30
unlock_ttl_seconds = 120

[logging]
local_enabled = true
local_path = "/tmp/catalog/logs"
local_rotation = "hourly"
"#
    ));

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.store.backend, StoreBackend::Memory);
    assert_eq!(config.store.counter_start, 7000);
    assert_eq!(config.store.duplicate_names, DuplicateNamePolicy::Reject);
    assert_eq!(
        config.staff.passcode_sha256.as_ref().unwrap().expose_secret(),
        digest.as_str()
    );
    assert_eq!(config.staff.auth_timeout_seconds, 30);
    assert_eq!(config.staff.unlock_ttl_seconds, 120);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_empty_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("");
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.store.backend, StoreBackend::File);
    assert_eq!(config.store.path, "./catalog-data/records.json");
    assert_eq!(config.store.counter_start, 3000);
    assert_eq!(config.staff.unlock_ttl_seconds, 300);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let digest = "cd".repeat(32);
    std::env::set_var("TEST_CATALOG_DIGEST", &digest);
    let file = write_config("[staff]\npasscode_sha256 = \"${TEST_CATALOG_DIGEST}\"\n");

    let config = load_config(file.path()).unwrap();
    assert_eq!(
        config.staff.passcode_sha256.unwrap().expose_secret(),
        digest.as_str()
    );
    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[staff]\npasscode_sha256 = \"${TEST_CATALOG_DIGEST}\"\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, CatalogError::Configuration(_)));
    assert!(err.to_string().contains("TEST_CATALOG_DIGEST"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("CATALOG_STORE_BACKEND", "memory");
    std::env::set_var("CATALOG_STORE_COUNTER_START", "9000");
    std::env::set_var("CATALOG_STORE_DUPLICATE_NAMES", "reject");
    std::env::set_var("CATALOG_STAFF_UNLOCK_TTL_SECONDS", "45");

    let file = write_config("[store]\nbackend = \"file\"\ncounter_start = 3000\n");
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.store.backend, StoreBackend::Memory);
    assert_eq!(config.store.counter_start, 9000);
    assert_eq!(config.store.duplicate_names, DuplicateNamePolicy::Reject);
    assert_eq!(config.staff.unlock_ttl_seconds, 45);

    cleanup_env_vars();
}

#[test]
fn test_invalid_env_override_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("CATALOG_STORE_BACKEND", "keychain");
    let file = write_config("");
    assert!(matches!(
        load_config(file.path()),
        Err(CatalogError::Configuration(_))
    ));

    cleanup_env_vars();
}

#[test]
fn test_unparseable_numeric_override_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();

    for (var, value) in [
        ("CATALOG_STORE_COUNTER_START", "three thousand"),
        ("CATALOG_STORE_COUNTER_START", "-1"),
        ("CATALOG_STAFF_AUTH_TIMEOUT_SECONDS", "1m"),
        ("CATALOG_STAFF_UNLOCK_TTL_SECONDS", ""),
        ("CATALOG_LOGGING_LOCAL_ENABLED", "yes"),
    ] {
        cleanup_env_vars();
        std::env::set_var(var, value);
        let file = write_config("");
        let err = load_config(file.path()).unwrap_err();
        assert!(
            matches!(err, CatalogError::Configuration(_)),
            "{var}={value:?} should be rejected"
        );
        assert!(err.to_string().contains(var));
    }

    cleanup_env_vars();
}

#[test]
fn test_validation_failures() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    for content in [
        "[application]\nlog_level = \"chatty\"\n",
        "[store]\ncounter_start = 0\n",
        "[store]\nduplicate_names = \"merge\"\n",
        "[staff]\npasscode_sha256 = \"1234\"\n",
        "[staff]\nunlock_ttl_seconds = 0\n",
        "[logging]\nlocal_rotation = \"size\"\n",
    ] {
        let file = write_config(content);
        assert!(
            matches!(load_config(file.path()), Err(CatalogError::Configuration(_))),
            "expected configuration error for {content:?}"
        );
    }
}

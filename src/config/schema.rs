//! Configuration schema types
//!
//! This module defines the configuration structure for Catalog.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Secret store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON document on local disk
    #[default]
    File,
    /// Process-local map; records vanish on exit
    Memory,
}

/// What `register` does when the name already has a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateNamePolicy {
    /// Overwrite the existing record with the new registration
    #[default]
    Replace,
    /// Refuse the registration with a conflict
    Reject,
}

/// Main Catalog configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Record store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Staff gate settings
    #[serde(default)]
    pub staff: StaffConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CatalogConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.store.validate()?;
        self.staff.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend holding the records
    #[serde(default)]
    pub backend: StoreBackend,

    /// Path of the JSON document (file backend only)
    #[serde(default = "default_store_path")]
    pub path: String,

    /// First sequential patient ID handed out
    #[serde(default = "default_counter_start")]
    pub counter_start: u64,

    /// Behaviour when a name is registered twice
    #[serde(default)]
    pub duplicate_names: DuplicateNamePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
            counter_start: default_counter_start(),
            duplicate_names: DuplicateNamePolicy::default(),
        }
    }
}

impl StoreConfig {
    fn validate(&self) -> Result<(), String> {
        if self.backend == StoreBackend::File && self.path.trim().is_empty() {
            return Err("store.path cannot be empty when backend = 'file'".to_string());
        }
        if self.counter_start == 0 {
            return Err("store.counter_start must be > 0".to_string());
        }
        Ok(())
    }
}

/// Staff gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffConfig {
    /// Hex SHA-256 digest of the staff passcode
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub passcode_sha256: Option<SecretString>,

    /// Seconds to wait for device authentication before giving up
    #[serde(default = "default_auth_timeout_seconds")]
    pub auth_timeout_seconds: u64,

    /// Seconds the staff gate stays unlocked before re-locking itself
    #[serde(default = "default_unlock_ttl_seconds")]
    pub unlock_ttl_seconds: u64,
}

impl Default for StaffConfig {
    fn default() -> Self {
        Self {
            passcode_sha256: None,
            auth_timeout_seconds: default_auth_timeout_seconds(),
            unlock_ttl_seconds: default_unlock_ttl_seconds(),
        }
    }
}

impl StaffConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if let Some(ref digest) = self.passcode_sha256 {
            let digest = digest.expose_secret();
            if !digest.is_empty() && !digest.is_sha256_hex() {
                return Err(
                    "staff.passcode_sha256 must be a 64-character hex SHA-256 digest".to_string(),
                );
            }
        }
        if self.auth_timeout_seconds == 0 {
            return Err("staff.auth_timeout_seconds must be > 0".to_string());
        }
        if self.unlock_ttl_seconds == 0 {
            return Err("staff.unlock_ttl_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_store_path() -> String {
    "./catalog-data/records.json".to_string()
}

fn default_counter_start() -> u64 {
    3000
}

fn default_auth_timeout_seconds() -> u64 {
    60
}

fn default_unlock_ttl_seconds() -> u64 {
    300
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_default_values() {
        let config = CatalogConfig::default();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.store.counter_start, 3000);
        assert_eq!(config.store.duplicate_names, DuplicateNamePolicy::Replace);
        assert!(config.staff.passcode_sha256.is_none());
        assert_eq!(config.staff.auth_timeout_seconds, 60);
        assert!(!config.logging.local_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_store_config_validation() {
        let mut config = StoreConfig::default();
        config.path = "  ".to_string();
        assert!(config.validate().is_err());

        config.backend = StoreBackend::Memory;
        assert!(config.validate().is_ok());

        config.counter_start = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_staff_digest_validation() {
        let mut config = StaffConfig {
            passcode_sha256: Some(secret_string("not-a-digest".to_string())),
            ..StaffConfig::default()
        };
        assert!(config.validate().is_err());

        config.passcode_sha256 = Some(secret_string("0f".repeat(32)));
        assert!(config.validate().is_ok());

        config.passcode_sha256 = Some(secret_string(String::new()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_staff_timeouts_must_be_positive() {
        let config = StaffConfig {
            auth_timeout_seconds: 0,
            ..StaffConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let config = LoggingConfig {
            local_rotation: "weekly".to_string(),
            ..LoggingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enum_parsing() {
        #[derive(Deserialize)]
        struct Wrapper {
            backend: StoreBackend,
            duplicate_names: DuplicateNamePolicy,
        }

        let parsed: Wrapper =
            toml::from_str("backend = \"memory\"\nduplicate_names = \"reject\"").unwrap();
        assert_eq!(parsed.backend, StoreBackend::Memory);
        assert_eq!(parsed.duplicate_names, DuplicateNamePolicy::Reject);
    }
}

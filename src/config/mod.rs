//! Configuration management for Catalog.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Catalog configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting
//! - `CATALOG_<SECTION>_<KEY>` environment overrides
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`StoreConfig`] - Secret store backend, ID counter start, duplicate-name policy
//! - [`StaffConfig`] - Staff passcode digest and gate timings
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [store]
//! backend = "file"
//! path = "./catalog-data/records.json"
//! counter_start = 3000
//! duplicate_names = "replace"
//!
//! [staff]
//! passcode_sha256 = "${CATALOG_STAFF_PASSCODE_SHA256}"
//! auth_timeout_seconds = 60
//! unlock_ttl_seconds = 300
//!
//! [logging]
//! local_enabled = false
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use catalog::config::load_config;
//!
//! # fn example() {
//! match load_config("catalog.toml") {
//!     Ok(config) => println!("Store: {}", config.store.path),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, CatalogConfig, DuplicateNamePolicy, LoggingConfig, StaffConfig,
    StoreBackend, StoreConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};

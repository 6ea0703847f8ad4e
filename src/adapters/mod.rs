//! External system integrations for Catalog.
//!
//! - [`secret_store`] - Per-account blob storage that holds the records
//! - [`device_auth`] - Device owner authentication guarding staff operations
//!
//! # Design Pattern
//!
//! Adapters isolate the platform collaborators behind traits so the core can be
//! exercised with in-memory implementations:
//!
//! ```rust
//! use catalog::adapters::secret_store::{InMemorySecretStore, SecretStore};
//!
//! let store = InMemorySecretStore::new();
//! store.add("Alice", b"blob").unwrap();
//! assert_eq!(store.fetch("Alice").unwrap(), b"blob".to_vec());
//! ```

pub mod device_auth;
pub mod secret_store;

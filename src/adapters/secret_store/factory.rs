//! Secret store factory
//!
//! Creates the configured secret store backend.

use super::file::FileSecretStore;
use super::memory::InMemorySecretStore;
use super::traits::SecretStore;
use crate::config::schema::{StoreBackend, StoreConfig};
use std::sync::Arc;

/// Create a secret store based on the configuration
///
/// # Arguments
///
/// * `config` - The store section of the Catalog configuration
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements SecretStore
pub fn create_secret_store(config: &StoreConfig) -> Arc<dyn SecretStore> {
    match config.backend {
        StoreBackend::File => {
            tracing::info!(path = %config.path, "Using file secret store");
            Arc::new(FileSecretStore::new(&config.path))
        }
        StoreBackend::Memory => {
            tracing::info!("Using in-memory secret store");
            Arc::new(InMemorySecretStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_memory_store() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            ..StoreConfig::default()
        };
        assert_eq!(create_secret_store(&config).backend_name(), "memory");
    }

    #[test]
    fn test_create_file_store() {
        let config = StoreConfig::default();
        assert_eq!(create_secret_store(&config).backend_name(), "file");
    }
}

//! Secret store abstraction
//!
//! This module defines the trait that secret store backends must implement to
//! hold Catalog's records. The store is opaque: it maps an account name to a byte
//! blob and knows nothing about what the blob contains.

use crate::domain::errors::StoreError;
use std::collections::BTreeMap;

/// Result alias for secret store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Per-account blob storage
///
/// Every operation is synchronous and atomic with respect to a single account.
/// There is no compare-and-swap: callers that read-modify-write an entry (the
/// ID counter) rely on the kiosk running one session at a time.
pub trait SecretStore: Send + Sync {
    /// Store a blob under a new account
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if the account already exists.
    fn add(&self, account: &str, blob: &[u8]) -> StoreResult<()>;

    /// Replace the blob of an existing account
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the account does not exist.
    fn update(&self, account: &str, blob: &[u8]) -> StoreResult<()>;

    /// Fetch the blob of an account
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the account does not exist.
    fn fetch(&self, account: &str) -> StoreResult<Vec<u8>>;

    /// Every account and blob of this store's class, sorted by account
    fn list_all(&self) -> StoreResult<BTreeMap<String, Vec<u8>>>;

    /// Remove every account of this store's class in one operation
    fn delete_all_of_class(&self) -> StoreResult<()>;

    /// Add the account, or update it if it already exists
    fn upsert(&self, account: &str, blob: &[u8]) -> StoreResult<()> {
        match self.add(account, blob) {
            Err(StoreError::Duplicate(_)) => self.update(account, blob),
            other => other,
        }
    }

    /// Short backend name for logs and status output
    fn backend_name(&self) -> &'static str;
}

//! In-memory secret store
//!
//! Used by tests and by kiosks configured with `backend = "memory"`, where
//! records only need to live as long as the process.

use super::traits::{SecretStore, StoreResult};
use crate::domain::errors::StoreError;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Secret store backed by a mutex-guarded map
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl InMemorySecretStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Other("in-memory store lock poisoned".to_string()))
    }
}

impl SecretStore for InMemorySecretStore {
    fn add(&self, account: &str, blob: &[u8]) -> StoreResult<()> {
        let mut entries = self.lock()?;
        if entries.contains_key(account) {
            return Err(StoreError::Duplicate(account.to_string()));
        }
        entries.insert(account.to_string(), blob.to_vec());
        Ok(())
    }

    fn update(&self, account: &str, blob: &[u8]) -> StoreResult<()> {
        let mut entries = self.lock()?;
        match entries.get_mut(account) {
            Some(existing) => {
                *existing = blob.to_vec();
                Ok(())
            }
            None => Err(StoreError::NotFound(account.to_string())),
        }
    }

    fn fetch(&self, account: &str) -> StoreResult<Vec<u8>> {
        self.lock()?
            .get(account)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(account.to_string()))
    }

    fn list_all(&self) -> StoreResult<BTreeMap<String, Vec<u8>>> {
        Ok(self.lock()?.clone())
    }

    fn delete_all_of_class(&self) -> StoreResult<()> {
        self.lock()?.clear();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_fetch() {
        let store = InMemorySecretStore::new();
        store.add("Alice", b"blob").unwrap();
        assert_eq!(store.fetch("Alice").unwrap(), b"blob".to_vec());
    }

    #[test]
    fn test_add_duplicate_fails() {
        let store = InMemorySecretStore::new();
        store.add("Alice", b"one").unwrap();
        assert_eq!(
            store.add("Alice", b"two"),
            Err(StoreError::Duplicate("Alice".to_string()))
        );
        assert_eq!(store.fetch("Alice").unwrap(), b"one".to_vec());
    }

    #[test]
    fn test_update_missing_fails() {
        let store = InMemorySecretStore::new();
        assert_eq!(
            store.update("Bob", b"x"),
            Err(StoreError::NotFound("Bob".to_string()))
        );
    }

    #[test]
    fn test_upsert_adds_and_replaces() {
        let store = InMemorySecretStore::new();
        store.upsert("Count", b"3000").unwrap();
        store.upsert("Count", b"3001").unwrap();
        assert_eq!(store.fetch("Count").unwrap(), b"3001".to_vec());
    }

    #[test]
    fn test_delete_all_clears_everything() {
        let store = InMemorySecretStore::new();
        store.add("Alice", b"a").unwrap();
        store.add("Count", b"c").unwrap();
        store.delete_all_of_class().unwrap();
        assert!(store.list_all().unwrap().is_empty());
        assert!(store.fetch("Alice").is_err());
    }
}

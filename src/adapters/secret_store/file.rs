//! File-backed secret store
//!
//! Persists every account of the store's class in a single JSON document:
//!
//! ```json
//! { "version": 1, "class": "generic_password", "entries": { "Alice": "Q0tSMTU6..." } }
//! ```
//!
//! Blobs are base64-encoded. The document is re-read before every operation so
//! that separate kiosk processes observe each other's writes, and every mutation
//! rewrites it atomically (temporary file + rename).

use super::traits::{SecretStore, StoreResult};
use crate::domain::errors::StoreError;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const FORMAT_VERSION: u32 = 1;

/// Item class stored in the document; mirrors the generic-password class of
/// platform keychains.
pub const STORE_CLASS: &str = "generic_password";

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    class: String,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            class: STORE_CLASS.to_string(),
            entries: BTreeMap::new(),
        }
    }
}

/// Secret store persisted to a JSON file
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileSecretStore {
    /// Open (or lazily create) a store at `path`
    ///
    /// The file is only created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<StoreDocument> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            StoreError::Other(format!("failed to read {}: {e}", self.path.display()))
        })?;
        let document: StoreDocument = serde_json::from_str(&contents).map_err(|e| {
            StoreError::Other(format!("failed to parse {}: {e}", self.path.display()))
        })?;

        if document.version != FORMAT_VERSION {
            return Err(StoreError::Other(format!(
                "unsupported store format version {} in {}",
                document.version,
                self.path.display()
            )));
        }
        if document.class != STORE_CLASS {
            return Err(StoreError::Other(format!(
                "{} holds items of class '{}', expected '{}'",
                self.path.display(),
                document.class,
                STORE_CLASS
            )));
        }

        Ok(document)
    }

    fn save(&self, document: &StoreDocument) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::Other(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let json = serde_json::to_vec_pretty(document)
            .map_err(|e| StoreError::Other(format!("failed to serialize store: {e}")))?;

        let tmp_path = self.path.with_extension("tmp");
        let mut file = open_private(&tmp_path).map_err(|e| {
            StoreError::Other(format!("failed to create {}: {e}", tmp_path.display()))
        })?;
        file.write_all(&json)
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                StoreError::Other(format!("failed to write {}: {e}", tmp_path.display()))
            })?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            StoreError::Other(format!("failed to replace {}: {e}", self.path.display()))
        })?;

        tracing::trace!(path = %self.path.display(), entries = document.entries.len(), "Secret store written");
        Ok(())
    }

    fn mutate<F>(&self, f: F) -> StoreResult<()>
    where
        F: FnOnce(&mut StoreDocument) -> StoreResult<()>,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Other("file store lock poisoned".to_string()))?;
        let mut document = self.load()?;
        f(&mut document)?;
        self.save(&document)
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

fn decode_entry(encoded: &str) -> StoreResult<Vec<u8>> {
    general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| StoreError::Other(format!("stored entry is not valid base64: {e}")))
}

impl SecretStore for FileSecretStore {
    fn add(&self, account: &str, blob: &[u8]) -> StoreResult<()> {
        self.mutate(|doc| {
            if doc.entries.contains_key(account) {
                return Err(StoreError::Duplicate(account.to_string()));
            }
            doc.entries.insert(
                account.to_string(),
                general_purpose::STANDARD.encode(blob),
            );
            Ok(())
        })
    }

    fn update(&self, account: &str, blob: &[u8]) -> StoreResult<()> {
        self.mutate(|doc| match doc.entries.get_mut(account) {
            Some(existing) => {
                *existing = general_purpose::STANDARD.encode(blob);
                Ok(())
            }
            None => Err(StoreError::NotFound(account.to_string())),
        })
    }

    fn fetch(&self, account: &str) -> StoreResult<Vec<u8>> {
        let document = self.load()?;
        let encoded = document
            .entries
            .get(account)
            .ok_or_else(|| StoreError::NotFound(account.to_string()))?;
        decode_entry(encoded)
    }

    fn list_all(&self) -> StoreResult<BTreeMap<String, Vec<u8>>> {
        self.load()?
            .entries
            .iter()
            .map(|(account, encoded)| Ok((account.clone(), decode_entry(encoded)?)))
            .collect()
    }

    fn delete_all_of_class(&self) -> StoreResult<()> {
        self.mutate(|doc| {
            doc.entries.clear();
            Ok(())
        })
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

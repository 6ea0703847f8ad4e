//! Checksums for export snapshots
//!
//! A snapshot carries the SHA-256 of its entries so a copy taken off the kiosk
//! can be checked for tampering or truncation.

use crate::domain::{CatalogError, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Calculate the hex SHA-256 of a value's compact JSON serialization
///
/// # Examples
///
/// ```
/// use catalog::core::export::checksum::calculate_checksum;
///
/// let checksum = calculate_checksum(&vec!["Alice", "Bob"]).unwrap();
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let bytes =
        serde_json::to_vec(value).map_err(|e| CatalogError::Serialization(e.to_string()))?;
    Ok(calculate_checksum_bytes(&bytes))
}

/// Calculate the hex SHA-256 of raw bytes
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

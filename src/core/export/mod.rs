//! Staff record export
//!
//! - [`snapshot`] - Decoded snapshot of every stored record and its rendering
//! - [`checksum`] - SHA-256 checksum carried by each snapshot

pub mod checksum;
pub mod snapshot;

pub use snapshot::{ExportEntry, ExportFormat, ExportSnapshot};

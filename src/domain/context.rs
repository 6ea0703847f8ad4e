//! Error context extension trait
//!
//! Provides `.context()` / `.with_context()` for `Result<T, CatalogError>`, in the
//! spirit of `anyhow::Context`, so library code can annotate failures without
//! giving up the typed error.
//!
//! # Examples
//!
//! ```rust
//! use catalog::domain::Result;
//! use catalog::domain::context::ResultExt;
//!
//! fn read_export(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read export file: {}", path))
//! }
//! ```

use crate::domain::errors::CatalogError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error (evaluated eagerly)
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error, computing it only on failure
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CatalogError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

// I/O and serialization failures keep their variant so user_message() stays accurate.
fn wrap<C: std::fmt::Display>(error: CatalogError, context: C) -> CatalogError {
    match error {
        CatalogError::Io(msg) => CatalogError::Io(format!("{context}: {msg}")),
        CatalogError::Serialization(msg) => {
            CatalogError::Serialization(format!("{context}: {msg}"))
        }
        other => CatalogError::Other(format!("{context}: {other}")),
    }
}

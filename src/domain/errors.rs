//! Domain error types
//!
//! This module defines the error hierarchy for Catalog. Store backends report
//! [`StoreError`]; everything above the adapter layer works with [`CatalogError`].
//! No error is fatal to the kiosk: each one maps to a single human-readable message
//! through [`CatalogError::user_message`].

use thiserror::Error;

/// Message shown for both unknown names and wrong IDs during patient lookup
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid name or password.";

/// Fields that belong to the check-in screen rather than the consent form
const LOGIN_FIELDS: [&str; 2] = ["name", "id"];

/// Main Catalog error type
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A patient name collides with a reserved key, or a duplicate was rejected
    #[error("Conflicting name: {0}")]
    Conflict(String),

    /// No record exists under the requested name
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The supplied ID does not match the stored one
    #[error("Authentication error: {0}")]
    Auth(String),

    /// One or more required fields are empty or invalid
    #[error("Validation error: missing fields [{}]", missing_fields.join(", "))]
    Validation {
        /// Field labels in form order
        missing_fields: Vec<String>,
    },

    /// A stored blob could not be decoded
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Secret store failure
    #[error("Secret store error: {0}")]
    Store(#[from] StoreError),

    /// A write could not locate the record it was meant to update
    #[error("Write error: {0}")]
    Write(String),

    /// The device has no owner authentication configured
    #[error("Device authentication is not available")]
    AuthUnavailable,

    /// Device owner authentication was refused
    #[error("Device authentication failed: {0}")]
    AuthFailed(String),

    /// Device owner authentication never completed
    #[error("Device authentication timed out after {0} seconds")]
    AuthTimedOut(u64),

    /// A staff-only operation was attempted while the staff gate is locked
    #[error("Staff authentication is required")]
    StaffLocked,

    /// A session transition was requested from the wrong state
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Secret store errors
///
/// Errors reported by a [`SecretStore`](crate::adapters::secret_store::SecretStore)
/// backend. These don't expose backend-specific types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `add` was called for an account that already exists
    #[error("Duplicate entry")]
    Duplicate(String),

    /// The account does not exist
    #[error("Item not found")]
    NotFound(String),

    /// Any other backend failure
    #[error("Store failure: {0}")]
    Other(String),
}

impl CatalogError {
    /// Creates a validation error for the given field labels
    pub fn missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CatalogError::Validation {
            missing_fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the message shown to the person at the kiosk
    ///
    /// `NotFound` and `Auth` deliberately share one message so a lookup never
    /// reveals whether a name is registered.
    pub fn user_message(&self) -> &'static str {
        match self {
            CatalogError::Validation { missing_fields }
                if missing_fields
                    .iter()
                    .all(|f| LOGIN_FIELDS.contains(&f.as_str())) =>
            {
                "Missing information."
            }
            CatalogError::Validation { .. } => {
                "Missing fields. Please fill in all parts of the form!"
            }
            CatalogError::Conflict(_) => "Conflicting name.",
            CatalogError::NotFound(_) | CatalogError::Auth(_) => INVALID_CREDENTIALS_MESSAGE,
            CatalogError::Write(_) => "Could not submit entries.",
            CatalogError::AuthUnavailable => "Device authentication is not available.",
            CatalogError::AuthFailed(_) | CatalogError::AuthTimedOut(_) => {
                "Could not authenticate user."
            }
            CatalogError::StaffLocked => "Staff authentication is required.",
            CatalogError::InvalidState(_) => "Please log out before continuing.",
            CatalogError::Configuration(_) => "The kiosk is not configured correctly.",
            CatalogError::Store(_)
            | CatalogError::MalformedRecord(_)
            | CatalogError::Serialization(_)
            | CatalogError::Io(_)
            | CatalogError::Other(_) => "Internal saving error.",
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CatalogError {
    fn from(err: toml::de::Error) -> Self {
        CatalogError::Configuration(format!("TOML parse error: {err}"))
    }
}

//! Domain models and types for Catalog.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientName`], [`PatientId`])
//! - **Domain models** ([`PatientRecord`], [`ConsentForm`], [`Gender`])
//! - **Error types** ([`CatalogError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Names and IDs are distinct newtypes, so a lookup cannot accidentally swap them:
//!
//! ```rust
//! use catalog::domain::{PatientId, PatientName};
//!
//! # fn example() -> catalog::domain::Result<()> {
//! let name = PatientName::new("Alice")?;
//! let id = PatientId::new("3000")?;
//!
//! // This won't compile
//! // let wrong: PatientName = id;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, CatalogError>`]. The kiosk shows
//! [`CatalogError::user_message`] to the patient:
//!
//! ```rust
//! use catalog::domain::{CatalogError, PatientName};
//!
//! let err = PatientName::new("").unwrap_err();
//! assert_eq!(err.user_message(), "Missing information.");
//! ```

pub mod consent;
pub mod context;
pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use consent::{ConsentForm, Gender, CONSENT_FORM_DOCUMENT};
pub use errors::{CatalogError, StoreError, INVALID_CREDENTIALS_MESSAGE};
pub use ids::{PatientId, PatientName, COUNTER_KEY};
pub use record::PatientRecord;
pub use result::Result;

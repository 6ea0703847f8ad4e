//! Domain identifier types with validation
//!
//! Newtype wrappers for the two halves of a patient's credentials. Both are
//! trimmed on construction so that stray whitespace typed at the kiosk never
//! produces a second, unreachable record.

use crate::domain::errors::CatalogError;
use crate::domain::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reserved account name of the sequential ID counter
pub const COUNTER_KEY: &str = "Count";

/// Patient name newtype wrapper
///
/// The legal name typed at check-in. It is the key of the patient's record.
///
/// # Examples
///
/// ```
/// use catalog::domain::ids::PatientName;
///
/// let name = PatientName::new("  Alice Smith ").unwrap();
/// assert_eq!(name.as_str(), "Alice Smith");
/// assert!(!name.is_reserved());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientName(String);

impl PatientName {
    /// Creates a new PatientName, rejecting blank input
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::missing(["name"]));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether this name collides with the counter record's key
    pub fn is_reserved(&self) -> bool {
        self.0 == COUNTER_KEY
    }
}

impl fmt::Display for PatientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientName {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for PatientName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Patient ID newtype wrapper
///
/// Either a password/PIN chosen by the patient or a sequential number assigned
/// by the kiosk. Acts as the second authentication factor for a name.
///
/// # Examples
///
/// ```
/// use catalog::domain::ids::PatientId;
///
/// let id = PatientId::new("3000").unwrap();
/// assert_eq!(id.sequence_number(), Some(3000));
///
/// let pin = PatientId::new("tulip").unwrap();
/// assert_eq!(pin.sequence_number(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId, rejecting blank input
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::missing(["id"]));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Creates a PatientId from a counter value
    pub fn from_sequence(value: u64) -> Self {
        Self(value.to_string())
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// The numeric value of the ID, if it is purely numeric
    pub fn sequence_number(&self) -> Option<u64> {
        if self.0.chars().all(|c| c.is_ascii_digit()) {
            self.0.parse().ok()
        } else {
            None
        }
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_name_creation() {
        let name = PatientName::new("Alice").unwrap();
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_patient_name_empty_fails() {
        assert!(matches!(
            PatientName::new("   "),
            Err(CatalogError::Validation { .. })
        ));
    }

    #[test]
    fn test_reserved_name_detected_after_trim() {
        assert!(PatientName::new(" Count ").unwrap().is_reserved());
        assert!(!PatientName::new("Counter").unwrap().is_reserved());
        assert!(!PatientName::new("count").unwrap().is_reserved());
    }

    #[test]
    fn test_patient_id_sequence_number() {
        assert_eq!(PatientId::new("3000").unwrap().sequence_number(), Some(3000));
        assert_eq!(PatientId::new("+12").unwrap().sequence_number(), None);
        assert_eq!(PatientId::new("12ab").unwrap().sequence_number(), None);
        assert_eq!(PatientId::from_sequence(3001).as_str(), "3001");
    }

    #[test]
    fn test_patient_id_empty_fails() {
        let err = PatientId::new("").unwrap_err();
        assert_eq!(err.user_message(), "Missing information.");
    }

    #[test]
    fn test_patient_name_serialization() {
        let name = PatientName::new("Alice").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        let deserialized: PatientName = serde_json::from_str(&json).unwrap();
        assert_eq!(name, deserialized);
    }
}

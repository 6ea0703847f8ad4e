//! Patient record domain model
//!
//! A [`PatientRecord`] is what the store persists per account: the name, the ID
//! acting as the second factor, the consent form fields and the (still unused)
//! invoice fields.

use super::consent::{ConsentForm, COMPLETENESS_FIELD_INDEX, CONSENT_FORM_DOCUMENT};
use super::ids::{PatientId, PatientName};
use crate::domain::result::Result;
use serde::{Deserialize, Serialize};

/// Stored patient record
///
/// Name and ID are kept as plain strings because the counter record shares this
/// shape under the reserved `"Count"` key.
///
/// # Examples
///
/// ```
/// use catalog::domain::ids::{PatientId, PatientName};
/// use catalog::domain::record::PatientRecord;
///
/// let record = PatientRecord::new(
///     &PatientName::new("Alice").unwrap(),
///     &PatientId::new("3000").unwrap(),
/// );
/// assert!(record.consent_form.is_empty());
/// assert!(!record.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Legal name, the record key
    pub name: String,

    /// Password/PIN or kiosk-assigned sequence number
    pub id: String,

    /// Consent form fields in stored order; empty until submission
    pub consent_form: Vec<String>,

    /// Reserved for invoices; carried through rewrites untouched
    pub invoice: Vec<String>,
}

impl PatientRecord {
    /// Creates a freshly registered record with no forms
    pub fn new(name: &PatientName, id: &PatientId) -> Self {
        Self {
            name: name.as_str().to_string(),
            id: id.as_str().to_string(),
            consent_form: Vec::new(),
            invoice: Vec::new(),
        }
    }

    /// Whether the consent form has been filled and submitted
    pub fn is_complete(&self) -> bool {
        !self.consent_form.is_empty()
            && self
                .consent_form
                .get(COMPLETENESS_FIELD_INDEX)
                .is_some_and(|f| !f.is_empty())
    }

    /// Typed view of the consent form, if one was submitted
    ///
    /// # Errors
    ///
    /// Returns `MalformedRecord` if stored fields do not form a valid consent form.
    pub fn consent(&self) -> Result<Option<ConsentForm>> {
        if self.consent_form.is_empty() {
            return Ok(None);
        }
        ConsentForm::from_fields(&self.consent_form).map(Some)
    }

    /// Names of the documents this patient has completed
    pub fn completed_documents(&self) -> Vec<&'static str> {
        let mut documents = Vec::new();
        if self.is_complete() {
            documents.push(CONSENT_FORM_DOCUMENT);
        }
        documents
    }

    /// Returns a copy with the consent form replaced and everything else preserved
    pub fn with_consent_form(&self, form: &ConsentForm) -> Self {
        Self {
            name: self.name.clone(),
            id: self.id.clone(),
            consent_form: form.to_fields(),
            invoice: self.invoice.clone(),
        }
    }
}

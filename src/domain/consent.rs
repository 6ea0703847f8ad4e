//! Consent form domain model
//!
//! The typed view of a submitted intake form. On disk a consent form is an
//! ordered list of string fields (see [`ConsentForm::to_fields`]); everywhere else
//! the crate works with named fields.

use crate::domain::errors::CatalogError;
use crate::domain::result::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display name of the consent form document
pub const CONSENT_FORM_DOCUMENT: &str = "Patient Consent Form";

/// Number of stored fields in a consent form
pub const CONSENT_FIELD_COUNT: usize = 12;

/// Position of the reason-for-visit field, the last one a patient fills in.
/// A record is complete once this field is non-empty.
pub const COMPLETENESS_FIELD_INDEX: usize = 10;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Gender options offered on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// All selectable options, in display order
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    /// Returns the stored label
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::missing(["gender"]))
    }
}

/// A fully validated, submitted consent form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentForm {
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub address: String,
    pub postal_code: String,
    pub home_phone: String,
    pub cell_phone: String,
    pub email: String,
    pub emergency_contact: String,
    pub relationship: String,
    pub contact_phone: String,
    pub reason_for_visit: String,
    /// Kiosk-local date the form was submitted
    pub submitted_on: NaiveDate,
}

impl ConsentForm {
    /// Flattens the form into its stored field order
    pub fn to_fields(&self) -> Vec<String> {
        vec![
            self.birth_date.format(DATE_FORMAT).to_string(),
            self.gender.as_str().to_string(),
            self.address.clone(),
            self.postal_code.clone(),
            self.home_phone.clone(),
            self.cell_phone.clone(),
            self.email.clone(),
            self.emergency_contact.clone(),
            self.relationship.clone(),
            self.contact_phone.clone(),
            self.reason_for_visit.clone(),
            self.submitted_on.format(DATE_FORMAT).to_string(),
        ]
    }

    /// Rebuilds a form from its stored fields
    ///
    /// # Errors
    ///
    /// Returns `MalformedRecord` if the field count is wrong or a date or gender
    /// field does not parse.
    pub fn from_fields(fields: &[String]) -> Result<Self> {
        if fields.len() != CONSENT_FIELD_COUNT {
            return Err(CatalogError::MalformedRecord(format!(
                "consent form has {} fields, expected {}",
                fields.len(),
                CONSENT_FIELD_COUNT
            )));
        }

        let date = |idx: usize, label: &str| {
            NaiveDate::parse_from_str(&fields[idx], DATE_FORMAT).map_err(|e| {
                CatalogError::MalformedRecord(format!("invalid {label} '{}': {e}", fields[idx]))
            })
        };

        let gender = fields[1].parse::<Gender>().map_err(|_| {
            CatalogError::MalformedRecord(format!("invalid gender '{}'", fields[1]))
        })?;

        Ok(Self {
            birth_date: date(0, "birth date")?,
            gender,
            address: fields[2].clone(),
            postal_code: fields[3].clone(),
            home_phone: fields[4].clone(),
            cell_phone: fields[5].clone(),
            email: fields[6].clone(),
            emergency_contact: fields[7].clone(),
            relationship: fields[8].clone(),
            contact_phone: fields[9].clone(),
            reason_for_visit: fields[COMPLETENESS_FIELD_INDEX].clone(),
            submitted_on: date(11, "submission date")?,
        })
    }
}

//! Intake form validator
//!
//! [`IntakeForm`] is the draft a patient edits on the kiosk. Every text edit
//! goes through [`IntakeForm::set_text`], which strips characters outside the
//! field's class, and submission goes through [`IntakeForm::validate`], which
//! turns a fully filled draft into a [`ConsentForm`].
//!
//! # Examples
//!
//! ```
//! use catalog::core::intake::{IntakeForm, TextField};
//!
//! let mut form = IntakeForm::default();
//! assert!(form.set_text(TextField::PostalCode, "a1b 2c3!"));
//! assert_eq!(form.text(TextField::PostalCode), "A1B2C3");
//! assert!(!form.set_text(TextField::PostalCode, "A1B2C3D"));
//! assert_eq!(form.text(TextField::PostalCode), "A1B2C3");
//! ```

use crate::domain::{CatalogError, ConsentForm, Gender, Result};
use chrono::NaiveDate;

const BIRTH_DATE_LABEL: &str = "birth date";
const GENDER_LABEL: &str = "gender";

/// Free-text fields on the intake form, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Address,
    PostalCode,
    HomePhone,
    CellPhone,
    Email,
    EmergencyContact,
    Relationship,
    ContactPhone,
    ReasonForVisit,
}

impl TextField {
    /// All text fields in form order
    pub const ALL: [TextField; 9] = [
        TextField::Address,
        TextField::PostalCode,
        TextField::HomePhone,
        TextField::CellPhone,
        TextField::Email,
        TextField::EmergencyContact,
        TextField::Relationship,
        TextField::ContactPhone,
        TextField::ReasonForVisit,
    ];

    /// Label used when reporting the field as missing
    pub fn label(&self) -> &'static str {
        match self {
            TextField::Address => "address",
            TextField::PostalCode => "postal code",
            TextField::HomePhone => "home phone",
            TextField::CellPhone => "cell phone",
            TextField::Email => "email",
            TextField::EmergencyContact => "emergency contact",
            TextField::Relationship => "relationship",
            TextField::ContactPhone => "contact phone",
            TextField::ReasonForVisit => "reason for visit",
        }
    }

    /// Whether `c` may appear in this field
    pub fn allows(&self, c: char) -> bool {
        match self {
            TextField::Address => c.is_ascii_alphanumeric() || matches!(c, ',' | '.' | ' '),
            TextField::PostalCode => c.is_ascii_alphanumeric(),
            TextField::HomePhone | TextField::CellPhone | TextField::ContactPhone => {
                c.is_ascii_digit() || matches!(c, '(' | ')' | '-' | ' ')
            }
            TextField::Email => c.is_ascii_alphanumeric() || matches!(c, '@' | '.'),
            TextField::EmergencyContact | TextField::Relationship | TextField::ReasonForVisit => {
                c.is_ascii_alphanumeric() || c == ' '
            }
        }
    }

    /// Maximum length in characters, if the field has one
    pub fn max_len(&self) -> Option<usize> {
        match self {
            TextField::PostalCode => Some(6),
            _ => None,
        }
    }

    /// Strips disallowed characters and applies the field's casing
    pub fn sanitize(&self, input: &str) -> String {
        let kept = input.chars().filter(|&c| self.allows(c));
        match self {
            TextField::PostalCode => kept.map(|c| c.to_ascii_uppercase()).collect(),
            _ => kept.collect(),
        }
    }

    /// Whether `value` is something [`IntakeForm::set_text`] could have produced
    pub fn accepts(&self, value: &str) -> bool {
        let within_len = self
            .max_len()
            .map_or(true, |max| value.chars().count() <= max);
        within_len && self.sanitize(value) == value
    }
}

/// In-progress intake form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeForm {
    birth_date: Option<NaiveDate>,
    gender: Option<Gender>,
    address: String,
    postal_code: String,
    home_phone: String,
    cell_phone: String,
    email: String,
    emergency_contact: String,
    relationship: String,
    contact_phone: String,
    reason_for_visit: String,
}

impl IntakeForm {
    /// Pre-fills a draft from a previous submission
    pub fn from_consent(form: &ConsentForm) -> Self {
        Self {
            birth_date: Some(form.birth_date),
            gender: Some(form.gender),
            address: form.address.clone(),
            postal_code: form.postal_code.clone(),
            home_phone: form.home_phone.clone(),
            cell_phone: form.cell_phone.clone(),
            email: form.email.clone(),
            emergency_contact: form.emergency_contact.clone(),
            relationship: form.relationship.clone(),
            contact_phone: form.contact_phone.clone(),
            reason_for_visit: form.reason_for_visit.clone(),
        }
    }

    /// Current value of a text field
    pub fn text(&self, field: TextField) -> &str {
        self.slot(field)
    }

    /// Replaces a text field with the sanitized `input`
    ///
    /// Returns `false`, leaving the field unchanged, when the sanitized value
    /// would exceed the field's maximum length.
    pub fn set_text(&mut self, field: TextField, input: &str) -> bool {
        let sanitized = field.sanitize(input);
        if let Some(max) = field.max_len() {
            if sanitized.chars().count() > max {
                return false;
            }
        }
        *self.slot_mut(field) = sanitized;
        true
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn set_birth_date(&mut self, date: NaiveDate) {
        self.birth_date = Some(date);
    }

    /// Sets the birth date from `YYYY-MM-DD` text
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the birth date if the text does not parse.
    pub fn set_birth_date_str(&mut self, input: &str) -> Result<()> {
        let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map_err(|_| CatalogError::missing([BIRTH_DATE_LABEL]))?;
        self.birth_date = Some(date);
        Ok(())
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = Some(gender);
    }

    /// Labels of every unfilled field, in form order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.birth_date.is_none() {
            missing.push(BIRTH_DATE_LABEL);
        }
        if self.gender.is_none() {
            missing.push(GENDER_LABEL);
        }
        missing.extend(
            TextField::ALL
                .into_iter()
                .filter(|&field| self.slot(field).trim().is_empty())
                .map(|field| field.label()),
        );
        missing
    }

    /// Labels of every filled text field holding characters its class rejects,
    /// or more than its maximum length, in form order
    ///
    /// Drafts edited through [`set_text`](Self::set_text) never have any; a
    /// draft pre-filled with [`from_consent`](Self::from_consent) might.
    pub fn rejected_fields(&self) -> Vec<&'static str> {
        TextField::ALL
            .into_iter()
            .filter(|&field| {
                let value = self.slot(field);
                !value.trim().is_empty() && !field.accepts(value)
            })
            .map(|field| field.label())
            .collect()
    }

    /// Checks that every field is filled and within its character rules, and
    /// builds the consent form
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` listing every missing or rejected
    /// field in form order.
    pub fn validate(&self, submitted_on: NaiveDate) -> Result<ConsentForm> {
        let mut unusable = self.missing_fields();
        let rejected = self.rejected_fields();
        if !rejected.is_empty() {
            unusable.extend(rejected);
            unusable.sort_by_key(|label| form_position(label));
        }
        let (Some(birth_date), Some(gender), true) =
            (self.birth_date, self.gender, unusable.is_empty())
        else {
            return Err(CatalogError::missing(unusable));
        };

        Ok(ConsentForm {
            birth_date,
            gender,
            address: self.address.clone(),
            postal_code: self.postal_code.clone(),
            home_phone: self.home_phone.clone(),
            cell_phone: self.cell_phone.clone(),
            email: self.email.clone(),
            emergency_contact: self.emergency_contact.clone(),
            relationship: self.relationship.clone(),
            contact_phone: self.contact_phone.clone(),
            reason_for_visit: self.reason_for_visit.clone(),
            submitted_on,
        })
    }

    fn slot(&self, field: TextField) -> &String {
        match field {
            TextField::Address => &self.address,
            TextField::PostalCode => &self.postal_code,
            TextField::HomePhone => &self.home_phone,
            TextField::CellPhone => &self.cell_phone,
            TextField::Email => &self.email,
            TextField::EmergencyContact => &self.emergency_contact,
            TextField::Relationship => &self.relationship,
            TextField::ContactPhone => &self.contact_phone,
            TextField::ReasonForVisit => &self.reason_for_visit,
        }
    }

    fn slot_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Address => &mut self.address,
            TextField::PostalCode => &mut self.postal_code,
            TextField::HomePhone => &mut self.home_phone,
            TextField::CellPhone => &mut self.cell_phone,
            TextField::Email => &mut self.email,
            TextField::EmergencyContact => &mut self.emergency_contact,
            TextField::Relationship => &mut self.relationship,
            TextField::ContactPhone => &mut self.contact_phone,
            TextField::ReasonForVisit => &mut self.reason_for_visit,
        }
    }
}

fn form_position(label: &str) -> usize {
    match label {
        BIRTH_DATE_LABEL => 0,
        GENDER_LABEL => 1,
        _ => TextField::ALL
            .iter()
            .position(|field| field.label() == label)
            .map_or(usize::MAX, |i| i + 2),
    }
}

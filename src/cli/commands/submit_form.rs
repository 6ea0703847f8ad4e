//! Submit-form command implementation
//!
//! Checks the patient in, opens their consent form (pre-filled from any
//! previous submission), applies the given fields and submits it.

use super::{open_session, report_error, EXIT_OK};
use crate::core::intake::{IntakeForm, TextField};
use crate::domain::{CatalogError, Gender};
use clap::Args;

/// Arguments for the submit-form command
#[derive(Args, Debug, Default)]
pub struct SubmitFormArgs {
    /// Patient's full name
    pub name: String,

    /// Patient ID or password
    #[arg(long)]
    pub id: String,

    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    pub birth_date: Option<String>,

    /// Male, Female or Other
    #[arg(long)]
    pub gender: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    /// Up to 6 letters and digits
    #[arg(long)]
    pub postal_code: Option<String>,

    #[arg(long)]
    pub home_phone: Option<String>,

    #[arg(long)]
    pub cell_phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Emergency contact's name
    #[arg(long)]
    pub emergency_contact: Option<String>,

    /// Emergency contact's relationship to the patient
    #[arg(long)]
    pub relationship: Option<String>,

    /// Emergency contact's phone number
    #[arg(long)]
    pub contact_phone: Option<String>,

    #[arg(long)]
    pub reason: Option<String>,
}

impl SubmitFormArgs {
    /// Execute the submit-form command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (_config, mut session) = match open_session(config_path) {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };

        if let Err(e) = session.check_in_returning(&self.name, &self.id) {
            return Ok(report_error(&e));
        }

        let mut draft = match session.begin_intake() {
            Ok(d) => d,
            Err(e) => return Ok(report_error(&e)),
        };

        if let Err(e) = self.apply(&mut draft) {
            session.cancel_intake();
            return Ok(report_error(&e));
        }

        let code = match session.submit_intake(&draft) {
            Ok(()) => {
                println!("✅ Consent form submitted. Thank you!");
                EXIT_OK
            }
            Err(e) => report_error(&e),
        };

        session.logout();
        Ok(code)
    }

    /// Applies the provided fields to the draft
    fn apply(&self, draft: &mut IntakeForm) -> crate::domain::Result<()> {
        if let Some(ref date) = self.birth_date {
            draft.set_birth_date_str(date)?;
        }
        if let Some(ref gender) = self.gender {
            draft.set_gender(gender.parse::<Gender>()?);
        }

        let fields = [
            (TextField::Address, &self.address),
            (TextField::PostalCode, &self.postal_code),
            (TextField::HomePhone, &self.home_phone),
            (TextField::CellPhone, &self.cell_phone),
            (TextField::Email, &self.email),
            (TextField::EmergencyContact, &self.emergency_contact),
            (TextField::Relationship, &self.relationship),
            (TextField::ContactPhone, &self.contact_phone),
            (TextField::ReasonForVisit, &self.reason),
        ];
        for (field, value) in fields {
            let Some(value) = value else { continue };
            if !draft.set_text(field, value) {
                println!("⚠️  {} is too long", field.label());
                return Err(CatalogError::missing([field.label()]));
            }
            if draft.text(field) != value.as_str() {
                tracing::debug!(field = field.label(), "Disallowed characters removed");
            }
        }
        Ok(())
    }
}

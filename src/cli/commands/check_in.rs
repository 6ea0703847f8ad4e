//! Check-in command implementation
//!
//! Logs in a returning patient and shows their patient log.

use super::{open_session, report_error, EXIT_OK};
use clap::Args;

/// Arguments for the check-in command
#[derive(Args, Debug)]
pub struct CheckInArgs {
    /// Patient's full name
    pub name: String,

    /// Patient ID or password chosen at registration
    #[arg(long)]
    pub id: String,
}

impl CheckInArgs {
    /// Execute the check-in command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (_config, mut session) = match open_session(config_path) {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };

        let complete = match session.check_in_returning(&self.name, &self.id) {
            Ok(patient) => {
                println!("👋 Welcome back, {}", patient.name());
                patient.is_complete()
            }
            Err(e) => return Ok(report_error(&e)),
        };

        let documents = match session.completed_documents() {
            Ok(d) => d,
            Err(e) => return Ok(report_error(&e)),
        };

        println!();
        println!("Patient Log:");
        if documents.is_empty() {
            println!("  No completed documents");
        }
        for document in documents {
            println!("  ✅ {document}");
        }
        if !complete {
            println!();
            println!("Please fill in the consent form: catalog submit-form ...");
        }

        session.logout();
        Ok(EXIT_OK)
    }
}

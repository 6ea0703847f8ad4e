//! Register command implementation
//!
//! Registers a new patient, as the kiosk's "New patient" screen does.

use super::{open_session, report_error, EXIT_OK};
use clap::Args;

/// Arguments for the register command
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Patient's full name
    pub name: String,

    /// Password or PIN to use instead of an assigned patient ID
    #[arg(long, default_value = "")]
    pub id: String,
}

impl RegisterArgs {
    /// Execute the register command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (_config, mut session) = match open_session(config_path) {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };

        let patient = match session.check_in_new(&self.name, &self.id) {
            Ok(p) => p,
            Err(e) => return Ok(report_error(&e)),
        };

        println!("✅ Registered {}", patient.name());
        if self.id.trim().is_empty() {
            println!("   Your patient ID is {}. Keep it to check in next time.", patient.id());
        }
        println!("   Next: catalog submit-form \"{}\" --id <ID> ...", patient.name());

        session.logout();
        Ok(EXIT_OK)
    }
}

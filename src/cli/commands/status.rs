//! Status command implementation
//!
//! Staff-only summary of the record store.

use super::{open_session, report_error, unlock_staff, EXIT_OK};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Staff passcode
    #[arg(long, env = "CATALOG_STAFF_PASSCODE", hide_env_values = true)]
    pub passcode: Option<String>,

    /// Print the status as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking store status");

        let (config, mut session) = match open_session(config_path) {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };
        if let Err(code) = unlock_staff(&config, &mut session, self.passcode.as_deref()).await {
            return Ok(code);
        }

        let status = match session.store_status() {
            Ok(s) => s,
            Err(e) => return Ok(report_error(&e)),
        };
        session.lock_staff();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&status)?);
            return Ok(EXIT_OK);
        }

        println!("📊 Store Status");
        println!();
        println!("  Backend: {}", status.backend);
        if config.store.backend == crate::config::StoreBackend::File {
            println!("  Path: {}", config.store.path);
        }
        println!("  Patients: {}", status.patients);
        println!("  Consent forms complete: {}", status.complete);
        println!(
            "  Next patient ID: {}",
            status
                .next_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| format!("{} (not yet assigned)", config.store.counter_start))
        );
        if status.unreadable > 0 {
            println!("  ⚠️  Unreadable entries: {}", status.unreadable);
        }
        println!();
        Ok(EXIT_OK)
    }
}

//! Export command implementation
//!
//! Staff-only export of every stored record, as text or JSON.

use super::{open_session, report_error, unlock_staff, EXIT_CONFIG, EXIT_OK};
use crate::core::export::ExportFormat;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Staff passcode
    #[arg(long, env = "CATALOG_STAFF_PASSCODE", hide_env_values = true)]
    pub passcode: Option<String>,

    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let format: ExportFormat = match self.format.parse() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("{e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let (config, mut session) = match open_session(config_path) {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };
        if let Err(code) = unlock_staff(&config, &mut session, self.passcode.as_deref()).await {
            return Ok(code);
        }

        let snapshot = match session.export_records() {
            Ok(s) => s,
            Err(e) => return Ok(report_error(&e)),
        };
        session.lock_staff();

        match &self.output {
            Some(path) => {
                if let Err(e) = snapshot.write_to(path, format) {
                    return Ok(report_error(&e));
                }
                println!("✅ Exported {} record(s) to {}", snapshot.entries.len(), path.display());
                println!("   Export ID: {}", snapshot.export_id);
                println!("   Checksum: {}", snapshot.checksum);
            }
            None => match snapshot.render(format) {
                Ok(rendered) => print!("{rendered}"),
                Err(e) => return Ok(report_error(&e)),
            },
        }

        if !snapshot.malformed.is_empty() {
            eprintln!(
                "⚠️  Unreadable entries ({}): {}",
                snapshot.malformed.len(),
                snapshot.malformed.join(", ")
            );
        }
        Ok(EXIT_OK)
    }
}

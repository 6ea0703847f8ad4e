//! Purge command implementation
//!
//! Staff-only, irreversible deletion of every record and the ID counter.

use super::{open_session, report_error, unlock_staff, EXIT_OK};
use clap::Args;
use std::io::{self, Write};

/// Arguments for the purge command
#[derive(Args, Debug)]
pub struct PurgeArgs {
    /// Staff passcode
    #[arg(long, env = "CATALOG_STAFF_PASSCODE", hide_env_values = true)]
    pub passcode: Option<String>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl PurgeArgs {
    /// Execute the purge command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (config, mut session) = match open_session(config_path) {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };
        if let Err(code) = unlock_staff(&config, &mut session, self.passcode.as_deref()).await {
            return Ok(code);
        }

        if !self.yes {
            print!("Delete ALL patient records? This cannot be undone. [y/N]: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Purge cancelled.");
                session.lock_staff();
                return Ok(EXIT_OK);
            }
        }

        let code = match session.purge_records() {
            Ok(()) => {
                println!("🗑️  All patient records deleted");
                EXIT_OK
            }
            Err(e) => report_error(&e),
        };
        session.lock_staff();
        Ok(code)
    }
}

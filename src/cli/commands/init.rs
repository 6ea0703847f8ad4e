//! Init command implementation
//!
//! Writes a starter `catalog.toml`.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use crate::adapters::device_auth::hash_passcode;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "catalog.toml")]
    pub output: String,

    /// Include comments describing every setting
    #[arg(long)]
    pub with_examples: bool,

    /// Staff passcode to store (as its SHA-256 digest)
    #[arg(long, env = "CATALOG_STAFF_PASSCODE", hide_env_values = true)]
    pub staff_passcode: Option<String>,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Catalog configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let digest = self
            .staff_passcode
            .as_deref()
            .map(hash_passcode)
            .unwrap_or_default();
        let content = if self.with_examples {
            Self::generate_config_with_examples(&digest)
        } else {
            Self::generate_minimal_config(&digest)
        };

        match fs::write(&self.output, content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                if digest.is_empty() {
                    println!("  1. Set staff.passcode_sha256 (or re-run with --staff-passcode)");
                } else {
                    println!("  1. Staff passcode stored as a SHA-256 digest");
                }
                println!("  2. Validate configuration: catalog validate-config");
                println!("  3. Register a patient: catalog register \"<name>\"");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    fn generate_minimal_config(digest: &str) -> String {
        format!(
            r#"# Catalog Configuration File

[application]
log_level = "info"

[store]
backend = "file"
path = "./catalog-data/records.json"
counter_start = 3000
duplicate_names = "replace"

[staff]
passcode_sha256 = "{digest}"
auth_timeout_seconds = 60
unlock_ttl_seconds = 300

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        )
    }

    fn generate_config_with_examples(digest: &str) -> String {
        format!(
            r#"# Catalog Configuration File
# Clinic check-in kiosk
#
# Values may reference environment variables as ${{VAR_NAME}}.
# Any setting can be overridden with CATALOG_<SECTION>_<KEY>,
# e.g. CATALOG_STORE_PATH or CATALOG_STAFF_UNLOCK_TTL_SECONDS.

[application]
# trace | debug | info | warn | error
log_level = "info"

[store]
# file: JSON document on disk (written atomically, owner-only permissions)
# memory: records are lost when the process exits
backend = "file"
path = "./catalog-data/records.json"

# First sequential patient ID handed out
counter_start = 3000

# What happens when a name that already has a record registers again
# replace: the new registration overwrites the old record
# reject: the registration fails with "Conflicting name."
duplicate_names = "replace"

[staff]
# Hex SHA-256 of the staff passcode; leave empty to disable staff access
passcode_sha256 = "{digest}"

# Seconds to wait for the staff passcode before giving up
auth_timeout_seconds = 60

# Seconds the staff gate stays unlocked
unlock_ttl_seconds = 300

[logging]
# JSON log files with rotation (daily | hourly)
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        )
    }
}

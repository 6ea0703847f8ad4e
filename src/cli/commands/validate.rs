//! Validate config command implementation

use super::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let staff_access = match config.staff.passcode_sha256 {
            Some(ref digest) if !digest.expose_secret().is_empty() => "enabled",
            _ => "disabled (no passcode digest)",
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Store Backend: {:?}", config.store.backend);
        println!("  Store Path: {}", config.store.path);
        println!("  Counter Start: {}", config.store.counter_start);
        println!("  Duplicate Names: {:?}", config.store.duplicate_names);
        println!("  Staff Access: {staff_access}");
        println!("  Auth Timeout: {}s", config.staff.auth_timeout_seconds);
        println!("  Unlock TTL: {}s", config.staff.unlock_ttl_seconds);
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "off"
            }
        );
        println!();
        Ok(EXIT_OK)
    }
}

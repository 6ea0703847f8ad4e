//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Catalog using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Catalog - Clinic check-in kiosk
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(version, about, long_about = None)]
#[command(author = "Catalog Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "catalog.toml", env = "CATALOG_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, env = "CATALOG_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Register a new patient
    Register(commands::register::RegisterArgs),

    /// Check in a returning patient and show their documents
    CheckIn(commands::check_in::CheckInArgs),

    /// Fill in and submit the patient consent form
    SubmitForm(commands::submit_form::SubmitFormArgs),

    /// Show record store status (staff)
    Status(commands::status::StatusArgs),

    /// Export all records (staff)
    Export(commands::export::ExportArgs),

    /// Delete all records (staff)
    Purge(commands::purge::PurgeArgs),
}

impl Commands {
    /// Execute the command, returning the process exit code
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self {
            Commands::Init(args) => args.execute().await,
            Commands::ValidateConfig(args) => args.execute(config_path).await,
            Commands::Register(args) => args.execute(config_path).await,
            Commands::CheckIn(args) => args.execute(config_path).await,
            Commands::SubmitForm(args) => args.execute(config_path).await,
            Commands::Status(args) => args.execute(config_path).await,
            Commands::Export(args) => args.execute(config_path).await,
            Commands::Purge(args) => args.execute(config_path).await,
        }
    }
}

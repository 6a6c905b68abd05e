//! machine-sync CLI library

pub mod commands;
pub mod error;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};
use machine_sync_common::telemetry::{LogFormat, TelemetryConfig, LOG_FORMAT_ENV};

/// machine-sync - Convert Cluster API machines into Machine API machines
#[derive(Parser, Debug)]
#[command(name = "machine-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log line format (json or text)
    #[arg(long, env = LOG_FORMAT_ENV, default_value = "text", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert Cluster API manifests into a Machine API Machine or MachineSet
    Convert(commands::convert::ConvertArgs),
}

impl Cli {
    /// Telemetry settings selected on the command line
    pub fn telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig {
            service_name: "machine-sync".to_string(),
            format: self.log_format,
        }
    }

    /// Run the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Convert(args) => commands::convert::run(args),
        }
    }
}

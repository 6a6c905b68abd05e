//! machine-sync CLI
//!
//! Converts Cluster API machines backed by IBM Cloud PowerVS into their
//! Machine API equivalents.

use std::process::ExitCode;

use clap::Parser;

use machine_sync_cli::Cli;
use machine_sync_common::telemetry::init_telemetry;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_telemetry(cli.telemetry_config()) {
        eprintln!("warning: {e}");
    }

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.report());
            ExitCode::FAILURE
        }
    }
}

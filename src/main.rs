//! # Framework Provisioner CLI
//!
//! This is the binary entry point for the `framework-provisioner` tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the requested targets.
//! - Reporting a failure once and exiting with the failing command's status.
//!
//! The provisioning logic lives in the library crate; the binary is a thin
//! wrapper around it.

mod cli;
mod commands;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            let code = err
                .downcast_ref::<framework_provisioner::error::Error>()
                .map(|e| e.exit_code())
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

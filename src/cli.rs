//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::Parser;

use crate::commands;
use framework_provisioner::output::OutputConfig;

/// Provision a relocatable Python.framework for the app bundle
#[derive(Parser, Debug)]
#[command(name = "framework-provisioner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    provision: commands::ProvisionArgs,

    /// List targets, their dependencies, and whether their artifacts exist
    #[arg(short, long)]
    list: bool,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    ///
    /// Without this flag, `RUST_LOG` is honoured and defaults to `warn`.
    #[arg(
        long,
        value_name = "LEVEL",
        value_parser = PossibleValuesParser::new(["off", "error", "warn", "info", "debug", "trace"])
    )]
    log_level: Option<String>,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(self.log_level.as_deref());
        let output = OutputConfig::from_env_and_flag(&self.color);

        if self.list {
            commands::list::execute(&self.provision, &output)
        } else {
            commands::run::execute(&self.provision, &output)
        }
    }
}

fn init_logging(level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.format_timestamp(None);
    // a logger may already be installed when embedded in tests
    let _ = builder.try_init();
}

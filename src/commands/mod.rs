//! # CLI Command Implementations
//!
//! The tool has no subcommands: its positional arguments are target names.
//! What it does with them is split into two modules:
//!
//! - `run`: bring the targets up to date, or print the plan with `--dry-run`.
//! - `list`: show the target graph with `--list`.
//!
//! Both share [`ProvisionArgs`] and [`Workspace::load`], which layer the
//! configuration and assemble the orchestrator for the working directory.

pub mod list;
pub mod run;

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use framework_provisioner::artifacts::DiskArtifacts;
use framework_provisioner::config::Config;
use framework_provisioner::defaults;
use framework_provisioner::orchestrator::Orchestrator;
use framework_provisioner::recipe;
use framework_provisioner::runner::SystemRunner;

/// Arguments shared by running and listing
#[derive(Args, Debug, Clone)]
pub struct ProvisionArgs {
    /// Targets to bring up to date: all, Python.framework,
    /// relocatable-python, or clean
    #[arg(value_name = "TARGET", default_value = defaults::DEFAULT_TARGET)]
    pub targets: Vec<String>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Path to a TOML configuration file (defaults to provision.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Python version to build (overrides PYTHON_VERSION)
    #[arg(long, value_name = "VERSION")]
    pub python_version: Option<String>,

    /// Minimum macOS version to target (overrides OS_VERSION)
    #[arg(long, value_name = "VERSION")]
    pub os_version: Option<String>,

    /// Disable pip's cache and user site-packages during install
    /// (also enabled by PIP_NO_CACHE_DIR)
    #[arg(long)]
    pub no_cache: bool,

    /// Print the commands that would run without running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Everything a command needs to act on one working directory.
pub struct Workspace {
    pub work_dir: PathBuf,
    pub config: Config,
    pub orchestrator: Orchestrator,
}

impl Workspace {
    /// Resolve the working directory, layer the configuration (file, then
    /// environment, then flags), and build the orchestrator.
    pub fn load(args: &ProvisionArgs) -> Result<Self> {
        let work_dir = match &args.directory {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to get current directory")?,
        };
        if !work_dir.is_dir() {
            anyhow::bail!("Working directory not found: {}", work_dir.display());
        }

        let mut config = Config::load(args.config.as_deref(), &work_dir)?;
        config.apply_process_env();
        apply_flags(&mut config, args);
        config.validate()?;

        let graph = recipe::provisioning_graph(&config)?;
        let orchestrator = Orchestrator::new(
            graph,
            Box::new(SystemRunner::new(&work_dir)),
            Box::new(DiskArtifacts::new(&work_dir)),
        );

        Ok(Self {
            work_dir,
            config,
            orchestrator,
        })
    }
}

fn apply_flags(config: &mut Config, args: &ProvisionArgs) {
    if let Some(version) = &args.python_version {
        config.python_version = version.clone();
    }
    if let Some(version) = &args.os_version {
        config.os_version = version.clone();
    }
    if args.no_cache {
        config.no_cache = true;
    }
}

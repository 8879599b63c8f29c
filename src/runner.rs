//! # Command Runners
//!
//! Every external tool (`git`, the builder script, the framework's
//! interpreter and pip) is reached through the [`CommandRunner`] trait. The
//! orchestrator only sees the returned [`CommandStatus`]; whether a real
//! process ran is up to the runner.
//!
//! [`SystemRunner`] spawns the process in the working directory and waits for
//! it. Standard streams are inherited, so the tools' own output is what the
//! operator sees. The environment is inherited too, minus the invocation's
//! `env_remove` names.

use std::path::PathBuf;
use std::process::Command;

use crate::error::{Error, Result};
use crate::target::Invocation;

/// Exit status of one external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, or `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success() -> Self {
        Self::from_code(0)
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for CommandStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Capability to execute an external command and report its exit status.
pub trait CommandRunner {
    /// Run `invocation` to completion.
    ///
    /// A non-zero status is returned as `Ok`: deciding that it is fatal is
    /// the orchestrator's job. `Err` means the command could not be run.
    fn run(&self, invocation: &Invocation) -> Result<CommandStatus>;
}

/// Runs commands as child processes of this one.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    work_dir: PathBuf,
}

impl SystemRunner {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandStatus> {
        log::debug!("exec in {}: {}", self.work_dir.display(), invocation);

        let mut command = Command::new(&invocation.program);
        for key in &invocation.env_remove {
            command.env_remove(key);
        }
        let status = command
            .args(&invocation.args)
            .envs(&invocation.env)
            .current_dir(&self.work_dir)
            .status()
            .map_err(|e| Error::CommandSpawn {
                program: invocation.program.clone(),
                message: e.to_string(),
            })?;

        Ok(status.into())
    }
}

//! # Error Handling
//!
//! This module defines the centralized error type for `framework-provisioner`.
//! It uses the `thiserror` library to build an `Error` enum covering every
//! failure the orchestrator can surface, with messages that name the failing
//! step so the operator knows what to fix before re-running.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum of failure modes. None of them are recovered
//!   automatically; the orchestrator stops at the first one.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The variants fall into four groups:
//!
//! - Operator requests: an undeclared target name.
//! - External commands: a command that exits non-zero, or that cannot be
//!   started at all.
//! - Artifacts: `clean` called when the build artifact is absent.
//! - Declarations and configuration: duplicate targets, dangling
//!   dependencies, cycles, a bad clean target, and invalid configuration
//!   values.

use thiserror::Error;

fn render_hint(hint: &Option<String>) -> String {
    hint.as_ref()
        .map(|h| format!("\n  hint: {}", h))
        .unwrap_or_default()
}

/// Main error type for provisioning operations
#[derive(Error, Debug)]
pub enum Error {
    /// The operator asked for a target that is not declared in the graph.
    ///
    /// Raised before any command runs.
    #[error("Unknown target: {name}{}", render_hint(hint))]
    UnknownTarget {
        name: String,
        /// Closest declared target name, phrased as a suggestion
        hint: Option<String>,
    },

    /// An external command exited with a non-zero status or was killed by a
    /// signal (in which case `code` is `None`).
    #[error(
        "Command failed ({}): {command}{}",
        code.map(|c| format!("exit status {}", c)).unwrap_or_else(|| "terminated by signal".to_string()),
        render_hint(hint)
    )]
    CommandFailed {
        command: String,
        code: Option<i32>,
        /// Optional hint for how to recover, e.g. removing a stale checkout
        hint: Option<String>,
    },

    /// An external program could not be started.
    #[error("Failed to start {program}: {message}")]
    CommandSpawn { program: String, message: String },

    /// `clean` was asked to remove an artifact that is not on disk.
    #[error("Artifact not found: {path}")]
    ArtifactMissing { path: String },

    /// Two targets were declared with the same name.
    #[error("Duplicate target declaration: {name}")]
    DuplicateTarget { name: String },

    /// A target depends on a name that was never declared.
    #[error("Target {target} depends on undeclared target {dependency}")]
    UnknownDependency { target: String, dependency: String },

    /// No target is marked for `clean`, or the marked one has no artifact.
    #[error("Invalid clean target: {reason}")]
    InvalidCleanTarget { reason: String },

    /// The declared dependencies form a cycle.
    #[error("Cycle detected in target dependencies: {cycle}")]
    CycleDetected { cycle: String },

    /// A configuration value is missing or malformed.
    #[error("Configuration error: {message}{}", render_hint(hint))]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A TOML parsing error, wrapped from `toml::de::Error`.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// The exit code the process should terminate with for this error.
    ///
    /// A failing external command propagates its own exit status; every
    /// other error maps to the general failure code 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

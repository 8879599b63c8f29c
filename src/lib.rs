//! # Framework Provisioner Library
//!
//! This library provisions a relocatable `Python.framework` for embedding in
//! a macOS application bundle. It is used by the `framework-provisioner`
//! command-line tool, and its pieces can be driven directly when a build
//! script needs the same steps.
//!
//! ## Quick Example
//!
//! ```
//! use framework_provisioner::config::Config;
//! use framework_provisioner::recipe;
//!
//! let graph = recipe::provisioning_graph(&Config::default()).unwrap();
//! let names: Vec<&str> = graph.names().collect();
//! assert_eq!(names, ["relocatable-python", "Python.framework", "all"]);
//! assert!(graph.get("all").unwrap().is_phony());
//! ```
//!
//! ## Core Concepts
//!
//! - **Targets (`target`)**: named units of work with an optional artifact,
//!   dependencies, and external commands, collected into a validated
//!   `TargetGraph`.
//! - **Recipe (`recipe`)**: the fixed provisioning graph (clone the builder,
//!   build the framework, install the project) derived from a `Config`.
//! - **Configuration (`config`)**: defaults, an optional `provision.toml`,
//!   and environment overrides.
//! - **Orchestrator (`orchestrator`)**: dependency-ordered, fail-fast
//!   execution memoized on artifact presence.
//! - **Seams (`runner`, `artifacts`)**: the command runner and artifact store
//!   the orchestrator is given, so tests can replace processes and the disk.
//!
//! ## Execution Flow
//!
//! 1.  Load the `Config` and build the graph with `recipe::provisioning_graph`.
//! 2.  Create an `Orchestrator` with a `SystemRunner` and `DiskArtifacts`
//!     rooted at the working directory.
//! 3.  Call `run`, `run_all`, or `clean`. The first failing command stops the
//!     run and its error carries the exit status.

pub mod artifacts;
pub mod config;
pub mod defaults;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod recipe;
pub mod runner;
pub mod target;

#[cfg(test)]
mod orchestrator_proptest;

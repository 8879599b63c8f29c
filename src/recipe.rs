//! The provisioning recipe: the fixed target graph built from a [`Config`].
//!
//! ```text
//! relocatable-python  ->  Python.framework  ->  all
//! ```
//!
//! `relocatable-python` and `Python.framework` are memoized on their
//! directories. `all` is phony and reinstalls the project every time, so a
//! second run always picks up the latest local package. `clean` removes the
//! framework directory.

use crate::config::Config;
use crate::defaults;
use crate::error::Result;
use crate::target::{Invocation, Target, TargetGraph};

/// Name of the clone target.
pub const SOURCE_TARGET: &str = defaults::SOURCE_DIR;

/// Name of the framework build target.
pub const FRAMEWORK_TARGET: &str = defaults::FRAMEWORK_DIR;

/// Build the provisioning graph for `config`.
///
/// Target names stay fixed even when the configured directories differ, so
/// the command line is the same for every configuration.
pub fn provisioning_graph(config: &Config) -> Result<TargetGraph> {
    let targets = vec![
        source_target(config),
        framework_target(config),
        install_target(config),
    ];
    TargetGraph::new(targets)?.with_clean_target(FRAMEWORK_TARGET)
}

fn source_target(config: &Config) -> Target {
    Target::new(SOURCE_TARGET)
        .describe("Clone the relocatable framework builder")
        .produces(&config.source_dir)
        .command(isolated(Invocation::new("git").args([
            "clone",
            config.builder_repo.as_str(),
            config.source_dir.as_str(),
        ])))
}

fn framework_target(config: &Config) -> Target {
    let mut build = isolated(Invocation::new(&config.host_python))
        .arg(format!("./{}/{}", config.source_dir, config.builder_script))
        .arg(format!("--os-version={}", config.os_version))
        .arg(format!("--python-version={}", config.python_version));
    if config.upgrade_pip {
        build = build.arg("--upgrade-pip");
    }
    build = build.arg(format!("--pip-requirements={}", config.requirements));

    let emit_config = isolated(Invocation::new(framework_bin(config, "python3")))
        .arg(&config.config_script)
        .arg(&config.xcconfig);

    Target::new(FRAMEWORK_TARGET)
        .describe("Build Python.framework and write the Xcode configuration")
        .produces(&config.framework_dir)
        .depends_on(SOURCE_TARGET)
        .command(build)
        .command(emit_config)
}

fn install_target(config: &Config) -> Target {
    let mut install = isolated(Invocation::new(framework_bin(config, "pip3")))
        .args(["install", "--upgrade", config.project_dir.as_str()]);
    if config.no_cache {
        install = install
            .env(defaults::NO_CACHE_ENV, "1")
            .env(defaults::NO_USER_SITE_ENV, "1");
    }

    Target::new(defaults::DEFAULT_TARGET)
        .describe("Install the enclosing project into the framework (always runs)")
        .depends_on(FRAMEWORK_TARGET)
        .command(install)
}

/// Strip the cache-suppression variables the operator's shell may carry;
/// only the install step sets them, and only when `no_cache` is on.
fn isolated(invocation: Invocation) -> Invocation {
    invocation
        .env_clear_var(defaults::NO_CACHE_ENV)
        .env_clear_var(defaults::NO_USER_SITE_ENV)
}

/// Path of an executable inside the built framework.
fn framework_bin(config: &Config, program: &str) -> String {
    format!("./{}/Versions/Current/bin/{}", config.framework_dir, program)
}

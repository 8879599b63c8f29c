//! # Provisioning Configuration
//!
//! This module defines [`Config`], the immutable set of options one
//! provisioning run works from, and the layering that produces it.
//!
//! ## Layers
//!
//! From lowest to highest precedence:
//!
//! 1.  **Built-in defaults** from [`crate::defaults`].
//! 2.  **A TOML file**, either given explicitly or `provision.toml` in the
//!     working directory when it exists. Every key is optional; unknown keys
//!     are rejected so typos surface instead of silently doing nothing.
//! 3.  **Environment variables**: `PYTHON_VERSION`, `OS_VERSION`, and the
//!     cache-suppression flag `PIP_NO_CACHE_DIR`.
//! 4.  **Command-line flags**, applied by the binary after loading.
//!
//! ```toml
//! python_version = "3.11.4"
//! os_version = "12"
//! upgrade_pip = false
//! ```

use crate::defaults;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding [`Config::python_version`].
pub const PYTHON_VERSION_ENV: &str = "PYTHON_VERSION";

/// Environment variable overriding [`Config::os_version`].
pub const OS_VERSION_ENV: &str = "OS_VERSION";

/// Options for one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Interpreter version the framework is built for (e.g. `3.10.5`).
    pub python_version: String,
    /// Minimum macOS version the framework targets.
    pub os_version: String,
    /// Requirements file handed to the builder.
    pub requirements: String,
    /// Whether the builder upgrades pip inside the new framework.
    pub upgrade_pip: bool,
    /// Git URL of the framework builder.
    pub builder_repo: String,
    /// Directory the builder is cloned into.
    pub source_dir: String,
    /// Builder entry point inside `source_dir`.
    pub builder_script: String,
    /// Directory the builder produces.
    pub framework_dir: String,
    /// Interpreter that runs the builder script.
    pub host_python: String,
    /// Script the framework's interpreter runs to emit the Xcode config.
    pub config_script: String,
    /// Path of the Xcode configuration file to write.
    pub xcconfig: String,
    /// Project installed into the framework with pip.
    pub project_dir: String,
    /// Disable pip's cache and user site-packages during the install step.
    pub no_cache: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            python_version: defaults::PYTHON_VERSION.to_string(),
            os_version: defaults::OS_VERSION.to_string(),
            requirements: defaults::REQUIREMENTS.to_string(),
            upgrade_pip: true,
            builder_repo: defaults::BUILDER_REPO.to_string(),
            source_dir: defaults::SOURCE_DIR.to_string(),
            builder_script: defaults::BUILDER_SCRIPT.to_string(),
            framework_dir: defaults::FRAMEWORK_DIR.to_string(),
            host_python: defaults::HOST_PYTHON.to_string(),
            config_script: defaults::CONFIG_SCRIPT.to_string(),
            xcconfig: defaults::XCCONFIG.to_string(),
            project_dir: defaults::PROJECT_DIR.to_string(),
            no_cache: false,
        }
    }
}

impl Config {
    /// Parse a TOML document on top of the defaults and validate it.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigParse {
            message: format!("cannot read {}: {}", path.display(), e),
            hint: None,
        })?;
        Self::parse(&content)
    }

    /// Load the file layer.
    ///
    /// An explicit path must exist. Without one, `provision.toml` in
    /// `work_dir` is used when present, and the defaults otherwise.
    pub fn load(explicit: Option<&Path>, work_dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let implicit: PathBuf = work_dir.join(defaults::CONFIG_FILE);
                if implicit.is_file() {
                    log::debug!("using configuration file {}", implicit.display());
                    Self::from_file(&implicit)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Takes a lookup function rather than reading the process environment
    /// directly, so callers (and tests) decide where values come from.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(version) = lookup(PYTHON_VERSION_ENV).filter(|v| !v.is_empty()) {
            self.python_version = version;
        }
        if let Some(version) = lookup(OS_VERSION_ENV).filter(|v| !v.is_empty()) {
            self.os_version = version;
        }
        if lookup(defaults::NO_CACHE_ENV).is_some_and(|v| is_truthy(&v)) {
            self.no_cache = true;
        }
    }

    /// Apply overrides from the current process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Check values that the external tools would otherwise reject late.
    pub fn validate(&self) -> Result<()> {
        semver::Version::parse(&self.python_version).map_err(|e| Error::ConfigParse {
            message: format!("invalid python_version '{}': {}", self.python_version, e),
            hint: Some("use a full MAJOR.MINOR.PATCH version such as 3.10.5".to_string()),
        })?;

        if self.os_version.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "os_version must not be empty".to_string(),
                hint: None,
            });
        }

        url::Url::parse(&self.builder_repo).map_err(|e| Error::ConfigParse {
            message: format!("invalid builder_repo '{}': {}", self.builder_repo, e),
            hint: None,
        })?;

        for (key, value) in [
            ("source_dir", &self.source_dir),
            ("framework_dir", &self.framework_dir),
        ] {
            if value.trim().is_empty() {
                return Err(Error::ConfigParse {
                    message: format!("{} must not be empty", key),
                    hint: None,
                });
            }
        }

        if self.source_dir == self.framework_dir {
            return Err(Error::ConfigParse {
                message: format!(
                    "source_dir and framework_dir are both '{}'",
                    self.source_dir
                ),
                hint: Some("clean would delete the builder checkout".to_string()),
            });
        }

        Ok(())
    }
}

/// Interpret an environment flag: set, non-empty, and not a negative word.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && !matches!(
            value.to_ascii_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        )
}

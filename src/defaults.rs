//! Default values for provisioning configuration.
//!
//! Centralized here so the CLI, the config layer, and the recipe agree on
//! the same pins and paths.

/// Interpreter version passed to the framework builder.
pub const PYTHON_VERSION: &str = "3.10.5";

/// Minimum macOS version the framework targets.
pub const OS_VERSION: &str = "11";

/// Requirements file installed into the framework at build time.
pub const REQUIREMENTS: &str = "requirements.txt";

/// Remote repository of the relocatable framework builder.
pub const BUILDER_REPO: &str = "https://github.com/gregneagle/relocatable-python.git";

/// Directory the builder is cloned into.
pub const SOURCE_DIR: &str = "relocatable-python";

/// Builder entry point, relative to [`SOURCE_DIR`].
pub const BUILDER_SCRIPT: &str = "make_relocatable_python_framework.py";

/// Directory the builder produces.
pub const FRAMEWORK_DIR: &str = "Python.framework";

/// Interpreter used to run the builder script.
pub const HOST_PYTHON: &str = "python3";

/// Script run by the new framework's interpreter to emit the Xcode config.
pub const CONFIG_SCRIPT: &str = "config.py";

/// Xcode configuration file written by [`CONFIG_SCRIPT`].
pub const XCCONFIG: &str = "../../app/python.xcconfig";

/// Enclosing project installed into the framework's pip.
pub const PROJECT_DIR: &str = "../..";

/// Configuration file picked up from the working directory when present.
pub const CONFIG_FILE: &str = "provision.toml";

/// Environment variable that suppresses the package manager cache.
pub const NO_CACHE_ENV: &str = "PIP_NO_CACHE_DIR";

/// Environment variable that disables user site-packages for the interpreter.
pub const NO_USER_SITE_ENV: &str = "PYTHONNOUSERSITE";

/// Default goal when no target is named.
pub const DEFAULT_TARGET: &str = "all";

/// Pseudo-target that removes the build artifact.
pub const CLEAN_TARGET: &str = "clean";

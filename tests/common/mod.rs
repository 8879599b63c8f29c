//! Shared test utilities for E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_dir("relocatable-python");
//!     fixture.command().arg("--dry-run").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::scripts;
    pub use super::TestFixture;
}

/// Stand-in shell scripts for the builder and the framework interpreters.
///
/// Paired with `host_python = "sh"`, they let a full run complete without
/// git, network access, or a real Python build.
#[allow(dead_code)]
pub mod scripts {
    /// Builder that lays out a fake framework whose `python3` and `pip3`
    /// append their arguments to log files. The builder and `pip3` also
    /// record the cache variables they received, or `unset`.
    pub const FAKE_BUILDER: &str = r#"echo "$@" >> build.log
echo "${PIP_NO_CACHE_DIR-unset}:${PYTHONNOUSERSITE-unset}" >> build-env.log
bin=Python.framework/Versions/Current/bin
mkdir -p "$bin"
printf '#!/bin/sh\necho "$@" >> emit.log\n' > "$bin/python3"
printf '#!/bin/sh\necho "${PIP_NO_CACHE_DIR-unset}:${PYTHONNOUSERSITE-unset} $*" >> install.log\n' > "$bin/pip3"
chmod +x "$bin/python3" "$bin/pip3"
"#;

    /// Builder that leaves a partial framework behind and exits with 3.
    pub const FAILING_BUILDER: &str = r#"mkdir -p Python.framework
exit 3
"#;

    /// Configuration that runs the builder at `relocatable-python/build.sh`
    /// and keeps every path inside the fixture directory.
    pub const STUB_CONFIG: &str = r#"host_python = "sh"
builder_script = "build.sh"
xcconfig = "python.xcconfig"
project_dir = "."
"#;
}

/// A temporary working directory for one invocation of the binary.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `provision.toml` with the given content.
    #[allow(dead_code)]
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("provision.toml", content)
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add an empty directory, as if a target had already produced it.
    #[allow(dead_code)]
    pub fn with_dir(self, path: &str) -> Self {
        self.temp_dir
            .child(path)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// A checked-out builder whose entry point is `script`, plus the
    /// configuration that runs it with `sh`.
    #[allow(dead_code)]
    pub fn with_stub_builder(self, script: &str) -> Self {
        self.with_config(scripts::STUB_CONFIG)
            .with_file("relocatable-python/build.sh", script)
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Read a file the run produced, or an empty string when it is absent.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).unwrap_or_default()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a command configured to run in this fixture's directory, with
    /// the environment overrides cleared so the host cannot leak into it.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("framework-provisioner");
        cmd.current_dir(self.path())
            .env_remove("PYTHON_VERSION")
            .env_remove("OS_VERSION")
            .env_remove("PIP_NO_CACHE_DIR")
            .env_remove("PYTHONNOUSERSITE")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_stub_builder() {
        let fixture = TestFixture::new().with_stub_builder(scripts::FAKE_BUILDER);
        assert!(fixture.path().join("provision.toml").exists());
        assert!(fixture.path().join("relocatable-python/build.sh").exists());
    }

    #[test]
    fn test_stub_config_is_valid() {
        let config = framework_provisioner::config::Config::parse(scripts::STUB_CONFIG).unwrap();
        assert_eq!(config.host_python, "sh");
    }
}

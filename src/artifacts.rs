//! # Artifact Store
//!
//! The orchestrator decides whether a target needs to run by asking whether
//! its artifact exists. That question, and the removal performed by `clean`,
//! go through the [`ArtifactStore`] trait so tests can answer them without a
//! real filesystem.
//!
//! [`DiskArtifacts`] is the implementation used by the binary. It resolves
//! artifact paths against the working directory.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Existence checks and removal for target artifacts.
pub trait ArtifactStore {
    /// Whether the artifact at `path` is present. Contents are not inspected.
    fn exists(&self, path: &Path) -> bool;

    /// Remove the artifact at `path`.
    ///
    /// Fails with [`Error::ArtifactMissing`] when nothing is there.
    fn remove(&self, path: &Path) -> Result<()>;
}

/// Artifacts on the host filesystem, relative to a root directory.
#[derive(Debug, Clone)]
pub struct DiskArtifacts {
    root: PathBuf,
}

impl DiskArtifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory artifact paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl ArtifactStore for DiskArtifacts {
    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling link still counts as present
        fs::symlink_metadata(self.resolve(path)).is_ok()
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let full_path = self.resolve(path);
        let metadata = match fs::symlink_metadata(&full_path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ArtifactMissing {
                    path: path.display().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            fs::remove_dir_all(&full_path)?;
        } else {
            fs::remove_file(&full_path)?;
        }
        Ok(())
    }
}

//! Versioned dataset access
//!
//! A dataset is a git repository, optionally with git-annex, into which
//! exports are written. [`DatasetRepo`] is the contract the export commands
//! rely on: report the status of paths, unlock annexed files, and save
//! changes. [`GitDataset`] implements it by running `git` / `git annex`;
//! [`MemoryDataset`] is an in-process stand-in for tests.

mod git;
mod memory;
pub mod paths;
mod types;

pub use git::GitDataset;
pub use memory::MemoryDataset;
pub use types::{PathKind, PathStatus, StatusEntry, StatusMap};

use crate::error::RedcapResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Operations on the reference dataset
#[async_trait]
pub trait DatasetRepo: Send + Sync {
    /// Absolute root directory of the dataset
    fn root(&self) -> &Path;

    /// Report the status of the given paths.
    ///
    /// Fails with [`RedcapError::OutsideDataset`](crate::error::RedcapError)
    /// if any path lies outside the dataset. Paths inside a nested dataset
    /// are reported with [`PathKind::Dataset`].
    async fn status(&self, paths: &[PathBuf]) -> RedcapResult<StatusMap>;

    /// Turn a locked (read-only, symlinked) file into a writable one
    async fn unlock(&self, path: &Path) -> RedcapResult<()>;

    /// Record the current content of `paths` with a commit message
    async fn save(&self, paths: &[PathBuf], message: &str) -> RedcapResult<()>;

    /// Resolve a user-supplied path; relative paths are relative to the root
    fn resolve(&self, path: &Path) -> PathBuf {
        paths::canonicalize_parent(&paths::absolutize(self.root(), path))
    }
}

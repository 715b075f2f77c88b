//! In-memory dataset for tests.
//!
//! Status is tracked in memory; file content is still written to a real
//! directory (the root), so callers can exercise the full write path.

use super::paths::relative_to;
use super::types::{PathKind, PathStatus, StatusEntry, StatusMap};
use super::DatasetRepo;
use crate::error::{RedcapError, RedcapResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A dataset whose status is scripted by the test
#[derive(Debug)]
pub struct MemoryDataset {
    root: PathBuf,
    entries: Mutex<BTreeMap<PathBuf, (PathKind, PathStatus)>>,
    subdatasets: Vec<PathBuf>,
    unlocked: Mutex<Vec<PathBuf>>,
    saves: Mutex<Vec<(Vec<PathBuf>, String)>>,
    fail_status: bool,
    fail_save: bool,
}

impl MemoryDataset {
    /// Create a dataset rooted at an existing directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            root: root.canonicalize().unwrap_or_else(|_| root.to_path_buf()),
            entries: Mutex::new(BTreeMap::new()),
            subdatasets: Vec::new(),
            unlocked: Mutex::new(Vec::new()),
            saves: Mutex::new(Vec::new()),
            fail_status: false,
            fail_save: false,
        }
    }

    /// Register a root-relative path with the given kind and state
    pub fn with_entry(self, rel: impl AsRef<Path>, kind: PathKind, state: PathStatus) -> Self {
        self.entries
            .lock()
            .insert(rel.as_ref().to_path_buf(), (kind, state));
        self
    }

    /// Register a root-relative nested dataset
    pub fn with_subdataset(mut self, rel: impl AsRef<Path>) -> Self {
        self.subdatasets.push(rel.as_ref().to_path_buf());
        self
    }

    /// Make every status query fail with a generic dataset error
    pub fn with_failing_status(mut self) -> Self {
        self.fail_status = true;
        self
    }

    /// Make every save fail, as a commit hook rejecting the change would
    pub fn with_failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }

    /// Paths that were unlocked, in order
    pub fn unlocked(&self) -> Vec<PathBuf> {
        self.unlocked.lock().clone()
    }

    /// Recorded saves as `(paths, message)`, in order
    pub fn saves(&self) -> Vec<(Vec<PathBuf>, String)> {
        self.saves.lock().clone()
    }

    fn relative(&self, path: &Path) -> RedcapResult<(PathBuf, PathBuf)> {
        let abs = self.resolve(path);
        let rel = relative_to(&self.root, &abs)
            .ok_or_else(|| RedcapError::outside_dataset(&abs, &self.root))?;
        Ok((abs, rel))
    }
}

#[async_trait]
impl DatasetRepo for MemoryDataset {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn status(&self, paths: &[PathBuf]) -> RedcapResult<StatusMap> {
        if self.fail_status {
            return Err(RedcapError::dataset("status unavailable"));
        }

        let entries = self.entries.lock();
        let mut result = StatusMap::new();
        for path in paths {
            let (abs, rel) = self.relative(path)?;
            if self.subdatasets.iter().any(|sub| rel.starts_with(sub)) {
                result.insert(
                    abs.clone(),
                    StatusEntry::new(abs, PathKind::Dataset, PathStatus::Clean),
                );
            } else if let Some((kind, state)) = entries.get(&rel) {
                result.insert(abs.clone(), StatusEntry::new(abs, *kind, *state));
            }
        }
        Ok(result)
    }

    async fn unlock(&self, path: &Path) -> RedcapResult<()> {
        let (abs, rel) = self.relative(path)?;
        self.entries
            .lock()
            .insert(rel, (PathKind::File, PathStatus::Modified));
        self.unlocked.lock().push(abs);
        Ok(())
    }

    async fn save(&self, paths: &[PathBuf], message: &str) -> RedcapResult<()> {
        if self.fail_save {
            return Err(RedcapError::dataset_command("commit rejected", "git commit"));
        }
        let mut saved = Vec::with_capacity(paths.len());
        for path in paths {
            let (abs, rel) = self.relative(path)?;
            self.entries
                .lock()
                .insert(rel, (PathKind::File, PathStatus::Clean));
            saved.push(abs);
        }
        self.saves.lock().push((saved, message.to_string()));
        Ok(())
    }
}

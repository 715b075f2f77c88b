//! Status types reported by a dataset

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// What kind of thing a path points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    File,
    Symlink,
    Directory,
    /// The path is (or lies inside) a nested dataset
    Dataset,
}

/// Version-control state of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStatus {
    Clean,
    Modified,
    Added,
    Deleted,
    Untracked,
}

impl PathStatus {
    pub fn is_clean(&self) -> bool {
        matches!(self, PathStatus::Clean)
    }
}

impl fmt::Display for PathStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PathStatus::Clean => "clean",
            PathStatus::Modified => "modified",
            PathStatus::Added => "added",
            PathStatus::Deleted => "deleted",
            PathStatus::Untracked => "untracked",
        };
        write!(f, "{}", name)
    }
}

/// Status of a single path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Absolute path the entry describes
    pub path: PathBuf,
    pub kind: PathKind,
    pub state: PathStatus,
}

impl StatusEntry {
    pub fn new(path: impl Into<PathBuf>, kind: PathKind, state: PathStatus) -> Self {
        Self {
            path: path.into(),
            kind,
            state,
        }
    }
}

/// Status of the queried paths, keyed by absolute path.
///
/// Paths that neither exist nor are tracked have no entry.
pub type StatusMap = BTreeMap<PathBuf, StatusEntry>;

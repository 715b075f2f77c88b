//! Write gate: may an export overwrite a path in the dataset?
//!
//! Exports must never clobber uncommitted local edits, and must not write
//! through a locked (symlinked) annexed file without unlocking it first.
//! Paths outside the reference dataset, or inside a nested dataset, are
//! refused: a nested dataset is responsible for its own content.

use crate::dataset::{DatasetRepo, PathKind, PathStatus, StatusMap};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Classification of a target path relative to the reference dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathState {
    /// Nothing exists (or is tracked) at the path
    Absent,
    CleanFile,
    /// Clean symlink, e.g. a locked annexed file
    CleanSymlink,
    /// Uncommitted changes, or an untracked file
    Modified,
    /// Outside the dataset or inside a nested dataset
    Foreign,
}

impl PathState {
    /// Decision table for this state
    pub fn decision(self) -> WriteDecision {
        match self {
            PathState::Absent | PathState::CleanFile => WriteDecision::allow(),
            PathState::CleanSymlink => WriteDecision::allow_after_unlock(),
            PathState::Modified | PathState::Foreign => WriteDecision::refuse(),
        }
    }
}

impl fmt::Display for PathState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PathState::Absent => "absent",
            PathState::CleanFile => "clean-file",
            PathState::CleanSymlink => "clean-symlink",
            PathState::Modified => "modified",
            PathState::Foreign => "foreign",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of [`check_ok_to_edit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriteDecision {
    pub ok: bool,
    pub needs_unlock: bool,
}

impl WriteDecision {
    const fn allow() -> Self {
        Self {
            ok: true,
            needs_unlock: false,
        }
    }

    const fn allow_after_unlock() -> Self {
        Self {
            ok: true,
            needs_unlock: true,
        }
    }

    const fn refuse() -> Self {
        Self {
            ok: false,
            needs_unlock: false,
        }
    }
}

/// Classify the status report for a single path
pub fn classify(status: &StatusMap, path: &Path) -> PathState {
    let Some(entry) = status.get(path) else {
        return PathState::Absent;
    };

    match (entry.kind, entry.state) {
        (PathKind::Dataset, _) => PathState::Foreign,
        (PathKind::File, PathStatus::Clean) => PathState::CleanFile,
        (PathKind::Symlink, PathStatus::Clean) => PathState::CleanSymlink,
        _ => PathState::Modified,
    }
}

/// Determine the state of `path` against the reference dataset.
///
/// Never fails: a path outside the dataset is `Foreign`, and any other
/// status failure is treated as `Foreign` too, after a warning.
pub async fn path_state(path: &Path, dataset: &dyn DatasetRepo) -> PathState {
    let resolved = dataset.resolve(path);
    match dataset.status(std::slice::from_ref(&resolved)).await {
        Ok(status) => classify(&status, &resolved),
        Err(e) if e.is_outside_dataset() => {
            debug!("{} is outside {}", resolved.display(), dataset.root().display());
            PathState::Foreign
        }
        Err(e) => {
            warn!("Could not determine status of {}: {}", resolved.display(), e);
            PathState::Foreign
        }
    }
}

/// Check whether it is ok to write to `path`, and whether it must be
/// unlocked first.
///
/// Only paths directly within `dataset` (not outside, not in a nested
/// dataset) that are either absent or clean are writable.
pub async fn check_ok_to_edit(path: &Path, dataset: &dyn DatasetRepo) -> WriteDecision {
    let state = path_state(path, dataset).await;
    let decision = state.decision();
    debug!(
        "Write gate for {}: {} (ok={}, unlock={})",
        path.display(),
        state,
        decision.ok,
        decision.needs_unlock
    );
    decision
}

#[cfg(test)]
mod tests;

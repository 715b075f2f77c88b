//! git / git-annex backed dataset

use super::paths::relative_to;
use super::types::{PathKind, PathStatus, StatusEntry, StatusMap};
use super::DatasetRepo;
use crate::error::{RedcapError, RedcapResult};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info};

/// git file mode of a symbolic link (annexed, locked files)
const MODE_SYMLINK: &str = "120000";
/// git file mode of a gitlink (registered submodule)
const MODE_GITLINK: &str = "160000";

/// A dataset backed by a git working tree
#[derive(Debug, Clone)]
pub struct GitDataset {
    root: PathBuf,
}

impl GitDataset {
    /// Find the dataset containing `start`.
    ///
    /// Fails with a dataset-not-found error when `start` is not inside a
    /// git working tree.
    pub async fn discover(start: &Path) -> RedcapResult<Self> {
        if !start.exists() {
            return Err(RedcapError::dataset_not_found(start));
        }

        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(start)
            .output()
            .await
            .map_err(|e| RedcapError::dataset_command(e.to_string(), "git rev-parse"))?;

        if !output.status.success() {
            debug!(
                "git rev-parse failed in {}: {}",
                start.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(RedcapError::dataset_not_found(start));
        }

        let toplevel = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Self::open(Path::new(&toplevel))
    }

    /// Open a dataset whose root is known
    pub fn open(root: &Path) -> RedcapResult<Self> {
        let root = root
            .canonicalize()
            .map_err(|_| RedcapError::dataset_not_found(root))?;
        if !root.join(".git").exists() {
            return Err(RedcapError::dataset_not_found(root));
        }
        Ok(Self { root })
    }

    async fn run(&self, args: &[&str]) -> RedcapResult<Output> {
        debug!("Executing: git {}", args.join(" "));
        Command::new("git")
            .args(args)
            .current_dir(&self.root)
            // pathspecs are literal: `data[1].csv` must not match `data1.csv`
            .env("GIT_LITERAL_PATHSPECS", "1")
            .output()
            .await
            .map_err(|e| {
                RedcapError::dataset_command(
                    format!("failed to execute git: {}", e),
                    format!("git {}", args.join(" ")),
                )
            })
    }

    /// Run a git command and return its stdout, failing on non-zero exit
    async fn git(&self, args: &[&str]) -> RedcapResult<String> {
        let output = self.run(args).await?;
        if !output.status.success() {
            return Err(RedcapError::dataset_command(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
                format!("git {}", args.join(" ")),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Whether git-annex has been initialised in this repository
    pub async fn is_annex(&self) -> bool {
        match self.run(&["config", "--get", "annex.uuid"]).await {
            Ok(output) => output.status.success() && !output.stdout.is_empty(),
            Err(_) => false,
        }
    }

    /// Root-relative paths of registered submodules
    async fn registered_subdatasets(&self) -> RedcapResult<Vec<PathBuf>> {
        let listing = self.git(&["ls-files", "--stage", "-z"]).await?;
        Ok(parse_ls_files(&listing)
            .into_iter()
            .filter(|(mode, _)| mode == MODE_GITLINK)
            .map(|(_, path)| PathBuf::from(path))
            .collect())
    }

    /// Whether `rel` is, or lies below, a nested dataset or a `.git` directory
    fn in_nested_dataset(&self, rel: &Path, registered: &[PathBuf]) -> bool {
        if is_git_internal(rel) {
            return true;
        }
        if registered.iter().any(|sub| rel.starts_with(sub)) {
            return true;
        }
        // unregistered nested repositories are detected on disk
        rel.ancestors()
            .filter(|dir| !dir.as_os_str().is_empty())
            .any(|dir| self.root.join(dir).join(".git").exists())
    }

    async fn entry_for(&self, abs: &Path, rel: &Path) -> RedcapResult<Option<StatusEntry>> {
        let rel_str = rel.to_string_lossy();

        let on_disk = std::fs::symlink_metadata(abs).ok().map(|meta| {
            let file_type = meta.file_type();
            if file_type.is_symlink() {
                PathKind::Symlink
            } else if file_type.is_dir() {
                PathKind::Directory
            } else {
                PathKind::File
            }
        });

        let tracked = self
            .git(&["ls-files", "--stage", "-z", "--", rel_str.as_ref()])
            .await?;
        let tracked = parse_ls_files(&tracked);
        let tracked_mode = tracked
            .iter()
            .find(|(_, path)| Path::new(path) == rel)
            .map(|(mode, _)| mode.clone());

        let porcelain = self
            .git(&[
                "status",
                "--porcelain=v1",
                "-z",
                "--untracked-files=all",
                "--",
                rel_str.as_ref(),
            ])
            .await?;
        let state = parse_porcelain_state(&porcelain);

        let kind = match (on_disk, tracked_mode.as_deref()) {
            (None, None) if tracked.is_empty() => return Ok(None),
            (Some(kind), _) => kind,
            (None, Some(MODE_SYMLINK)) => PathKind::Symlink,
            (None, _) => PathKind::File,
        };

        Ok(Some(StatusEntry::new(abs, kind, state)))
    }
}

#[async_trait]
impl DatasetRepo for GitDataset {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn status(&self, paths: &[PathBuf]) -> RedcapResult<StatusMap> {
        let registered = self.registered_subdatasets().await?;
        let mut result = StatusMap::new();

        for path in paths {
            let abs = self.resolve(path);
            let rel = relative_to(&self.root, &abs)
                .ok_or_else(|| RedcapError::outside_dataset(&abs, &self.root))?;

            if rel.as_os_str().is_empty() || self.in_nested_dataset(&rel, &registered) {
                result.insert(
                    abs.clone(),
                    StatusEntry::new(abs, PathKind::Dataset, PathStatus::Clean),
                );
                continue;
            }

            if let Some(entry) = self.entry_for(&abs, &rel).await? {
                result.insert(abs, entry);
            }
        }

        Ok(result)
    }

    async fn unlock(&self, path: &Path) -> RedcapResult<()> {
        let abs = self.resolve(path);
        let rel = relative_to(&self.root, &abs)
            .ok_or_else(|| RedcapError::outside_dataset(&abs, &self.root))?;

        if self.is_annex().await {
            self.git(&["annex", "unlock", "--", rel.to_string_lossy().as_ref()])
                .await?;
        } else {
            // plain git symlink: drop the link so the write creates a regular file
            std::fs::remove_file(&abs).map_err(|e| RedcapError::io_at(e.to_string(), &abs))?;
        }
        debug!("Unlocked {}", abs.display());
        Ok(())
    }

    async fn save(&self, paths: &[PathBuf], message: &str) -> RedcapResult<()> {
        let mut rels = Vec::with_capacity(paths.len());
        for path in paths {
            let abs = self.resolve(path);
            let rel = relative_to(&self.root, &abs)
                .ok_or_else(|| RedcapError::outside_dataset(&abs, &self.root))?;
            rels.push(rel.to_string_lossy().to_string());
        }
        let rel_args: Vec<&str> = rels.iter().map(String::as_str).collect();

        let mut add = if self.is_annex().await {
            vec!["annex", "add", "--"]
        } else {
            vec!["add", "--"]
        };
        add.extend(&rel_args);
        self.git(&add).await?;

        let mut diff = vec!["diff", "--cached", "--quiet", "--"];
        diff.extend(&rel_args);
        if self.run(&diff).await?.status.success() {
            debug!("Nothing to save for {}", rels.join(", "));
            return Ok(());
        }

        let mut commit = vec!["commit", "--quiet", "-m", message, "--"];
        commit.extend(&rel_args);
        self.git(&commit).await?;
        info!("Saved {} in {}", rels.join(", "), self.root.display());
        Ok(())
    }
}

/// Whether any component of `rel` is a `.git` directory
fn is_git_internal(rel: &Path) -> bool {
    rel.components()
        .any(|c| matches!(c, Component::Normal(name) if name == OsStr::new(".git")))
}

/// Parse `git ls-files --stage -z` output into `(mode, path)` pairs
fn parse_ls_files(output: &str) -> Vec<(String, String)> {
    output
        .split('\0')
        .filter(|record| !record.is_empty())
        .filter_map(|record| {
            let (meta, path) = record.split_once('\t')?;
            let mode = meta.split_whitespace().next()?;
            Some((mode.to_string(), path.to_string()))
        })
        .collect()
}

/// Collapse `git status --porcelain=v1 -z` records into a single state.
///
/// No records means clean. For directories, any change makes them modified.
fn parse_porcelain_state(output: &str) -> PathStatus {
    let mut records = output.split('\0').filter(|r| r.len() >= 3);
    let Some(first) = records.next() else {
        return PathStatus::Clean;
    };
    if records.next().is_some() {
        return PathStatus::Modified;
    }

    let code = &first[..2];
    match code {
        "??" => PathStatus::Untracked,
        c if c.starts_with('A') => PathStatus::Added,
        c if c.contains('D') => PathStatus::Deleted,
        _ => PathStatus::Modified,
    }
}

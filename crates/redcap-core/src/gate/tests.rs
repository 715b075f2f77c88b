//! Tests for the write gate

use super::*;
use crate::dataset::{GitDataset, MemoryDataset, StatusEntry};
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn memory_dataset(temp: &TempDir) -> MemoryDataset {
    let root = temp.path().join("ds");
    std::fs::create_dir_all(&root).unwrap();
    MemoryDataset::new(&root)
        .with_entry("clean.csv", PathKind::File, PathStatus::Clean)
        .with_entry("annexed.csv", PathKind::Symlink, PathStatus::Clean)
        .with_entry("edited.csv", PathKind::File, PathStatus::Modified)
        .with_entry("edited-link.csv", PathKind::Symlink, PathStatus::Modified)
        .with_entry("new.csv", PathKind::File, PathStatus::Untracked)
        .with_subdataset("subds")
}

#[test]
fn test_decision_table() {
    let expected = [
        (PathState::Absent, true, false),
        (PathState::CleanFile, true, false),
        (PathState::CleanSymlink, true, true),
        (PathState::Modified, false, false),
        (PathState::Foreign, false, false),
    ];
    for (state, ok, needs_unlock) in expected {
        let decision = state.decision();
        assert_eq!(decision.ok, ok, "ok for {}", state);
        assert_eq!(decision.needs_unlock, needs_unlock, "unlock for {}", state);
    }
}

#[test]
fn test_classify_empty_status_is_absent() {
    assert_eq!(
        classify(&StatusMap::new(), Path::new("/ds/x.csv")),
        PathState::Absent
    );
}

#[test]
fn test_classify_ignores_other_paths() {
    let mut status = StatusMap::new();
    status.insert(
        PathBuf::from("/ds/edited.csv"),
        StatusEntry::new("/ds/edited.csv", PathKind::File, PathStatus::Modified),
    );
    assert_eq!(
        classify(&status, Path::new("/ds/x.csv")),
        PathState::Absent
    );
    assert_eq!(
        classify(&status, Path::new("/ds/edited.csv")),
        PathState::Modified
    );
}

#[tokio::test]
async fn test_clean_file_is_writable() {
    let temp = TempDir::new().unwrap();
    let ds = memory_dataset(&temp);
    let decision = check_ok_to_edit(Path::new("clean.csv"), &ds).await;
    assert_eq!(
        decision,
        WriteDecision {
            ok: true,
            needs_unlock: false
        }
    );
}

#[tokio::test]
async fn test_absent_file_is_writable() {
    let temp = TempDir::new().unwrap();
    let ds = memory_dataset(&temp);
    let decision = check_ok_to_edit(Path::new("reports/out.csv"), &ds).await;
    assert!(decision.ok);
    assert!(!decision.needs_unlock);
}

#[tokio::test]
async fn test_clean_symlink_needs_unlock() {
    let temp = TempDir::new().unwrap();
    let ds = memory_dataset(&temp);
    let decision = check_ok_to_edit(Path::new("annexed.csv"), &ds).await;
    assert!(decision.ok);
    assert!(decision.needs_unlock);
}

#[tokio::test]
async fn test_uncommitted_changes_are_refused() {
    let temp = TempDir::new().unwrap();
    let ds = memory_dataset(&temp);
    for name in ["edited.csv", "edited-link.csv", "new.csv"] {
        let decision = check_ok_to_edit(Path::new(name), &ds).await;
        assert!(!decision.ok, "{} should be refused", name);
        assert!(!decision.needs_unlock);
    }
}

#[tokio::test]
async fn test_subdataset_path_is_refused() {
    let temp = TempDir::new().unwrap();
    let ds = memory_dataset(&temp);
    let decision = check_ok_to_edit(Path::new("subds/file"), &ds).await;
    assert_eq!(decision, PathState::Foreign.decision());
    assert_eq!(
        path_state(Path::new("subds/file"), &ds).await,
        PathState::Foreign
    );
}

#[tokio::test]
async fn test_outside_path_is_refused() {
    let temp = TempDir::new().unwrap();
    let ds = memory_dataset(&temp);

    let outside = temp.path().join("file_outside");
    let decision = check_ok_to_edit(&outside, &ds).await;
    assert!(!decision.ok);

    let escaping = check_ok_to_edit(Path::new("../file_outside"), &ds).await;
    assert!(!escaping.ok);
}

#[tokio::test]
async fn test_status_failure_degrades_to_refusal() {
    let temp = TempDir::new().unwrap();
    let ds = MemoryDataset::new(temp.path()).with_failing_status();
    let decision = check_ok_to_edit(Path::new("any.csv"), &ds).await;
    assert!(!decision.ok);
    assert!(!decision.needs_unlock);
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .status()
        .unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

fn init_repo(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    git(dir, &["init", "--quiet"]);
}

#[tokio::test]
async fn test_git_dataset_locations_and_states() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let temp = TempDir::new().unwrap();
    let ds_path = temp.path().join("ds");
    init_repo(&ds_path);
    init_repo(&ds_path.join("subds"));

    let outside = temp.path().join("file_outside");
    let inside = ds_path.join("ds_file");
    let below = ds_path.join("subds").join("subds_file");
    std::fs::write(&outside, "dummy").unwrap();
    std::fs::write(&inside, "dummy").unwrap();
    std::fs::write(&below, "dummy").unwrap();

    git(&ds_path.join("subds"), &["add", "subds_file"]);
    git(&ds_path.join("subds"), &["commit", "--quiet", "-m", "sub"]);
    git(&ds_path, &["add", "ds_file"]);
    git(&ds_path, &["commit", "--quiet", "-m", "top"]);

    let ds = GitDataset::open(&ds_path).unwrap();

    assert!(!check_ok_to_edit(&outside, &ds).await.ok);
    assert_eq!(
        check_ok_to_edit(&inside, &ds).await,
        WriteDecision {
            ok: true,
            needs_unlock: false
        }
    );
    assert!(check_ok_to_edit(Path::new("not_yet_there.csv"), &ds).await.ok);
    assert!(!check_ok_to_edit(&below, &ds).await.ok);

    std::fs::write(&inside, "new dummy").unwrap();
    assert!(!check_ok_to_edit(&inside, &ds).await.ok);

    std::fs::write(ds_path.join("untracked.csv"), "x").unwrap();
    assert!(!check_ok_to_edit(Path::new("untracked.csv"), &ds).await.ok);
}

#[tokio::test]
async fn test_git_directory_is_refused() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let temp = TempDir::new().unwrap();
    let ds_path = temp.path().join("ds");
    init_repo(&ds_path);
    let ds = GitDataset::open(&ds_path).unwrap();

    for target in [".git/config", ".git/new.csv", ".git"] {
        let decision = check_ok_to_edit(Path::new(target), &ds).await;
        assert!(!decision.ok, "{} should be refused", target);
        assert_eq!(
            path_state(Path::new(target), &ds).await,
            PathState::Foreign
        );
    }
    assert!(check_ok_to_edit(Path::new(".gitignore"), &ds).await.ok);
}

#[tokio::test]
async fn test_glob_characters_match_literally() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let temp = TempDir::new().unwrap();
    let ds_path = temp.path().join("ds");
    init_repo(&ds_path);
    std::fs::write(ds_path.join("data[1].csv"), "a").unwrap();
    std::fs::write(ds_path.join("data1.csv"), "b").unwrap();
    git(&ds_path, &["add", "--", "data[1].csv", "data1.csv"]);
    git(&ds_path, &["commit", "--quiet", "-m", "both"]);

    // dirty neighbour whose name the glob `data[1].csv` would match
    std::fs::write(ds_path.join("data1.csv"), "edited").unwrap();

    let ds = GitDataset::open(&ds_path).unwrap();
    assert_eq!(
        check_ok_to_edit(Path::new("data[1].csv"), &ds).await,
        WriteDecision {
            ok: true,
            needs_unlock: false
        }
    );
    assert!(!check_ok_to_edit(Path::new("data1.csv"), &ds).await.ok);
}

#[tokio::test]
async fn test_registered_subdataset_is_refused() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let temp = TempDir::new().unwrap();
    let ds_path = temp.path().join("ds");
    let sub_path = ds_path.join("subds");
    init_repo(&ds_path);
    init_repo(&sub_path);
    std::fs::write(sub_path.join("subds_file"), "dummy").unwrap();
    git(&sub_path, &["add", "subds_file"]);
    git(&sub_path, &["commit", "--quiet", "-m", "sub"]);
    git(&ds_path, &["add", "subds"]);
    git(&ds_path, &["commit", "--quiet", "-m", "register subds"]);

    // only the gitlink entry in the parent marks it as a dataset now
    std::fs::remove_dir_all(sub_path.join(".git")).unwrap();

    let ds = GitDataset::open(&ds_path).unwrap();
    let target = PathBuf::from("subds/new.csv");
    let status = ds.status(&[ds.resolve(&target)]).await.unwrap();
    let entry = status.get(&ds.resolve(&target)).unwrap();
    assert_eq!(entry.kind, PathKind::Dataset);
    assert!(!check_ok_to_edit(&target, &ds).await.ok);
    assert!(!check_ok_to_edit(Path::new("subds/subds_file"), &ds).await.ok);
}

#[cfg(unix)]
#[tokio::test]
async fn test_git_dataset_clean_symlink() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let temp = TempDir::new().unwrap();
    let ds_path = temp.path().join("ds");
    init_repo(&ds_path);
    std::fs::write(ds_path.join("content"), "payload").unwrap();
    std::os::unix::fs::symlink("content", ds_path.join("linked.csv")).unwrap();
    git(&ds_path, &["add", "content", "linked.csv"]);
    git(&ds_path, &["commit", "--quiet", "-m", "link"]);

    let ds = GitDataset::open(&ds_path).unwrap();
    let decision = check_ok_to_edit(&PathBuf::from("linked.csv"), &ds).await;
    assert!(decision.ok);
    assert!(decision.needs_unlock);
}

//! Path resolution relative to a dataset root

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path, resolving `.` and `..` without touching the
/// filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Make `path` absolute, interpreting relative paths against `root`.
pub fn absolutize(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&root.join(path))
    }
}

/// Canonicalize the directory part of `path` while keeping its final
/// component as-is, so that a symlink at `path` itself is not followed.
///
/// Missing parent directories are kept lexically below their deepest
/// existing ancestor.
pub fn canonicalize_parent(path: &Path) -> PathBuf {
    let Some(file_name) = path.file_name() else {
        return path.to_path_buf();
    };
    let parent = path.parent().unwrap_or_else(|| Path::new("/"));

    let mut existing = parent.to_path_buf();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            let mut out = canonical;
            for part in missing.iter().rev() {
                out.push(part);
            }
            out.push(file_name);
            return out;
        }
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(up)) => {
                missing.push(name.to_os_string());
                existing = up.to_path_buf();
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Path of `path` relative to `root`, or `None` when it lies outside.
///
/// Both arguments must already be absolute and resolved the same way.
pub fn relative_to(root: &Path, path: &Path) -> Option<PathBuf> {
    path.strip_prefix(root).ok().map(Path::to_path_buf)
}

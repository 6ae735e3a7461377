//! Path resolution against an explicit base directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolve the base directory all configured paths are relative to.
///
/// `dir` wins when given; otherwise the current working directory is used.
/// The result is always absolute.
pub fn base_dir(dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("read current directory")?,
    };
    std::path::absolute(&dir).with_context(|| format!("resolve {}", dir.display()))
}

/// Join `path` onto `base` unless it is already absolute.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

//! Case discovery under the comparison root.
//!
//! The tree is `<root>/<group>/<case>/` with the compared files directly
//! inside each case directory. Enumeration is sorted by name at every level
//! so runs are reproducible.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;

/// The two files compared for one case directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseFiles {
    pub first: PathBuf,
    pub second: PathBuf,
}

/// A case directory that cannot be compared.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("case {}: expected 2 .{extension} files, found {found}", dir.display())]
    WrongFileCount {
        dir: PathBuf,
        extension: String,
        found: usize,
    },
    #[error("case {}: cannot read directory", dir.display())]
    Unreadable {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CaseError {
    pub fn dir(&self) -> &Path {
        match self {
            CaseError::WrongFileCount { dir, .. } | CaseError::Unreadable { dir, .. } => dir,
        }
    }
}

/// Immediate subdirectories of the comparison root, sorted by name.
pub fn discover_groups(root: &Path) -> Result<Vec<PathBuf>> {
    list_subdirs(root)
}

/// Immediate subdirectories of a case group, sorted by name.
pub fn discover_cases(group: &Path) -> Result<Vec<PathBuf>> {
    list_subdirs(group)
}

/// Pick the two files to compare from a case directory.
///
/// Regular files whose extension equals `extension` are collected and sorted
/// by name. Anything other than exactly two is reported, not guessed at.
pub fn select_case_files(case_dir: &Path, extension: &str) -> Result<CaseFiles, CaseError> {
    let unreadable = |source| CaseError::Unreadable {
        dir: case_dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(case_dir).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort();

    match <[PathBuf; 2]>::try_from(files) {
        Ok([first, second]) => Ok(CaseFiles { first, second }),
        Err(files) => Err(CaseError::WrongFileCount {
            dir: case_dir.to_path_buf(),
            extension: extension.to_string(),
            found: files.len(),
        }),
    }
}

fn list_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.context("read entry")?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

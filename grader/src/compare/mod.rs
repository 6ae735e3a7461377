//! Batch comparator.
//!
//! Compiles the comparator once, then walks `<root>/<group>/<case>/` in name
//! order and runs it on the pair of case files in each case directory.
//! Results are written to the supplied writer as they happen:
//!
//! ```text
//! groupA
//! Program returned 1
//! error: case /work/textComparison/groupA/case2: expected 2 .txt files, found 1
//! ```
//!
//! A malformed case directory is reported and skipped; the batch goes on.

pub mod case;
pub mod compile;
pub mod run;
pub mod verdict;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::CompareConfig;
use crate::exit_codes;
use crate::paths::resolve;

pub use case::{CaseError, CaseFiles, discover_cases, discover_groups, select_case_files};
pub use compile::compile_comparator;
pub use run::{CaseLimits, CaseResult, run_case};
pub use verdict::{Verdict, classify_exit};

/// Failures that stop the whole batch.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("comparator source {} not found", path.display())]
    SourceMissing { path: PathBuf },
    #[error("compile failed: {command}: {detail}")]
    CompileFailed { command: String, detail: String },
    #[error("comparison root {} not found", path.display())]
    RootMissing { path: PathBuf },
    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

impl CompareError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CompareError::SourceMissing { .. } | CompareError::CompileFailed { .. } => {
                exit_codes::BUILD_FAILED
            }
            CompareError::RootMissing { .. } | CompareError::Io(_) => exit_codes::INVALID,
        }
    }
}

/// A case directory skipped because it could not be compared.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidCase {
    pub case_dir: PathBuf,
    pub reason: String,
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub executable: PathBuf,
    pub root: PathBuf,
    pub groups: Vec<PathBuf>,
    pub cases: Vec<CaseResult>,
    pub invalid: Vec<InvalidCase>,
}

impl BatchReport {
    pub fn exit_code(&self) -> i32 {
        if self.invalid.is_empty() {
            exit_codes::OK
        } else {
            exit_codes::INVALID_CASES
        }
    }
}

/// Compile the comparator and run it over every case under the root.
#[instrument(skip_all, fields(root = %cfg.root.display()))]
pub fn run_batch<W: Write>(
    cfg: &CompareConfig,
    base: &Path,
    out: &mut W,
) -> Result<BatchReport, CompareError> {
    let executable = compile_comparator(cfg, base)?;

    let root = resolve(base, &cfg.root);
    if !root.is_dir() {
        return Err(CompareError::RootMissing { path: root });
    }

    let limits = CaseLimits {
        timeout: cfg.timeout(),
        output_limit_bytes: cfg.output_limit_bytes,
    };
    let groups = discover_groups(&root)?;
    let mut cases = Vec::new();
    let mut invalid = Vec::new();

    for group in &groups {
        let name = group.file_name().unwrap_or(group.as_os_str());
        writeln!(out, "{}", name.to_string_lossy()).context("write output")?;

        for case_dir in discover_cases(group)? {
            let files = match select_case_files(&case_dir, &cfg.extension) {
                Ok(files) => files,
                Err(err) => {
                    let reason = case_diagnostic(err);
                    warn!(case_dir = %case_dir.display(), err = %reason, "skipping case");
                    writeln!(out, "error: {reason}").context("write output")?;
                    invalid.push(InvalidCase {
                        case_dir: case_dir.clone(),
                        reason,
                    });
                    continue;
                }
            };
            let result = run_case(&executable, &case_dir, &files, limits)?;
            writeln!(out, "{}", result.summary_line()).context("write output")?;
            cases.push(result);
        }
    }

    info!(
        groups = groups.len(),
        cases = cases.len(),
        invalid = invalid.len(),
        "batch finished"
    );
    Ok(BatchReport {
        executable,
        root,
        groups,
        cases,
        invalid,
    })
}

/// Render a case error with its full cause chain (`cannot read directory: Permission denied`).
fn case_diagnostic(err: CaseError) -> String {
    format!("{:#}", anyhow::Error::new(err))
}

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::process::{run_captured, signal_of};

use super::case::CaseFiles;
use super::verdict::{Verdict, classify_exit};

/// Limits for one comparator invocation.
#[derive(Debug, Clone, Copy)]
pub struct CaseLimits {
    pub timeout: Option<Duration>,
    pub output_limit_bytes: usize,
}

/// Outcome of running the comparator on one case directory.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub case_dir: PathBuf,
    pub files: CaseFiles,
    pub exit_code: Option<i32>,
    pub signal: Option<i32>,
    pub timed_out: bool,
    pub verdict: Verdict,
    pub duration_ms: u64,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
}

impl CaseResult {
    /// The line printed for this case.
    pub fn summary_line(&self) -> String {
        if self.timed_out {
            return "Program timed out".to_string();
        }
        match (self.exit_code, self.signal) {
            (Some(code), _) => format!("Program returned {code}"),
            (None, Some(signal)) => format!("Program terminated by signal {signal}"),
            (None, None) => "Program terminated without an exit code".to_string(),
        }
    }
}

/// Invoke the comparator with the two case files as positional arguments.
///
/// Output is captured and not interpreted; only the exit status matters.
#[instrument(skip_all, fields(case_dir = %case_dir.display()))]
pub fn run_case(
    executable: &Path,
    case_dir: &Path,
    files: &CaseFiles,
    limits: CaseLimits,
) -> Result<CaseResult> {
    let mut command = Command::new(executable);
    command.arg(&files.first).arg(&files.second);

    let started = Instant::now();
    let output = run_captured(command, limits.timeout, limits.output_limit_bytes)
        .with_context(|| format!("run comparator on {}", case_dir.display()))?;
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let exit_code = if output.timed_out {
        None
    } else {
        output.status.code()
    };
    let verdict = classify_exit(exit_code);
    debug!(exit_code = ?exit_code, verdict = ?verdict, duration_ms, "case compared");

    Ok(CaseResult {
        case_dir: case_dir.to_path_buf(),
        files: files.clone(),
        exit_code,
        signal: signal_of(output.status),
        timed_out: output.timed_out,
        verdict,
        duration_ms,
        stdout_truncated: output.stdout_truncated,
        stderr_truncated: output.stderr_truncated,
    })
}

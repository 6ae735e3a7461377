//! Optional JSON record of a grader run (`--results <path>`).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::compare::BatchReport;
use crate::submit::{Stage, SubmitError, SubmitReport};

/// Common envelope for both subcommands.
#[derive(Debug, Serialize)]
pub struct RunRecord<T: Serialize> {
    pub command: &'static str,
    pub start_time: String,
    pub end_time: String,
    pub duration_secs: f64,
    pub exit_code: i32,
    /// Fatal error that ended the run, if any.
    pub error: Option<String>,
    pub detail: T,
}

impl<T: Serialize> RunRecord<T> {
    pub fn new(
        command: &'static str,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        exit_code: i32,
        error: Option<String>,
        detail: T,
    ) -> Self {
        let duration = finished_at - started_at;
        Self {
            command,
            start_time: started_at.to_rfc3339(),
            end_time: finished_at.to_rfc3339(),
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            exit_code,
            error,
            detail,
        }
    }
}

/// `compare` detail: the batch report, absent when the batch never started.
pub type CompareRecord = RunRecord<Option<BatchReport>>;

/// `submit` detail: stages that completed and where the run stopped.
#[derive(Debug, Serialize)]
pub struct SubmitDetail {
    pub completed: Vec<Stage>,
    pub failed_stage: Option<Stage>,
    pub removed: Vec<String>,
}

impl SubmitDetail {
    pub fn from_outcome(outcome: &Result<SubmitReport, SubmitError>) -> Self {
        match outcome {
            Ok(report) => Self {
                completed: report.completed.clone(),
                failed_stage: None,
                removed: report
                    .removed
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect(),
            },
            Err(err) => Self {
                completed: err.stage().predecessors(),
                failed_stage: Some(err.stage()),
                removed: Vec::new(),
            },
        }
    }
}

pub type SubmitRecord = RunRecord<SubmitDetail>;

/// Write a record as pretty JSON with a trailing newline.
pub fn write_record<T: Serialize>(path: &Path, record: &RunRecord<T>) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(record).context("serialize results")?;
    fs::write(path, format!("{contents}\n"))
        .with_context(|| format!("write results {}", path.display()))?;
    Ok(())
}

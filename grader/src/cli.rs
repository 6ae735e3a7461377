//! CLI command implementations.
//!
//! Each command returns the process exit code; only `main` exits.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};

use crate::compare::run_batch;
use crate::config::GraderConfig;
use crate::exit_codes;
use crate::results::{CompareRecord, RunRecord, SubmitDetail, SubmitRecord, write_record};
use crate::submit::{COMPLETED_MESSAGE, run_submission};

/// Run the batch comparator, printing one line per case.
pub fn compare(cfg: &GraderConfig, base: &Path, results: Option<&Path>) -> Result<i32> {
    let started_at = Utc::now();
    debug!(base = %base.display(), "compare started");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = run_batch(&cfg.compare, base, &mut out);
    out.flush().context("flush stdout")?;
    drop(out);

    let (code, error, report) = match outcome {
        Ok(report) => (report.exit_code(), None, Some(report)),
        Err(err) => {
            let code = err.exit_code();
            let message = format!("{:#}", anyhow::Error::new(err));
            eprintln!("{message}");
            (code, Some(message), None)
        }
    };
    if let Some(report) = &report
        && !report.invalid.is_empty()
    {
        eprintln!(
            "{} of {} case directories could not be compared",
            report.invalid.len(),
            report.invalid.len() + report.cases.len()
        );
    }

    if let Some(path) = results {
        let record: CompareRecord =
            RunRecord::new("compare", started_at, Utc::now(), code, error, report);
        write_record(path, &record)?;
    }
    info!(exit_code = code, "compare finished");
    Ok(code)
}

/// Run the submission stages, printing the completion message on success.
pub fn submit(cfg: &GraderConfig, base: &Path, results: Option<&Path>) -> Result<i32> {
    let started_at = Utc::now();
    debug!(base = %base.display(), "submit started");

    let outcome = run_submission(&cfg.submit, base);
    let (code, error) = match &outcome {
        Ok(_) => {
            println!("{COMPLETED_MESSAGE}");
            (exit_codes::OK, None)
        }
        Err(err) => {
            let message = err.report();
            if err.is_config_error() {
                eprintln!("{message}");
            } else {
                println!("{message}");
            }
            (err.exit_code(), Some(message))
        }
    };

    if let Some(path) = results {
        let record: SubmitRecord = RunRecord::new(
            "submit",
            started_at,
            Utc::now(),
            code,
            error,
            SubmitDetail::from_outcome(&outcome),
        );
        write_record(path, &record)?;
    }
    info!(exit_code = code, "submit finished");
    Ok(code)
}

//! Submission runner.
//!
//! Three stages run in strict order: `Build -> Run -> Cleanup`. The first
//! failing stage ends the run; later stages never start. A failed run leaves
//! the build artifacts on disk so they can be inspected.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::SubmitConfig;
use crate::exit_codes;
use crate::paths::resolve;
use crate::process::{command_line, describe_status, run_inherited};

/// Message printed once every stage succeeded.
pub const COMPLETED_MESSAGE: &str = "Program completed successfully.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Build,
    Run,
    Cleanup,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Build, Stage::Run, Stage::Cleanup];

    /// Stages that completed before `self` started.
    pub fn predecessors(self) -> Vec<Stage> {
        Stage::ALL.into_iter().filter(|stage| *stage < self).collect()
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Error while running '{command}': {detail}")]
    BuildFailed { command: String, detail: String },
    #[error("configuration file {} not found", path.display())]
    ConfigFileMissing { path: PathBuf },
    #[error("Error while running '{}': {detail}", executable.display())]
    RunFailed { executable: PathBuf, detail: String },
    #[error("Error while deleting '{}'", path.display())]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SubmitError {
    pub fn stage(&self) -> Stage {
        match self {
            SubmitError::BuildFailed { .. } => Stage::Build,
            SubmitError::ConfigFileMissing { .. } | SubmitError::RunFailed { .. } => Stage::Run,
            SubmitError::CleanupFailed { .. } => Stage::Cleanup,
        }
    }

    /// Display text followed by every source, `: `-separated.
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }

    /// Configuration problems go to stderr; stage failures are grading output.
    pub fn is_config_error(&self) -> bool {
        matches!(self, SubmitError::ConfigFileMissing { .. })
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            SubmitError::BuildFailed { .. } => exit_codes::BUILD_FAILED,
            SubmitError::ConfigFileMissing { .. } => exit_codes::INVALID,
            SubmitError::RunFailed { .. } => exit_codes::RUN_FAILED,
            SubmitError::CleanupFailed { .. } => exit_codes::CLEANUP_FAILED,
        }
    }
}

/// Record of a submission run that reached `Done`.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReport {
    pub build_dir: PathBuf,
    pub completed: Vec<Stage>,
    pub removed: Vec<PathBuf>,
}

/// Build, run, and clean up a submission.
#[instrument(skip_all, fields(build_dir = %cfg.build_dir.display()))]
pub fn run_submission(cfg: &SubmitConfig, base: &Path) -> Result<SubmitReport, SubmitError> {
    let build_dir = resolve(base, &cfg.build_dir);
    let mut completed = Vec::with_capacity(Stage::ALL.len());

    build(cfg, &build_dir)?;
    completed.push(Stage::Build);

    run(cfg, &build_dir)?;
    completed.push(Stage::Run);

    let removed = cleanup(cfg, &build_dir)?;
    completed.push(Stage::Cleanup);

    info!(removed = removed.len(), "submission finished");
    Ok(SubmitReport {
        build_dir,
        completed,
        removed,
    })
}

fn build(cfg: &SubmitConfig, build_dir: &Path) -> Result<(), SubmitError> {
    let rendered = command_line(&cfg.build_command);
    debug!(command = %rendered, "building submission");

    let mut command = Command::new(&cfg.build_command[0]);
    command.args(&cfg.build_command[1..]).current_dir(build_dir);

    let failed = |detail| SubmitError::BuildFailed {
        command: rendered.clone(),
        detail,
    };
    let status = run_inherited(command, cfg.timeout()).map_err(|err| failed(format!("{err:#}")))?;
    if !status.success() {
        return Err(failed(describe_status(status.status, status.timed_out)));
    }
    Ok(())
}

fn run(cfg: &SubmitConfig, build_dir: &Path) -> Result<(), SubmitError> {
    let executable = resolve(build_dir, &cfg.executable);
    let config_file = resolve(build_dir, &cfg.config_file);
    if !config_file.is_file() {
        return Err(SubmitError::ConfigFileMissing { path: config_file });
    }
    debug!(executable = %executable.display(), config_file = %config_file.display(), "running submission");

    let mut command = Command::new(&executable);
    command.arg(&config_file).current_dir(build_dir);

    let failed = |detail| SubmitError::RunFailed {
        executable: executable.clone(),
        detail,
    };
    let status = run_inherited(command, cfg.timeout()).map_err(|err| failed(format!("{err:#}")))?;
    if !status.success() {
        return Err(failed(describe_status(status.status, status.timed_out)));
    }
    Ok(())
}

fn cleanup(cfg: &SubmitConfig, build_dir: &Path) -> Result<Vec<PathBuf>, SubmitError> {
    let mut removed = Vec::with_capacity(cfg.artifacts.len());
    for artifact in &cfg.artifacts {
        let path = resolve(build_dir, artifact);
        if let Err(source) = fs::remove_file(&path) {
            warn!(path = %path.display(), err = %source, "artifact removal failed");
            return Err(SubmitError::CleanupFailed { path, source });
        }
        debug!(path = %path.display(), "artifact removed");
        removed.push(path);
    }
    Ok(removed)
}

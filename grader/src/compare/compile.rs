use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, instrument};

use crate::config::CompareConfig;
use crate::paths::resolve;
use crate::process::{command_line, describe_status, run_captured};

use super::CompareError;

/// Compile the comparator and return the absolute path of the executable.
///
/// Runs `<compiler..> <source> -o <executable>` with `base` as the child's
/// working directory. Compiler diagnostics are captured and carried in the
/// error rather than printed.
#[instrument(skip_all, fields(source = %cfg.source.display()))]
pub fn compile_comparator(cfg: &CompareConfig, base: &Path) -> Result<PathBuf, CompareError> {
    let source = resolve(base, &cfg.source);
    if !source.is_file() {
        return Err(CompareError::SourceMissing { path: source });
    }
    let executable = resolve(base, &cfg.executable);

    let mut full = cfg.compiler.clone();
    full.push(source.display().to_string());
    full.push("-o".to_string());
    full.push(executable.display().to_string());
    let rendered = command_line(&full);

    let mut command = Command::new(&cfg.compiler[0]);
    command
        .args(&cfg.compiler[1..])
        .arg(&source)
        .arg("-o")
        .arg(&executable)
        .current_dir(base);

    debug!(command = %rendered, "compiling comparator");
    let output = run_captured(command, None, cfg.output_limit_bytes).map_err(|err| {
        CompareError::CompileFailed {
            command: rendered.clone(),
            detail: format!("{err:#}"),
        }
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let status = describe_status(output.status, output.timed_out);
        let detail = if stderr.trim().is_empty() {
            status
        } else {
            format!("{status}: {}", stderr.trim())
        };
        return Err(CompareError::CompileFailed {
            command: rendered,
            detail,
        });
    }
    if !executable.is_file() {
        return Err(CompareError::CompileFailed {
            command: rendered,
            detail: format!("compiler did not produce {}", executable.display()),
        });
    }

    info!(executable = %executable.display(), "comparator compiled");
    Ok(executable)
}

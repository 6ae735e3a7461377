//! Helpers for running child processes with optional timeouts and bounded output.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

/// Captured child process output.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
    pub timed_out: bool,
}

/// Exit status of a child whose output went straight to our stdout/stderr.
#[derive(Debug, Clone, Copy)]
pub struct InheritedStatus {
    pub status: ExitStatus,
    pub timed_out: bool,
}

impl InheritedStatus {
    pub fn success(&self) -> bool {
        !self.timed_out && self.status.success()
    }
}

/// Run a command, capturing stdout/stderr without risking pipe deadlocks.
///
/// Output is read on background threads while the child runs.
/// `output_limit_bytes` bounds what is kept in memory; the rest is drained
/// and counted. With `timeout: None` the call waits for the child to exit.
#[instrument(skip_all, fields(program = ?cmd.get_program(), output_limit_bytes))]
pub fn run_captured(
    mut cmd: Command,
    timeout: Option<Duration>,
    output_limit_bytes: usize,
) -> Result<CommandOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).context("spawn command");
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_handle = thread::spawn(move || read_stream_limited(stdout, output_limit_bytes));
    let stderr_handle = thread::spawn(move || read_stream_limited(stderr, output_limit_bytes));

    let (status, timed_out) = wait_child(&mut child, timeout)?;

    let (stdout, stdout_truncated) = join_output(stdout_handle).context("join stdout")?;
    let (stderr, stderr_truncated) = join_output(stderr_handle).context("join stderr")?;

    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(stdout_truncated, stderr_truncated, "output truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
        timed_out,
    })
}

/// Run a command with stdout/stderr inherited from the grader.
///
/// Used for the build tool and the student program, whose output the user
/// is meant to see as it happens.
#[instrument(skip_all, fields(program = ?cmd.get_program()))]
pub fn run_inherited(mut cmd: Command, timeout: Option<Duration>) -> Result<InheritedStatus> {
    cmd.stdin(Stdio::null());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).context("spawn command");
        }
    };

    let (status, timed_out) = wait_child(&mut child, timeout)?;
    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(InheritedStatus { status, timed_out })
}

/// Human-readable description of how a child finished.
pub fn describe_status(status: ExitStatus, timed_out: bool) -> String {
    if timed_out {
        return "timed out".to_string();
    }
    match (status.code(), signal_of(status)) {
        (Some(code), _) => format!("exit code {code}"),
        (None, Some(signal)) => format!("signal {signal}"),
        (None, None) => "unknown status".to_string(),
    }
}

/// Render a command vector for messages (`make -C dir`).
pub fn command_line(command: &[String]) -> String {
    command.join(" ")
}

#[cfg(unix)]
pub fn signal_of(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
pub fn signal_of(_status: ExitStatus) -> Option<i32> {
    None
}

fn wait_child(child: &mut Child, timeout: Option<Duration>) -> Result<(ExitStatus, bool)> {
    let Some(timeout) = timeout else {
        let status = child.wait().context("wait for command")?;
        return Ok((status, false));
    };
    match child.wait_timeout(timeout).context("wait for command")? {
        Some(status) => Ok((status, false)),
        None => {
            warn!(
                timeout_secs = timeout.as_secs(),
                "command timed out, killing"
            );
            child.kill().context("kill command")?;
            let status = child.wait().context("wait command after kill")?;
            Ok((status, true))
        }
    }
}

fn join_output(handle: thread::JoinHandle<Result<(Vec<u8>, usize)>>) -> Result<(Vec<u8>, usize)> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        let remaining = limit.saturating_sub(buf.len());
        if remaining > 0 {
            let keep = n.min(remaining);
            buf.extend_from_slice(&chunk[..keep]);
            truncated += n.saturating_sub(keep);
        } else {
            truncated += n;
        }
    }

    Ok((buf, truncated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn captures_exit_code_and_output() {
        let output = run_captured(sh("printf out; printf err >&2; exit 3"), None, 1024)
            .expect("run");
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.stdout, b"out");
        assert_eq!(output.stderr, b"err");
        assert!(!output.timed_out);
    }

    #[test]
    fn truncates_captured_output() {
        let output = run_captured(sh("printf abcdef"), None, 4).expect("run");
        assert_eq!(output.stdout, b"abcd");
        assert_eq!(output.stdout_truncated, 2);
    }

    #[test]
    fn kills_on_timeout() {
        let output =
            run_captured(sh("exec sleep 5"), Some(Duration::from_millis(100)), 1024).expect("run");
        assert!(output.timed_out);
        assert_eq!(describe_status(output.status, output.timed_out), "timed out");
    }

    #[test]
    fn inherited_reports_failure() {
        let status = run_inherited(sh("exit 1"), None).expect("run");
        assert!(!status.success());
        assert_eq!(describe_status(status.status, false), "exit code 1");
    }

    #[test]
    fn spawn_failure_is_an_error() {
        let err = run_inherited(Command::new("/nonexistent/grader-tool"), None)
            .expect_err("missing program");
        assert!(err.to_string().contains("spawn command"));
    }

    #[test]
    fn command_line_joins_arguments() {
        let command = vec!["make".to_string(), "-C".to_string(), "dir".to_string()];
        assert_eq!(command_line(&command), "make -C dir");
    }
}

//! Helpers for running child processes with an optional timeout.

use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, instrument, warn};
use wait_timeout::ChildExt;

use crate::io::executor::{CapturedOutput, CommandStatus};

/// Run a command with inherited stdio and wait for it to exit.
///
/// With `timeout` set, a child that outlives it is killed and reported as
/// timed out. Without it the call blocks until the child exits.
#[instrument(skip_all, fields(timeout = ?timeout))]
pub fn run_inherited(mut cmd: Command, timeout: Option<Duration>) -> io::Result<CommandStatus> {
    debug!("spawning child process");
    let mut child = spawn(&mut cmd)?;
    let status = wait(&mut child, timeout)?;
    debug!(exit_code = ?status.code, timed_out = status.timed_out, "command finished");
    Ok(status)
}

/// Run a command and capture stdout/stderr without risking pipe deadlocks.
///
/// Output is read concurrently while the child runs. `output_limit_bytes`
/// bounds how much of each stream is kept (the rest is drained and dropped).
#[instrument(skip_all, fields(timeout = ?timeout, output_limit_bytes))]
pub fn run_captured(
    mut cmd: Command,
    timeout: Option<Duration>,
    output_limit_bytes: usize,
) -> io::Result<CapturedOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("spawning child process");
    let mut child = spawn(&mut cmd)?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("stderr was not piped"))?;

    let stdout_handle = thread::spawn(move || read_stream_limited(stdout, output_limit_bytes));
    let stderr_handle = thread::spawn(move || read_stream_limited(stderr, output_limit_bytes));

    let status = wait(&mut child, timeout)?;

    let (stdout, stdout_truncated) = join_output(stdout_handle)?;
    let (stderr, stderr_truncated) = join_output(stderr_handle)?;

    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(stdout_truncated, stderr_truncated, "output truncated");
    }

    debug!(exit_code = ?status.code, timed_out = status.timed_out, "command finished");
    Ok(CapturedOutput {
        status,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

fn spawn(cmd: &mut Command) -> io::Result<Child> {
    cmd.spawn().inspect_err(|e| {
        debug!(err = %e, program = ?cmd.get_program(), "failed to spawn command");
    })
}

fn wait(child: &mut Child, timeout: Option<Duration>) -> io::Result<CommandStatus> {
    let Some(timeout) = timeout else {
        return child.wait().map(CommandStatus::from);
    };
    match child.wait_timeout(timeout)? {
        Some(status) => Ok(CommandStatus::from(status)),
        None => {
            debug!(
                timeout_secs = timeout.as_secs(),
                "command timed out, killing"
            );
            child.kill()?;
            child.wait()?;
            Ok(CommandStatus::timed_out())
        }
    }
}

fn join_output(
    handle: thread::JoinHandle<io::Result<(Vec<u8>, usize)>>,
) -> io::Result<(Vec<u8>, usize)> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(io::Error::other("output reader thread panicked")),
    }
}

fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> io::Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk)?;
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

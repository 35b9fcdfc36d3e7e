//! Executor abstraction for external commands.
//!
//! [`CommandExecutor`] decouples the steps from process spawning. Steps only
//! need two capabilities: run a command and wait for its exit status, or run
//! it and capture its text output. Tests substitute a scripted executor that
//! records each [`Invocation`] without spawning anything.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use std::time::Duration;

use tracing::{debug, instrument};

use crate::context::StepContext;
use crate::core::error::{CommandFailure, StepError};
use crate::io::process::{run_captured, run_inherited};

/// Upper bound on captured stdout/stderr per stream.
pub const DEFAULT_OUTPUT_LIMIT_BYTES: usize = 1_000_000;

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory for the child.
    pub workdir: PathBuf,
    /// Variables layered over the inherited environment.
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    /// Invocation of `program` with the context's working directory and environment.
    pub fn new(program: impl Into<PathBuf>, ctx: &StepContext) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            workdir: ctx.workdir().to_path_buf(),
            env: ctx.env().clone(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program and arguments joined by spaces, for messages.
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.workdir)
            .envs(&self.env);
        cmd
    }
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, or `None` when the child was terminated by a signal or killed.
    pub code: Option<i32>,
    pub timed_out: bool,
}

impl CommandStatus {
    pub const fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            timed_out: false,
        }
    }

    pub const fn timed_out() -> Self {
        Self {
            code: None,
            timed_out: true,
        }
    }

    pub const fn success(self) -> bool {
        !self.timed_out && matches!(self.code, Some(0))
    }

    /// Why the command failed, or `None` on success.
    pub const fn failure(self) -> Option<CommandFailure> {
        if self.timed_out {
            return Some(CommandFailure::TimedOut);
        }
        match self.code {
            Some(0) => None,
            Some(code) => Some(CommandFailure::Exit(code)),
            None => Some(CommandFailure::Terminated),
        }
    }
}

impl From<ExitStatus> for CommandStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
            timed_out: false,
        }
    }
}

/// Captured result of a command run through [`CommandExecutor::capture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub status: CommandStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Abstraction over process execution.
///
/// `Err` means the process could not be started at all; a process that ran
/// and failed is reported through its [`CommandStatus`].
pub trait CommandExecutor {
    /// Run with inherited stdio and wait for the exit status.
    fn status(&self, invocation: &Invocation) -> io::Result<CommandStatus>;

    /// Run and capture stdout/stderr as text.
    fn capture(&self, invocation: &Invocation) -> io::Result<CapturedOutput>;
}

/// Executor that spawns real child processes.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    timeout: Option<Duration>,
    output_limit_bytes: usize,
}

impl SystemExecutor {
    pub const fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            output_limit_bytes: DEFAULT_OUTPUT_LIMIT_BYTES,
        }
    }
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CommandExecutor for SystemExecutor {
    #[instrument(skip_all, fields(command = %invocation.command_line()))]
    fn status(&self, invocation: &Invocation) -> io::Result<CommandStatus> {
        run_inherited(invocation.to_command(), self.timeout)
    }

    #[instrument(skip_all, fields(command = %invocation.command_line()))]
    fn capture(&self, invocation: &Invocation) -> io::Result<CapturedOutput> {
        run_captured(invocation.to_command(), self.timeout, self.output_limit_bytes)
    }
}

/// Run `invocation` and fail unless it exits successfully.
///
/// `action` names what the step was doing and prefixes the error message.
pub fn run_checked<E: CommandExecutor>(
    executor: &E,
    action: &str,
    invocation: &Invocation,
) -> Result<(), StepError> {
    let status = executor
        .status(invocation)
        .map_err(|source| spawn_error(action, invocation, source))?;
    check_status(action, invocation, status)
}

/// Run `invocation`, capture its output, and fail unless it exits successfully.
pub fn capture_checked<E: CommandExecutor>(
    executor: &E,
    action: &str,
    invocation: &Invocation,
) -> Result<CapturedOutput, StepError> {
    let output = executor
        .capture(invocation)
        .map_err(|source| spawn_error(action, invocation, source))?;
    check_status(action, invocation, output.status)?;
    Ok(output)
}

fn check_status(
    action: &str,
    invocation: &Invocation,
    status: CommandStatus,
) -> Result<(), StepError> {
    match status.failure() {
        None => {
            debug!(command = %invocation.command_line(), "command succeeded");
            Ok(())
        }
        Some(failure) => {
            debug!(command = %invocation.command_line(), %failure, "command failed");
            Err(StepError::CommandFailed {
                action: action.to_string(),
                command: invocation.command_line(),
                failure,
            })
        }
    }
}

fn spawn_error(action: &str, invocation: &Invocation, source: io::Error) -> StepError {
    StepError::Spawn {
        action: action.to_string(),
        command: invocation.command_line(),
        source,
    }
}

//! Error taxonomy shared by every step.
//!
//! Every failure is fatal to the step that raised it. [`StepError::kind`]
//! groups the variants into the three classes callers report on.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`StepError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The execution environment does not satisfy a precondition.
    Environment,
    /// A spawned process failed or could not be started.
    ExternalCommand,
    /// Malformed input while parsing the dotfile.
    Format,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Environment => "environment",
            Self::ExternalCommand => "external command",
            Self::Format => "format",
        };
        f.write_str(name)
    }
}

/// How a child process that did start failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandFailure {
    /// Exited with a non-zero code.
    Exit(i32),
    /// Terminated without an exit code (e.g. by a signal).
    Terminated,
    /// Killed after exceeding the configured command timeout.
    TimedOut,
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exit(code) => write!(f, "exited with status {code}"),
            Self::Terminated => f.write_str("was terminated by a signal"),
            Self::TimedOut => f.write_str("timed out and was killed"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("not inside a git repository: {detail}")]
    GitRoot { detail: String },

    #[error("{action}: failed to start `{command}`")]
    Spawn {
        action: String,
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{action}: `{command}` {failure}")]
    CommandFailed {
        action: String,
        command: String,
        failure: CommandFailure,
    },

    #[error("read {}", .path.display())]
    ReadEnvFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "{}:{line}: malformed environment line {content:?} (expected KEY=VALUE)",
        .path.display()
    )]
    MalformedEnvLine {
        path: PathBuf,
        line: usize,
        content: String,
    },
}

impl StepError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::GitRoot { .. } | Self::ReadEnvFile { .. } => ErrorKind::Environment,
            Self::Spawn { .. } | Self::CommandFailed { .. } => ErrorKind::ExternalCommand,
            Self::MalformedEnvLine { .. } => ErrorKind::Format,
        }
    }
}

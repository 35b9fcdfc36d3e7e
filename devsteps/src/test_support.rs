//! Test-only helpers: a scripted executor and temporary project directories.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::context::StepContext;
use crate::io::executor::{CapturedOutput, CommandExecutor, CommandStatus, Invocation};

#[derive(Debug)]
enum Scripted {
    Output { code: i32, stdout: String },
    SpawnError(io::ErrorKind),
}

/// Executor that replays queued responses and records every invocation.
///
/// Responses are consumed in call order by both `status` and `capture`. Once
/// the queue is empty every call succeeds with empty output.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    responses: RefCell<VecDeque<Scripted>>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a call that exits with `code` and prints nothing.
    pub fn exit(self, code: i32) -> Self {
        self.output(code, "")
    }

    /// Queue a call that exits with `code` after printing `stdout`.
    pub fn output(self, code: i32, stdout: &str) -> Self {
        self.responses.borrow_mut().push_back(Scripted::Output {
            code,
            stdout: stdout.to_string(),
        });
        self
    }

    /// Queue a call that fails to start.
    pub fn spawn_error(self, kind: io::ErrorKind) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Scripted::SpawnError(kind));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Recorded invocations rendered as command lines.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }

    fn next(&self, invocation: &Invocation) -> io::Result<CapturedOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        match self.responses.borrow_mut().pop_front() {
            Some(Scripted::Output { code, stdout }) => Ok(CapturedOutput {
                status: CommandStatus::exited(code),
                stdout,
                stderr: String::new(),
            }),
            Some(Scripted::SpawnError(kind)) => Err(io::Error::from(kind)),
            None => Ok(CapturedOutput {
                status: CommandStatus::exited(0),
                stdout: String::new(),
                stderr: String::new(),
            }),
        }
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn status(&self, invocation: &Invocation) -> io::Result<CommandStatus> {
        self.next(invocation).map(|output| output.status)
    }

    fn capture(&self, invocation: &Invocation) -> io::Result<CapturedOutput> {
        self.next(invocation)
    }
}

/// Temporary project directory for marker-file scenarios.
pub struct TempProject {
    dir: tempfile::TempDir,
}

impl TempProject {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp project")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Context rooted at the project directory with an empty environment overlay.
    pub fn context(&self) -> StepContext {
        StepContext::new(self.path())
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn file(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn dir(&self, relative: &str) -> Result<PathBuf> {
        let path = self.path().join(relative);
        fs::create_dir_all(&path).with_context(|| format!("create directory {}", path.display()))?;
        Ok(path)
    }

    /// Write an executable shell script to `relative`.
    pub fn script(&self, relative: &str, body: &str) -> Result<PathBuf> {
        let path = self.file(relative, &format!("#!/bin/sh\n{body}\n"))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .with_context(|| format!("chmod {}", path.display()))?;
        }
        Ok(path)
    }
}

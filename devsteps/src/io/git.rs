//! Git adapter.
//!
//! Only one query is needed: the top-level directory of the repository the
//! context's working directory sits in.

use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::context::StepContext;
use crate::core::error::StepError;
use crate::io::executor::{CommandExecutor, Invocation};

/// Wrapper for executing git commands in a step context.
pub struct Git<'a, E> {
    executor: &'a E,
    ctx: &'a StepContext,
}

impl<'a, E: CommandExecutor> Git<'a, E> {
    pub const fn new(executor: &'a E, ctx: &'a StepContext) -> Self {
        Self { executor, ctx }
    }

    /// Return the repository's top-level directory (`git rev-parse --show-toplevel`).
    #[instrument(skip_all, fields(workdir = %self.ctx.workdir().display()))]
    pub fn show_toplevel(&self) -> Result<PathBuf, StepError> {
        let out = self.run_capture(&["rev-parse", "--show-toplevel"])?;
        let toplevel = out.trim();
        if toplevel.is_empty() {
            debug!("git printed an empty top-level path");
            return Err(StepError::GitRoot {
                detail: "git rev-parse --show-toplevel printed nothing".to_string(),
            });
        }
        debug!(toplevel, "resolved repository root");
        Ok(PathBuf::from(toplevel))
    }

    fn run_capture(&self, args: &[&str]) -> Result<String, StepError> {
        let invocation = Invocation::new("git", self.ctx).args(args.iter().copied());
        let output = self
            .executor
            .capture(&invocation)
            .map_err(|err| StepError::GitRoot {
                detail: format!("spawn {}: {err}", invocation.command_line()),
            })?;
        if !output.status.success() {
            return Err(StepError::GitRoot {
                detail: format!(
                    "{} failed: {}",
                    invocation.command_line(),
                    output.stderr.trim()
                ),
            });
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::core::error::ErrorKind;
    use crate::test_support::ScriptedExecutor;

    #[test]
    fn trims_toplevel_output() {
        let executor = ScriptedExecutor::new().output(0, "/home/dev/project\n");
        let ctx = StepContext::new("/home/dev/project/src");
        let root = Git::new(&executor, &ctx).show_toplevel().expect("toplevel");
        assert_eq!(root, PathBuf::from("/home/dev/project"));
        assert_eq!(
            executor.command_lines(),
            vec!["git rev-parse --show-toplevel"]
        );
        assert_eq!(
            executor.calls()[0].workdir,
            PathBuf::from("/home/dev/project/src")
        );
    }

    #[test]
    fn non_zero_exit_is_environment_error() {
        let executor = ScriptedExecutor::new().exit(128);
        let ctx = StepContext::new("/tmp");
        let err = Git::new(&executor, &ctx).show_toplevel().expect_err("not a repo");
        assert_eq!(err.kind(), ErrorKind::Environment);
        assert!(err.to_string().starts_with("not inside a git repository"));
    }

    #[test]
    fn missing_git_is_environment_error() {
        let executor = ScriptedExecutor::new().spawn_error(io::ErrorKind::NotFound);
        let ctx = StepContext::new("/tmp");
        let err = Git::new(&executor, &ctx).show_toplevel().expect_err("no git");
        assert_eq!(err.kind(), ErrorKind::Environment);
    }

    #[test]
    fn empty_output_is_rejected() {
        let executor = ScriptedExecutor::new().output(0, "\n");
        let ctx = StepContext::new("/tmp");
        assert!(Git::new(&executor, &ctx).show_toplevel().is_err());
    }
}

//! Working directory and environment overlay shared by a sequence of steps.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Mutable state carried from one step to the next.
///
/// Steps never touch the real process environment or current directory.
/// Every command they spawn runs in [`StepContext::workdir`] with
/// [`StepContext::env`] layered over the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepContext {
    workdir: PathBuf,
    env: BTreeMap<String, String>,
}

impl StepContext {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            env: BTreeMap::new(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn set_workdir(&mut self, workdir: impl Into<PathBuf>) {
        self.workdir = workdir.into();
    }

    /// Resolve `relative` against the working directory.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.workdir.join(relative)
    }

    /// Variables set by earlier steps, in key order.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Set `key`, replacing any earlier value.
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env.insert(key.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_var_overwrites() {
        let mut ctx = StepContext::new("/tmp/project");
        ctx.set_var("XDEBUG_MODE", "debug");
        ctx.set_var("XDEBUG_MODE", "coverage");
        assert_eq!(ctx.var("XDEBUG_MODE"), Some("coverage"));
        assert_eq!(ctx.env().len(), 1);
    }

    #[test]
    fn paths_follow_workdir_changes() {
        let mut ctx = StepContext::new("/tmp/project/sub");
        ctx.set_workdir("/tmp/project");
        assert_eq!(ctx.path("composer.json"), PathBuf::from("/tmp/project/composer.json"));
    }
}

//! Orchestration for each workflow step.
//!
//! Every step follows the same shape: check a precondition, optionally probe a
//! capability, then invoke an external command. A false precondition is a
//! successful no-op. Any failure is returned as a [`StepError`] and is fatal
//! to the sequence; only the binary decides how to exit.

use std::io::Write;

use tracing::{debug, info, instrument, warn};

use crate::context::StepContext;
use crate::core::ecosystem::{Ecosystem, ScriptTask};
use crate::core::error::StepError;
use crate::core::listing::defines_script;
use crate::core::step::{BootstrapPolicy, FixedScript, Step, StepOutcome};
use crate::io::config::DevstepsConfig;
use crate::io::env_file::read_env_file;
use crate::io::executor::{CommandExecutor, Invocation, capture_checked, run_checked};
use crate::io::git::Git;

/// Variable set by `xdebug-coverage`.
pub const XDEBUG_MODE_VAR: &str = "XDEBUG_MODE";
pub const XDEBUG_COVERAGE: &str = "coverage";

/// Executes steps against a [`StepContext`], writing progress lines to `out`.
pub struct StepRunner<'a, E, W> {
    executor: &'a E,
    config: &'a DevstepsConfig,
    out: W,
}

impl<'a, E: CommandExecutor, W: Write> StepRunner<'a, E, W> {
    pub const fn new(executor: &'a E, config: &'a DevstepsConfig, out: W) -> Self {
        Self {
            executor,
            config,
            out,
        }
    }

    /// Consume the runner and return its output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run `steps` in order, stopping at the first failure.
    pub fn run_sequence(
        &mut self,
        steps: &[Step],
        ctx: &mut StepContext,
    ) -> Result<Vec<StepOutcome>, StepError> {
        let mut outcomes = Vec::with_capacity(steps.len());
        for &step in steps {
            outcomes.push(self.run(step, ctx)?);
        }
        Ok(outcomes)
    }

    #[instrument(skip_all, fields(step = step.name()))]
    pub fn run(&mut self, step: Step, ctx: &mut StepContext) -> Result<StepOutcome, StepError> {
        let outcome = match step {
            Step::GitRoot => self.resolve_root(ctx),
            Step::ComposerInstall => self.install(Ecosystem::Composer, ctx),
            Step::NpmInstall => self.install(Ecosystem::Npm, ctx),
            Step::Bootstrap => self.bootstrap(ctx),
            Step::SetupDb => self.run_fixed_script(FixedScript::SetupDb, ctx),
            Step::UpdateDb => self.run_fixed_script(FixedScript::UpdateDb, ctx),
            Step::ComposerLint => {
                self.probe_and_run(Ecosystem::Composer, ScriptTask::Lint, ctx)
            }
            Step::ComposerLintFix => {
                self.probe_and_run(Ecosystem::Composer, ScriptTask::LintFix, ctx)
            }
            Step::ComposerTest => {
                self.probe_and_run(Ecosystem::Composer, ScriptTask::Test, ctx)
            }
            Step::NpmLint => self.probe_and_run(Ecosystem::Npm, ScriptTask::Lint, ctx),
            Step::NpmLintFix => self.probe_and_run(Ecosystem::Npm, ScriptTask::LintFix, ctx),
            Step::NpmTest => self.probe_and_run(Ecosystem::Npm, ScriptTask::Test, ctx),
            Step::LoadEnv => self.load_env(ctx),
            Step::XdebugCoverage => Ok(self.xdebug_coverage(ctx)),
        }?;
        debug!(?outcome, "step finished");
        Ok(outcome)
    }

    /// Make the repository's top-level directory the working directory.
    pub fn resolve_root(&mut self, ctx: &mut StepContext) -> Result<StepOutcome, StepError> {
        let root = Git::new(self.executor, ctx).show_toplevel()?;
        ctx.set_workdir(&root);
        info!(root = %root.display(), "working directory set to repository root");
        Ok(StepOutcome::RootResolved(root))
    }

    /// Install dependencies when the manifest exists and the dependency directory does not.
    pub fn install(
        &mut self,
        ecosystem: Ecosystem,
        ctx: &mut StepContext,
    ) -> Result<StepOutcome, StepError> {
        let manifest = ctx.path(ecosystem.manifest());
        if !manifest.is_file() {
            debug!(manifest = %manifest.display(), "no manifest, skipping install");
            return Ok(StepOutcome::MissingPath(manifest));
        }
        if ctx.path(ecosystem.dependency_dir()).is_dir() {
            debug!(dir = ecosystem.dependency_dir(), "dependencies already installed");
            return Ok(StepOutcome::AlreadyInstalled);
        }

        self.say(&format!(
            "==> Installing {} dependencies...",
            ecosystem.label()
        ));
        let invocation = Invocation::new(ecosystem.program(), ctx)
            .args(ecosystem.install_args().iter().copied());
        let action = format!("install {} dependencies", ecosystem.label());
        run_checked(self.executor, &action, &invocation)?;
        Ok(StepOutcome::Ran)
    }

    /// Run the bootstrap script according to the configured [`BootstrapPolicy`].
    pub fn bootstrap(&mut self, ctx: &mut StepContext) -> Result<StepOutcome, StepError> {
        match self.config.scripts.bootstrap_policy {
            BootstrapPolicy::Guarded => self.run_fixed_script(FixedScript::Bootstrap, ctx),
            BootstrapPolicy::Unguarded => self.invoke_script(FixedScript::Bootstrap, ctx),
        }
    }

    /// Execute `script` if it exists.
    pub fn run_fixed_script(
        &mut self,
        script: FixedScript,
        ctx: &mut StepContext,
    ) -> Result<StepOutcome, StepError> {
        let path = ctx.path(self.config.scripts.path(script));
        if !path.is_file() {
            debug!(path = %path.display(), "script not present, skipping");
            return Ok(StepOutcome::MissingPath(path));
        }
        self.invoke_script(script, ctx)
    }

    fn invoke_script(
        &mut self,
        script: FixedScript,
        ctx: &StepContext,
    ) -> Result<StepOutcome, StepError> {
        if let Some(line) = script.progress() {
            self.say(line);
        }
        let invocation = Invocation::new(ctx.path(self.config.scripts.path(script)), ctx);
        run_checked(self.executor, script.action(), &invocation)?;
        Ok(StepOutcome::Ran)
    }

    /// Run a named project script if the ecosystem's listing defines it.
    pub fn probe_and_run(
        &mut self,
        ecosystem: Ecosystem,
        task: ScriptTask,
        ctx: &mut StepContext,
    ) -> Result<StepOutcome, StepError> {
        let script = task.script_name();
        let action = format!("check or run {} {script}", ecosystem.label());

        let probe = Invocation::new(ecosystem.program(), ctx)
            .args(ecosystem.list_scripts_args().iter().copied());
        let listing = capture_checked(self.executor, &action, &probe)?;
        if !defines_script(&listing.stdout, script, ecosystem.listing_format()) {
            debug!(script, "script not defined");
            self.say(&task.not_defined_message(ecosystem));
            return Ok(StepOutcome::NotDefined);
        }

        self.say(&format!("==> Running {} {script}...", ecosystem.label()));
        let invocation =
            Invocation::new(ecosystem.program(), ctx).args(ecosystem.run_script_args(script));
        run_checked(self.executor, &action, &invocation)?;
        Ok(StepOutcome::Ran)
    }

    /// Load the dotfile into the context's environment overlay if it exists.
    pub fn load_env(&mut self, ctx: &mut StepContext) -> Result<StepOutcome, StepError> {
        let path = ctx.path(&self.config.env_file);
        if !path.is_file() {
            debug!(path = %path.display(), "no environment file, skipping");
            return Ok(StepOutcome::MissingPath(path));
        }

        self.say("==> Setting up environment variables...");
        let vars = read_env_file(&path)?;
        let count = vars.len();
        for (key, value) in vars {
            ctx.set_var(key, value);
        }
        info!(count, "loaded environment variables");
        Ok(StepOutcome::EnvUpdated(count))
    }

    /// Set `XDEBUG_MODE=coverage`, replacing any earlier value.
    pub fn xdebug_coverage(&mut self, ctx: &mut StepContext) -> StepOutcome {
        ctx.set_var(XDEBUG_MODE_VAR, XDEBUG_COVERAGE);
        StepOutcome::EnvUpdated(1)
    }

    fn say(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}") {
            warn!(err = %err, "failed to write progress line");
        }
    }
}

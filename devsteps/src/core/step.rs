//! Step catalogue and per-step result types.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Every step the runner can execute, named as on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum Step {
    GitRoot,
    ComposerInstall,
    NpmInstall,
    Bootstrap,
    ComposerLint,
    ComposerLintFix,
    ComposerTest,
    NpmLint,
    NpmLintFix,
    NpmTest,
    SetupDb,
    UpdateDb,
    LoadEnv,
    XdebugCoverage,
}

impl Step {
    /// Catalogue order, which is also the conventional call order.
    pub const ALL: [Self; 14] = [
        Self::GitRoot,
        Self::ComposerInstall,
        Self::NpmInstall,
        Self::LoadEnv,
        Self::XdebugCoverage,
        Self::Bootstrap,
        Self::SetupDb,
        Self::UpdateDb,
        Self::ComposerLint,
        Self::ComposerLintFix,
        Self::ComposerTest,
        Self::NpmLint,
        Self::NpmLintFix,
        Self::NpmTest,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::GitRoot => "git-root",
            Self::ComposerInstall => "composer-install",
            Self::NpmInstall => "npm-install",
            Self::Bootstrap => "bootstrap",
            Self::ComposerLint => "composer-lint",
            Self::ComposerLintFix => "composer-lint-fix",
            Self::ComposerTest => "composer-test",
            Self::NpmLint => "npm-lint",
            Self::NpmLintFix => "npm-lint-fix",
            Self::NpmTest => "npm-test",
            Self::SetupDb => "setup-db",
            Self::UpdateDb => "update-db",
            Self::LoadEnv => "load-env",
            Self::XdebugCoverage => "xdebug-coverage",
        }
    }

    /// One-line description for `devsteps list`.
    pub const fn summary(self) -> &'static str {
        match self {
            Self::GitRoot => "Change to the top-level directory of the git repository",
            Self::ComposerInstall => "Install Composer dependencies unless vendor/ exists",
            Self::NpmInstall => "Install NPM dependencies unless node_modules/ exists",
            Self::Bootstrap => "Run script/bootstrap",
            Self::ComposerLint => "Run the Composer `lint` script if defined",
            Self::ComposerLintFix => "Run the Composer `lint:fix` script if defined",
            Self::ComposerTest => "Run the Composer `test` script if defined",
            Self::NpmLint => "Run the NPM `lint` script if defined",
            Self::NpmLintFix => "Run the NPM `lint:fix` script if defined",
            Self::NpmTest => "Run the NPM `test` script if defined",
            Self::SetupDb => "Run script/setup-db if present",
            Self::UpdateDb => "Run script/update-db if present",
            Self::LoadEnv => "Load KEY=VALUE lines from .env into the environment",
            Self::XdebugCoverage => "Set XDEBUG_MODE=coverage",
        }
    }
}

/// Project scripts executed directly from a conventional relative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedScript {
    Bootstrap,
    SetupDb,
    UpdateDb,
}

impl FixedScript {
    /// Line printed before the script runs. `bootstrap` runs silently.
    pub const fn progress(self) -> Option<&'static str> {
        match self {
            Self::Bootstrap => None,
            Self::SetupDb => Some("==> Setting up database..."),
            Self::UpdateDb => Some("==> Updating database..."),
        }
    }

    /// Error context used when the script fails.
    pub const fn action(self) -> &'static str {
        match self {
            Self::Bootstrap => "run bootstrap script",
            Self::SetupDb => "set up database",
            Self::UpdateDb => "update database",
        }
    }
}

/// Whether `bootstrap` checks that its script exists before invoking it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapPolicy {
    /// Always invoke the script; a missing file is a spawn failure.
    #[default]
    Unguarded,
    /// Skip silently when the script is absent, like `setup-db`.
    Guarded,
}

/// Result of a step that completed without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// External command(s) ran and exited successfully.
    Ran,
    /// The guard path was absent; nothing was invoked.
    MissingPath(PathBuf),
    /// Manifest and dependency directory both exist; install skipped.
    AlreadyInstalled,
    /// The probed script is not defined by the project.
    NotDefined,
    /// The working directory now points at the repository root.
    RootResolved(PathBuf),
    /// This many variables were written into the environment overlay.
    EnvUpdated(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_cli_values() {
        for step in Step::ALL {
            let parsed = Step::from_str(step.name(), false).expect("parse step name");
            assert_eq!(parsed, step);
        }
    }

    #[test]
    fn catalogue_lists_each_step_once() {
        let mut names: Vec<&str> = Step::ALL.iter().map(|step| step.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Step::value_variants().len());
    }

    #[test]
    fn bootstrap_policy_defaults_to_unguarded() {
        assert_eq!(BootstrapPolicy::default(), BootstrapPolicy::Unguarded);
    }
}

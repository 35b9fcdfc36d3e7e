//! The two package ecosystems the runner knows how to drive.

use crate::core::listing::ListingFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ecosystem {
    Composer,
    Npm,
}

impl Ecosystem {
    /// Name used in progress lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Composer => "Composer",
            Self::Npm => "NPM",
        }
    }

    pub const fn program(self) -> &'static str {
        match self {
            Self::Composer => "composer",
            Self::Npm => "npm",
        }
    }

    /// Manifest whose presence enables the install step.
    pub const fn manifest(self) -> &'static str {
        match self {
            Self::Composer => "composer.json",
            Self::Npm => "package.json",
        }
    }

    /// Directory whose presence means dependencies are already installed.
    pub const fn dependency_dir(self) -> &'static str {
        match self {
            Self::Composer => "vendor",
            Self::Npm => "node_modules",
        }
    }

    pub const fn install_args(self) -> &'static [&'static str] {
        match self {
            Self::Composer => &["install", "--no-interaction", "--prefer-dist"],
            Self::Npm => &["install", "--silent"],
        }
    }

    /// Arguments that print the project's named scripts.
    pub const fn list_scripts_args(self) -> &'static [&'static str] {
        match self {
            Self::Composer => &["run-script", "--list"],
            Self::Npm => &["run"],
        }
    }

    pub const fn listing_format(self) -> ListingFormat {
        match self {
            Self::Composer => ListingFormat::TwoColumn,
            Self::Npm => ListingFormat::OneColumn,
        }
    }

    /// Arguments that run the named script.
    pub fn run_script_args(self, script: &str) -> Vec<String> {
        match self {
            Self::Composer => vec![script.to_string()],
            Self::Npm => vec!["run".to_string(), script.to_string()],
        }
    }
}

/// Named project scripts probed for before running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptTask {
    Lint,
    LintFix,
    Test,
}

impl ScriptTask {
    pub const fn script_name(self) -> &'static str {
        match self {
            Self::Lint => "lint",
            Self::LintFix => "lint:fix",
            Self::Test => "test",
        }
    }

    /// Line printed when the project does not define the script.
    pub fn not_defined_message(self, ecosystem: Ecosystem) -> String {
        let marker = match self {
            Self::Test => "==>",
            Self::Lint | Self::LintFix => "===>",
        };
        format!(
            "{marker} {} {} script not defined",
            ecosystem.label(),
            self.script_name()
        )
    }
}

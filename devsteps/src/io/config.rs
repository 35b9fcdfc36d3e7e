//! Optional `devsteps.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::step::{BootstrapPolicy, FixedScript};

/// Default config file name, looked up in the invocation directory.
pub const DEFAULT_CONFIG_FILE: &str = "devsteps.toml";

/// Runner configuration (TOML).
///
/// Every field has a default matching the conventional project layout, so a
/// missing file and an empty file behave the same.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DevstepsConfig {
    /// Dotfile loaded by `load-env`, relative to the working directory.
    pub env_file: PathBuf,

    /// Kill external commands that run longer than this. Unset waits forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,

    pub scripts: ScriptsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScriptsConfig {
    pub bootstrap: PathBuf,
    pub setup_db: PathBuf,
    pub update_db: PathBuf,
    pub bootstrap_policy: BootstrapPolicy,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            bootstrap: PathBuf::from("script/bootstrap"),
            setup_db: PathBuf::from("script/setup-db"),
            update_db: PathBuf::from("script/update-db"),
            bootstrap_policy: BootstrapPolicy::default(),
        }
    }
}

impl ScriptsConfig {
    pub fn path(&self, script: FixedScript) -> &Path {
        match script {
            FixedScript::Bootstrap => &self.bootstrap,
            FixedScript::SetupDb => &self.setup_db,
            FixedScript::UpdateDb => &self.update_db,
        }
    }
}

impl Default for DevstepsConfig {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from(".env"),
            command_timeout_secs: None,
            scripts: ScriptsConfig::default(),
        }
    }
}

impl DevstepsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.env_file.as_os_str().is_empty() {
            return Err(anyhow!("env_file must not be empty"));
        }
        if self.command_timeout_secs == Some(0) {
            return Err(anyhow!("command_timeout_secs must be > 0"));
        }
        for (name, path) in [
            ("scripts.bootstrap", &self.scripts.bootstrap),
            ("scripts.setup_db", &self.scripts.setup_db),
            ("scripts.update_db", &self.scripts.update_db),
        ] {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("{name} must not be empty"));
            }
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `DevstepsConfig::default()`.
pub fn load_config(path: &Path) -> Result<DevstepsConfig> {
    if !path.exists() {
        return Ok(DevstepsConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: DevstepsConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Render config as TOML with a trailing newline.
pub fn render_config(cfg: &DevstepsConfig) -> Result<String> {
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    if !buf.ends_with('\n') {
        buf.push('\n');
    }
    Ok(buf)
}

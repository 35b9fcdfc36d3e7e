//! Reading `KEY=VALUE` dotfiles from disk.

use std::fs;
use std::path::Path;

use tracing::{debug, instrument};

use crate::core::dotenv::parse_env_lines;
use crate::core::error::StepError;

/// Read and parse the dotfile at `path`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, StepError> {
    let contents = fs::read_to_string(path).map_err(|source| StepError::ReadEnvFile {
        path: path.to_path_buf(),
        source,
    })?;
    let vars = parse_env_lines(&contents).map_err(|err| {
        debug!(line = err.line, "malformed environment line");
        StepError::MalformedEnvLine {
            path: path.to_path_buf(),
            line: err.line,
            content: err.content,
        }
    })?;
    debug!(count = vars.len(), "parsed environment file");
    Ok(vars)
}

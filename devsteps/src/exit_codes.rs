//! Stable exit codes for the `devsteps` CLI.

use crate::core::error::{CommandFailure, StepError};

/// Every requested step completed, including no-ops.
pub const OK: i32 = 0;
/// Environment, format, spawn, timeout or configuration failure.
pub const FAILURE: i32 = 1;

/// Exit code to terminate with after `err`.
///
/// A command that exited non-zero passes its own code through; everything
/// else maps to [`FAILURE`].
pub fn for_error(err: &StepError) -> i32 {
    match err {
        StepError::CommandFailed {
            failure: CommandFailure::Exit(code),
            ..
        } if *code != OK => *code,
        _ => FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_exit_code_is_propagated() {
        let err = StepError::CommandFailed {
            action: "run NPM test".to_string(),
            command: "npm run test".to_string(),
            failure: CommandFailure::Exit(3),
        };
        assert_eq!(for_error(&err), 3);
    }

    #[test]
    fn non_exit_failures_map_to_failure() {
        let timed_out = StepError::CommandFailed {
            action: "set up database".to_string(),
            command: "script/setup-db".to_string(),
            failure: CommandFailure::TimedOut,
        };
        let env = StepError::GitRoot {
            detail: "fatal: not a git repository".to_string(),
        };
        assert_eq!(for_error(&timed_out), FAILURE);
        assert_eq!(for_error(&env), FAILURE);
    }
}

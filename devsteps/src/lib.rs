//! Developer-workflow steps for project bootstrap and CI wrappers.
//!
//! Each step is a single guarded action: check a marker path or a script
//! listing, then maybe invoke an external tool (git, Composer, npm, or one of
//! the project's `script/*` files). The crate keeps a strict split:
//!
//! - **[`core`]**: Pure logic (step catalogue, listing matching, dotfile
//!   parsing, error taxonomy). No I/O.
//! - **[`io`]**: Side effects (process spawning, git, dotfile reading, config).
//!   Process execution sits behind [`io::executor::CommandExecutor`] so tests
//!   can script it.
//!
//! [`steps::StepRunner`] combines the two against a [`context::StepContext`],
//! which carries the working directory and environment overlay between steps
//! instead of mutating the real process state.

pub mod context;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod steps;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

//! I/O helpers for step execution.

pub mod config;
pub mod env_file;
pub mod executor;
pub mod git;
pub mod process;

//! Pure step logic: no filesystem access, no process spawning.

pub mod dotenv;
pub mod ecosystem;
pub mod error;
pub mod listing;
pub mod step;

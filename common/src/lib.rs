//! Shared plumbing for the workspace: errors, configuration and logging.

pub mod error;
pub mod utils;

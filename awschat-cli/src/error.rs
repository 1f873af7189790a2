//! CLI-specific error types

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Agent construction error from [`crate::build_agent`]
    #[error("Agent error: {0}")]
    Agent(#[from] awschat_core::Error),

    /// Readline/input error
    #[error("Input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// IO error (stdout, stderr)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

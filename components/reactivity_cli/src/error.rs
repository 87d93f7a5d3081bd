//! Error types for the CLI

use builtins::JsError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// A native fault raised while running a scenario
    #[error("JavaScript error: {0}")]
    Js(#[from] JsError),

    /// No scenario has the requested name
    #[error("unknown scenario '{0}' (use --list to see the available ones)")]
    UnknownScenario(String),

    /// A scenario observed something other than what it expects
    #[error("scenario '{scenario}' failed check: {check}")]
    CheckFailed {
        /// Scenario name
        scenario: &'static str,
        /// The failed check
        check: String,
    },

    /// The log filter could not be parsed
    #[error("invalid log filter: {0}")]
    LogFilter(String),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

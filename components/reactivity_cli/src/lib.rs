//! Reactivity demo CLI library
//!
//! Provides the argument parser and the named scenarios the demo binary runs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod scenarios;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use scenarios::{Scenario, ScenarioReport, SCENARIOS};

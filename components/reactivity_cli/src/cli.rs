//! Command-line arguments

use clap::Parser;

/// Run reactivity scenarios and print what the engine reported
#[derive(Debug, Parser)]
#[command(name = "reactivity-demo", version, about)]
pub struct Cli {
    /// Scenario to run; all scenarios run when omitted
    #[arg(short, long)]
    pub scenario: Option<String>,

    /// List the available scenarios and exit
    #[arg(short, long)]
    pub list: bool,

    /// Log filter used when RUST_LOG is unset (e.g. "warn", "reactivity=trace")
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

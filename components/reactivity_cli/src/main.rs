//! Reactivity demo CLI
//!
//! Entry point for the demo. Parses CLI arguments, installs logging and
//! runs the requested scenarios.

use clap::Parser as ClapParser;
use reactivity_cli::{scenarios, Cli, CliError, CliResult, SCENARIOS};
use tracing_subscriber::EnvFilter;

fn init_logging(log_level: &str) -> CliResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            EnvFilter::try_new(log_level).map_err(|e| CliError::LogFilter(e.to_string()))?
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run(cli: Cli) -> CliResult<()> {
    init_logging(&cli.log_level)?;

    if cli.list {
        for scenario in SCENARIOS {
            println!("{:<14} {}", scenario.name, scenario.description);
        }
        return Ok(());
    }

    let selected = match cli.scenario {
        Some(name) => vec![scenarios::find(&name)?],
        None => SCENARIOS.iter().collect(),
    };

    for scenario in selected {
        let report = scenario.run()?;
        println!("== {}", report.scenario);
        for line in &report.lines {
            println!("   {}", line);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

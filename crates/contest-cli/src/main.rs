//! Contest CLI - check and replay competition scenarios.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod scenario;

/// Contest - reputation-weighted competitions
#[derive(Parser, Debug)]
#[command(name = "contest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a scenario file without running it
    Check {
        /// Path to the scenario YAML
        scenario: PathBuf,
    },

    /// Run a scenario and print its events and standings
    Replay {
        /// Path to the scenario YAML
        scenario: PathBuf,
        /// Print events and standings as JSON lines
        #[arg(long)]
        json: bool,
        /// Fail on the first rejected step
        #[arg(long)]
        strict: bool,
    },

    /// Show version information
    Version,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Check { scenario } => commands::check(&scenario)
            .with_context(|| format!("checking {}", scenario.display())),
        Commands::Replay {
            scenario,
            json,
            strict,
        } => commands::replay(&scenario, json, strict)
            .with_context(|| format!("replaying {}", scenario.display())),
        Commands::Version => {
            println!("contest {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("contest={log_level},contest_engine={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

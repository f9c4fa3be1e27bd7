use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tkt_cli::commands::{analyze, check, hours};
use tkt_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let calendar = config
        .calendar()
        .context("invalid business-hours configuration")?;

    match &cli.command {
        Some(Commands::Analyze { file, json, now }) => {
            analyze::run(&calendar, file, *json, now.as_deref())?;
        }
        Some(Commands::Check { start, end }) => {
            check::run(&calendar, start, end)?;
        }
        Some(Commands::Hours) => {
            hours::run(&config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}

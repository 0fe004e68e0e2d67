use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod format;
mod util;

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr; stdout carries command output only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::apply_overrides(Config::load(), cli.database, cli.provider_url);

    match cli.command {
        Commands::Init { year } => commands::cmd_init(year, &config).await,
        Commands::Locations { register, format } => {
            commands::cmd_locations(register, format, &config).await
        }
        Commands::Current { name, format } => commands::cmd_current(&name, format, &config).await,
        Commands::Sync { name, year } => commands::cmd_sync(&name, year, &config).await,
        Commands::Query { window } => commands::cmd_query(window, &config),
        Commands::Status { format } => commands::cmd_status(format, &config),
        Commands::Export {
            location,
            since,
            until,
            format,
            output,
        } => commands::cmd_export(&location, since, until, format, output, &config),
        Commands::Reset { yes } => commands::cmd_reset(yes, &config),
    }
}

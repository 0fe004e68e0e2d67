//! Locations command - list and register archive locations.

use anyhow::{Context, Result};
use stratus_core::{Reconciler, StalenessPolicy};
use stratus_provider::HttpProvider;
use stratus_store::Store;
use time::format_description::well_known::Rfc3339;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::format::csv_escape;

/// Execute the locations command.
pub async fn cmd_locations(register: bool, format: OutputFormat, config: &Config) -> Result<()> {
    let store = Store::open(config.database_path()).context("Failed to open database")?;

    if register {
        let provider = HttpProvider::new(&config.provider_url).context("Invalid provider URL")?;
        let policy = StalenessPolicy::from_minutes(config.staleness_minutes);
        let reconciler = Reconciler::new(&store, &provider, policy);
        let report = reconciler
            .register_locations()
            .await
            .context("Failed to register provider locations")?;
        println!(
            "Discovered {} locations, {} newly registered\n",
            report.discovered, report.registered
        );
    }

    let locations = store.all_locations()?;

    if locations.is_empty() {
        println!("No locations registered. Run 'stratus init' or 'stratus locations --register'.");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&locations)?);
        }
        OutputFormat::Csv => {
            println!("name,site_code,country,registered_at");
            for location in &locations {
                println!(
                    "{},{},{},{}",
                    csv_escape(&location.name),
                    location.site_code,
                    location.country,
                    location.registered_at.format(&Rfc3339)?
                );
            }
        }
        OutputFormat::Text => {
            println!("Registered locations:\n");
            for location in &locations {
                println!(
                    "  {} ({}, {})",
                    location.name, location.site_code, location.country
                );
                println!(
                    "    Registered: {}",
                    location.registered_at.format(&Rfc3339)?
                );
                println!();
            }
        }
    }

    Ok(())
}

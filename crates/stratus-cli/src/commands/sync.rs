//! Sync command - merge a provider year series into the archive.

use anyhow::{Context, Result};
use stratus_core::{Reconciler, StalenessPolicy};
use stratus_provider::HttpProvider;
use stratus_store::Store;
use time::OffsetDateTime;

use crate::config::Config;

/// Execute the sync command.
pub async fn cmd_sync(name: &str, year: Option<i32>, config: &Config) -> Result<()> {
    let store = Store::open(config.database_path()).context("Failed to open database")?;
    let provider = HttpProvider::new(&config.provider_url).context("Invalid provider URL")?;
    let policy = StalenessPolicy::from_minutes(config.staleness_minutes);

    let year = year.unwrap_or_else(|| OffsetDateTime::now_utc().year());

    let location = match store.location_by_name(name)? {
        Some(location) => location,
        None => anyhow::bail!(
            "Location not found: {}. Run 'stratus locations' to list known names.",
            name
        ),
    };

    println!("Syncing {} for {}...", name, year);

    let reconciler = Reconciler::new(&store, &provider, policy);
    let report = reconciler
        .ensure_year_coverage(name, year)
        .await
        .with_context(|| format!("Failed to sync {} for {}", name, year))?;

    let total = store.count_readings(Some(location.id))?;

    println!("Fetched: {} readings", report.fetched);
    println!("New: {} readings", report.inserted);
    println!("Total stored: {}", total);

    Ok(())
}

//! Init command - register provider locations and backfill a year.

use anyhow::{Context, Result};
use stratus_core::{Reconciler, StalenessPolicy};
use stratus_provider::HttpProvider;
use stratus_store::Store;
use time::OffsetDateTime;

use crate::config::Config;

/// Execute the init command.
pub async fn cmd_init(year: Option<i32>, config: &Config) -> Result<()> {
    let store = Store::open(config.database_path()).context("Failed to open database")?;
    let provider = HttpProvider::new(&config.provider_url).context("Invalid provider URL")?;
    let policy = StalenessPolicy::from_minutes(config.staleness_minutes);

    let year = year.unwrap_or_else(|| OffsetDateTime::now_utc().year());

    println!("Bootstrapping archive from {}...", config.provider_url);

    let reconciler = Reconciler::new(&store, &provider, policy);
    let report = reconciler.bootstrap(year).await.context("Bootstrap failed")?;

    println!("Locations discovered: {}", report.locations.discovered);
    println!("Locations registered: {}", report.locations.registered);
    println!("Readings inserted ({}): {}", year, report.readings_inserted);

    Ok(())
}

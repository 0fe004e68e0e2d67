//! Reset command - wipe the archive.

use anyhow::{Context, Result};
use stratus_store::Store;

use crate::config::Config;

/// Execute the reset command.
pub fn cmd_reset(yes: bool, config: &Config) -> Result<()> {
    if !yes {
        anyhow::bail!(
            "This deletes every archived location and reading. Re-run with --yes to confirm."
        );
    }

    let store = Store::open(config.database_path()).context("Failed to open database")?;

    let locations = store.count_locations()?;
    let readings = store.count_readings(None)?;

    store.clear_all()?;

    println!("Deleted {} locations and {} readings", locations, readings);
    Ok(())
}

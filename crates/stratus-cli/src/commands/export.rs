//! Export command - dump archived readings to CSV or JSON.

use std::io::Write;

use anyhow::{Context, Result};
use stratus_store::{ReadingQuery, Store};

use crate::cli::ExportFormat;
use crate::config::Config;
use crate::util::parse_datetime;

/// Execute the export command.
pub fn cmd_export(
    location: &str,
    since: Option<String>,
    until: Option<String>,
    format: ExportFormat,
    output: Option<std::path::PathBuf>,
    config: &Config,
) -> Result<()> {
    let store = Store::open(config.database_path()).context("Failed to open database")?;

    let stored = match store.location_by_name(location)? {
        Some(stored) => stored,
        None => anyhow::bail!(
            "Location not found: {}. Run 'stratus locations' to list known names.",
            location
        ),
    };

    let mut query = ReadingQuery::new().location(stored.id);

    if let Some(since_str) = since {
        let ts = parse_datetime(&since_str)?;
        query = query.since(ts);
    }

    if let Some(until_str) = until {
        let ts = parse_datetime(&until_str)?;
        query = query.until(ts);
    }

    let content = match format {
        ExportFormat::Csv => store.export_readings_csv(&query)?,
        ExportFormat::Json => store.export_readings_json(&query)?,
    };

    match output {
        Some(path) => {
            let mut file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create file: {}", path.display()))?;
            file.write_all(content.as_bytes())?;
            println!("Exported to {}", path.display());
        }
        None => {
            print!("{}", content);
        }
    }

    Ok(())
}

//! Current command - show a location's freshest reading.

use anyhow::{Context, Result};
use serde::Serialize;
use stratus_core::{Reconciler, Refresh, StalenessPolicy};
use stratus_provider::HttpProvider;
use stratus_store::{Store, StoredReading};
use time::format_description::well_known::Rfc3339;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::format::csv_escape;

/// Execute the current command.
///
/// Reconciles the stored latest reading against the provider before
/// printing, so a stale archive entry is refreshed as a side effect.
pub async fn cmd_current(name: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let store = Store::open(config.database_path()).context("Failed to open database")?;
    let provider = HttpProvider::new(&config.provider_url).context("Invalid provider URL")?;
    let policy = StalenessPolicy::from_minutes(config.staleness_minutes);

    let reconciler = Reconciler::new(&store, &provider, policy);
    let refresh = reconciler
        .ensure_current(name)
        .await
        .with_context(|| format!("Failed to refresh {}", name))?;

    let (outcome, merged, reading) = match refresh {
        Refresh::UnknownLocation => {
            anyhow::bail!(
                "Location not found: {}. Run 'stratus locations' to list known names.",
                name
            );
        }
        Refresh::First(reading) => ("first fetch", None, reading),
        Refresh::Current(reading) => ("already current", None, reading),
        Refresh::Appended(reading) => ("refreshed", None, reading),
        Refresh::Backfilled { merged, reading } => ("backfilled", Some(merged), reading),
    };

    let content = match format {
        OutputFormat::Json => format_current_json(name, outcome, merged, &reading)?,
        OutputFormat::Csv => format_current_csv(name, &reading)?,
        OutputFormat::Text => format_current_text(name, outcome, merged, &reading)?,
    };

    print!("{}", content);
    Ok(())
}

/// Format the reading as a short text block.
fn format_current_text(
    name: &str,
    outcome: &str,
    merged: Option<usize>,
    reading: &StoredReading,
) -> Result<String> {
    let mut output = format!(
        "{}: {:.1} C  {:.0}%  {:.1} hPa  wind {:.1} m/s @ {:.0}  {} ({})\n",
        name,
        reading.temperature,
        reading.humidity,
        reading.pressure,
        reading.wind_speed,
        reading.wind_direction,
        reading.summary,
        reading.description,
    );
    output.push_str(&format!(
        "  Recorded: {}\n",
        reading.recorded_at.format(&Rfc3339)?
    ));
    match merged {
        Some(count) => {
            output.push_str(&format!("  Outcome: {} ({} readings merged)\n", outcome, count));
        }
        None => {
            output.push_str(&format!("  Outcome: {}\n", outcome));
        }
    }
    Ok(output)
}

/// Format the reading as JSON.
fn format_current_json(
    name: &str,
    outcome: &str,
    merged: Option<usize>,
    reading: &StoredReading,
) -> Result<String> {
    #[derive(Serialize)]
    struct CurrentJson<'a> {
        location: &'a str,
        outcome: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        merged: Option<usize>,
        reading: &'a StoredReading,
    }

    let json = serde_json::to_string_pretty(&CurrentJson {
        location: name,
        outcome,
        merged,
        reading,
    })?;
    Ok(json + "\n")
}

/// Format the reading as a single CSV row with header.
fn format_current_csv(name: &str, reading: &StoredReading) -> Result<String> {
    Ok(format!(
        "location,recorded_at,summary,description,temperature,pressure,humidity,wind_speed,wind_direction\n\
         {},{},{},{},{},{},{},{},{}\n",
        csv_escape(name),
        reading.recorded_at.format(&Rfc3339)?,
        csv_escape(&reading.summary),
        csv_escape(&reading.description),
        reading.temperature,
        reading.pressure,
        reading.humidity,
        reading.wind_speed,
        reading.wind_direction,
    ))
}

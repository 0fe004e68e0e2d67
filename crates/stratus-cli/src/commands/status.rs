//! Status command - archive statistics.

use anyhow::{Context, Result};
use serde::Serialize;
use stratus_store::{SeriesStats, Store, StoredLocation};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::cli::OutputFormat;
use crate::config::Config;

/// Execute the status command.
pub fn cmd_status(format: OutputFormat, config: &Config) -> Result<()> {
    let db_path = config.database_path();
    let store = Store::open(&db_path).context("Failed to open database")?;

    let locations = store.all_locations()?;
    let total_readings = store.count_readings(None)?;

    let mut series = Vec::with_capacity(locations.len());
    for location in &locations {
        let stats = store.series_stats(location.id)?;
        series.push((location, stats));
    }

    match format {
        OutputFormat::Json => print_json(&db_path.display().to_string(), total_readings, &series),
        OutputFormat::Csv => print_csv(&series),
        OutputFormat::Text => print_text(&db_path.display().to_string(), total_readings, &series),
    }
}

fn format_opt_ts(ts: Option<OffsetDateTime>) -> Result<String> {
    match ts {
        Some(t) => Ok(t.format(&Rfc3339)?),
        None => Ok("-".to_string()),
    }
}

fn print_text(
    db_path: &str,
    total_readings: u64,
    series: &[(&StoredLocation, SeriesStats)],
) -> Result<()> {
    println!("Database: {}", db_path);
    println!("Locations: {}", series.len());
    println!("Readings: {}", total_readings);

    for (location, stats) in series {
        println!();
        println!("  {}: {} readings", location.name, stats.count);
        println!("    First: {}", format_opt_ts(stats.first_recorded_at)?);
        println!("    Last:  {}", format_opt_ts(stats.last_recorded_at)?);
    }

    Ok(())
}

fn print_csv(series: &[(&StoredLocation, SeriesStats)]) -> Result<()> {
    println!("location,count,first_recorded_at,last_recorded_at");
    for (location, stats) in series {
        println!(
            "{},{},{},{}",
            crate::format::csv_escape(&location.name),
            stats.count,
            format_opt_ts(stats.first_recorded_at)?,
            format_opt_ts(stats.last_recorded_at)?
        );
    }
    Ok(())
}

fn print_json(
    db_path: &str,
    total_readings: u64,
    series: &[(&StoredLocation, SeriesStats)],
) -> Result<()> {
    #[derive(Serialize)]
    struct StatusJson<'a> {
        database: &'a str,
        locations: usize,
        readings: u64,
        series: Vec<SeriesJson<'a>>,
    }

    #[derive(Serialize)]
    struct SeriesJson<'a> {
        location: &'a str,
        count: u64,
        #[serde(with = "time::serde::rfc3339::option")]
        first_recorded_at: Option<OffsetDateTime>,
        #[serde(with = "time::serde::rfc3339::option")]
        last_recorded_at: Option<OffsetDateTime>,
    }

    let json = StatusJson {
        database: db_path,
        locations: series.len(),
        readings: total_readings,
        series: series
            .iter()
            .map(|(location, stats)| SeriesJson {
                location: &location.name,
                count: stats.count,
                first_recorded_at: stats.first_recorded_at,
                last_recorded_at: stats.last_recorded_at,
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

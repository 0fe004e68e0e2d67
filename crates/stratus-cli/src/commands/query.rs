//! Query command - temporal-window lookups over the archive.

use std::collections::HashMap;

use anyhow::{Context, Result};
use stratus_core::WindowQueries;
use stratus_store::{Store, StoredReading};

use crate::cli::{OutputFormat, QueryWindow};
use crate::config::Config;
use crate::format::{format_readings_csv, format_readings_json, format_readings_text};
use crate::util::parse_datetime;

/// Execute the query command.
///
/// Out-of-range windows and unknown locations come back as empty result
/// sets, reported with a friendly message rather than an error.
pub fn cmd_query(window: QueryWindow, config: &Config) -> Result<()> {
    let store = Store::open(config.database_path()).context("Failed to open database")?;
    let queries = WindowQueries::new(&store);

    let (readings, format, window_label) = match &window {
        QueryWindow::Year {
            year,
            location,
            format,
        } => {
            let (readings, label) = match location {
                Some(name) => (queries.by_year(name, *year)?, format!("{} year {}", name, year)),
                None => (queries.by_year_all(*year)?, format!("year {}", year)),
            };
            (readings, *format, label)
        }
        QueryWindow::Month {
            month,
            location,
            format,
        } => (
            queries.by_month(location, *month)?,
            *format,
            format!("{} month {}", location, month),
        ),
        QueryWindow::Week {
            week,
            location,
            format,
        } => (
            queries.by_week(location, *week)?,
            *format,
            format!("{} week {}", location, week),
        ),
        QueryWindow::Days { days, format } => (
            queries.by_day_difference(*days)?,
            *format,
            format!("the last {} days", days),
        ),
        QueryWindow::Span {
            location,
            from,
            to,
            format,
        } => {
            let from = parse_datetime(from)?;
            let to = parse_datetime(to)?;
            (
                queries.by_time_span(location, from, to)?,
                *format,
                format!("{} in that span", location),
            )
        }
    };

    if readings.is_empty() {
        println!("No readings found for {}.", window_label);
        return Ok(());
    }

    print_readings(&store, &readings, format)
}

/// Print readings in the requested format, resolving location names.
fn print_readings(store: &Store, readings: &[StoredReading], format: OutputFormat) -> Result<()> {
    let names: HashMap<i64, String> = store
        .all_locations()?
        .into_iter()
        .map(|l| (l.id, l.name))
        .collect();

    let content = match format {
        OutputFormat::Json => format_readings_json(readings)?,
        OutputFormat::Csv => format_readings_csv(readings, &names),
        OutputFormat::Text => format_readings_text(readings, &names),
    };

    print!("{}", content);
    Ok(())
}

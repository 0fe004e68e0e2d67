//! Output formatting utilities for text, JSON, and CSV output.

use std::collections::HashMap;

use anyhow::Result;
use stratus_store::StoredReading;
use time::format_description::well_known::Rfc3339;

/// Maximum readings shown by the text formatter before truncating.
const MAX_TEXT_ROWS: usize = 20;

/// Escape a string for CSV output.
/// Wraps the value in quotes if it contains commas, quotes, or newlines.
/// Double quotes are escaped by doubling them.
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Render a timestamp as RFC 3339, falling back to a placeholder.
fn format_timestamp(reading: &StoredReading) -> String {
    reading
        .recorded_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| "Unknown".to_string())
}

/// Format readings as plain text rows, newest data capped for readability.
#[must_use]
pub fn format_readings_text(readings: &[StoredReading], names: &HashMap<i64, String>) -> String {
    if readings.is_empty() {
        return "No readings found.\n".to_string();
    }

    let mut output = format!("Readings ({}):\n\n", readings.len());
    output.push_str(&format!(
        "  {:<22} {:<14} {:>8} {:>6} {:>12}  {}\n",
        "Recorded", "Location", "Temp", "Hum", "Pressure", "Conditions"
    ));

    for reading in readings.iter().take(MAX_TEXT_ROWS) {
        let name = names
            .get(&reading.location_id)
            .map(String::as_str)
            .unwrap_or("?");
        output.push_str(&format!(
            "  {:<22} {:<14} {:>8} {:>6} {:>12}  {}\n",
            format_timestamp(reading),
            name,
            format!("{:.1} C", reading.temperature),
            format!("{:.0}%", reading.humidity),
            format!("{:.1} hPa", reading.pressure),
            reading.summary,
        ));
    }

    if readings.len() > MAX_TEXT_ROWS {
        output.push_str(&format!(
            "\n... and {} more readings\n",
            readings.len() - MAX_TEXT_ROWS
        ));
        output.push_str("(Use --format csv or --format json for full data)\n");
    }

    output
}

/// Format readings as CSV with a header row.
#[must_use]
pub fn format_readings_csv(readings: &[StoredReading], names: &HashMap<i64, String>) -> String {
    let mut output = String::from(
        "location,recorded_at,summary,description,temperature,pressure,humidity,wind_speed,wind_direction\n",
    );

    for reading in readings {
        let name = names
            .get(&reading.location_id)
            .map(String::as_str)
            .unwrap_or("");
        output.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            csv_escape(name),
            format_timestamp(reading),
            csv_escape(&reading.summary),
            csv_escape(&reading.description),
            reading.temperature,
            reading.pressure,
            reading.humidity,
            reading.wind_speed,
            reading.wind_direction,
        ));
    }

    output
}

/// Format readings as pretty-printed JSON.
pub fn format_readings_json(readings: &[StoredReading]) -> Result<String> {
    let json = serde_json::to_string_pretty(readings)?;
    Ok(json + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_reading(location_id: i64) -> StoredReading {
        StoredReading {
            id: 1,
            location_id,
            recorded_at: datetime!(2024-03-07 12:00:00 UTC),
            summary: "Clear".to_string(),
            description: "clear sky".to_string(),
            temperature: 4.0,
            pressure: 1017.0,
            humidity: 61.0,
            wind_speed: 2.1,
            wind_direction: 180.0,
        }
    }

    fn davos_names() -> HashMap<i64, String> {
        let mut names = HashMap::new();
        names.insert(1, "Davos".to_string());
        names
    }

    #[test]
    fn test_csv_escape_plain() {
        assert_eq!(csv_escape("Davos"), "Davos");
    }

    #[test]
    fn test_csv_escape_comma_and_quote() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_text_empty() {
        let output = format_readings_text(&[], &HashMap::new());
        assert_eq!(output, "No readings found.\n");
    }

    #[test]
    fn test_text_contains_location_and_values() {
        let output = format_readings_text(&[sample_reading(1)], &davos_names());
        assert!(output.contains("Readings (1):"));
        assert!(output.contains("Davos"));
        assert!(output.contains("4.0 C"));
        assert!(output.contains("1017.0 hPa"));
        assert!(output.contains("Clear"));
    }

    #[test]
    fn test_text_truncates_long_lists() {
        let readings: Vec<StoredReading> = (0..25)
            .map(|i| {
                let mut r = sample_reading(1);
                r.id = i;
                r
            })
            .collect();

        let output = format_readings_text(&readings, &davos_names());
        assert!(output.contains("Readings (25):"));
        assert!(output.contains("... and 5 more readings"));
    }

    #[test]
    fn test_csv_header_and_row() {
        let output = format_readings_csv(&[sample_reading(1)], &davos_names());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("location,recorded_at,summary"));
        assert!(lines[1].starts_with("Davos,2024-03-07T12:00:00Z,Clear"));

        let header_cols = lines[0].split(',').count();
        let data_cols = lines[1].split(',').count();
        assert_eq!(header_cols, data_cols);
    }

    #[test]
    fn test_csv_unknown_location_is_blank() {
        let output = format_readings_csv(&[sample_reading(99)], &davos_names());
        let data_line = output.lines().nth(1).unwrap();
        assert!(data_line.starts_with(",2024-03-07"));
    }

    #[test]
    fn test_json_is_array() {
        let output = format_readings_json(&[sample_reading(1)]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed.is_array());
        assert_eq!(parsed[0]["summary"], "Clear");
        assert_eq!(parsed[0]["recorded_at"], "2024-03-07T12:00:00Z");
    }
}

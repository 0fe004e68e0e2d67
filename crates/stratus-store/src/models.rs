//! Data models for stored data.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use stratus_types::{LocationInfo, Reading};

/// A location stored in the database.
///
/// Locations are immutable once registered; only the surrogate `id` and
/// `registered_at` are added on top of the provider-supplied fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredLocation {
    /// Database row ID.
    pub id: i64,
    /// Unique location name.
    pub name: String,
    /// Provider's numeric site identifier.
    pub site_code: u32,
    /// Country token.
    pub country: String,
    /// When this location was first registered.
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
}

impl StoredLocation {
    /// Convert to the provider-shaped descriptor.
    pub fn to_info(&self) -> LocationInfo {
        LocationInfo {
            name: self.name.clone(),
            site_code: self.site_code,
            country: self.country.clone(),
        }
    }
}

/// A reading stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReading {
    /// Database row ID.
    pub id: i64,
    /// Owning location's row ID.
    pub location_id: i64,
    /// When the observation was made.
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
    /// Condition token.
    pub summary: String,
    /// Condition detail text.
    pub description: String,
    /// Temperature in Celsius.
    pub temperature: f64,
    /// Pressure in hPa.
    pub pressure: f64,
    /// Relative humidity percentage.
    pub humidity: f64,
    /// Wind speed in m/s.
    pub wind_speed: f64,
    /// Wind direction in degrees.
    pub wind_direction: f64,
}

impl StoredReading {
    /// Create a StoredReading from a provider Reading.
    pub fn from_reading(location_id: i64, reading: &Reading) -> Self {
        Self {
            id: 0, // Will be set by database
            location_id,
            recorded_at: reading.recorded_at,
            summary: reading.summary.clone(),
            description: reading.description.clone(),
            temperature: reading.temperature,
            pressure: reading.pressure,
            humidity: reading.humidity,
            wind_speed: reading.wind_speed,
            wind_direction: reading.wind_direction,
        }
    }

    /// Convert to a provider-shaped Reading.
    pub fn to_reading(&self) -> Reading {
        Reading {
            recorded_at: self.recorded_at,
            summary: self.summary.clone(),
            description: self.description.clone(),
            temperature: self.temperature,
            pressure: self.pressure,
            humidity: self.humidity,
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction,
        }
    }
}

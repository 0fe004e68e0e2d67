//! Core types for weather locations and readings.

use core::fmt;

use time::OffsetDateTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A weather location as reported by the remote provider.
///
/// Locations are addressed by `name` everywhere in the system; the name is
/// the unique key. The `site_code` is the provider's numeric site identifier
/// and is carried along for display and diagnostics, never used for lookup.
///
/// # Examples
///
/// ```
/// use stratus_types::LocationInfo;
///
/// let davos = LocationInfo::new("Davos", 7270, "CH");
/// assert_eq!(davos.name, "Davos");
/// assert_eq!(format!("{}", davos), "Davos (7270, CH)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocationInfo {
    /// Unique human-readable location name (e.g. "Davos").
    pub name: String,
    /// Provider's numeric site identifier.
    pub site_code: u32,
    /// Country token (e.g. "CH").
    pub country: String,
}

impl LocationInfo {
    /// Create a new location descriptor.
    pub fn new(name: impl Into<String>, site_code: u32, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            site_code,
            country: country.into(),
        }
    }
}

impl fmt::Display for LocationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.site_code, self.country)
    }
}

/// A single weather observation at one point in time.
///
/// Timestamps carry second precision; the store guarantees at most one
/// reading per (location, `recorded_at`) pair, so two readings with the same
/// timestamp for the same location are by definition the same observation.
///
/// # Examples
///
/// ```
/// use stratus_types::Reading;
/// use time::macros::datetime;
///
/// let reading = Reading::builder()
///     .recorded_at(datetime!(2024-03-01 12:00:00 UTC))
///     .summary("Clear")
///     .temperature(-3.5)
///     .build();
///
/// assert_eq!(reading.summary, "Clear");
/// assert!((reading.temperature - (-3.5)).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// When the observation was made (UTC, second precision).
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub recorded_at: OffsetDateTime,
    /// Short condition token (e.g. "Clear", "Rain", "Snow").
    pub summary: String,
    /// Free-text condition detail.
    pub description: String,
    /// Air temperature in degrees Celsius.
    pub temperature: f64,
    /// Atmospheric pressure in hPa.
    pub pressure: f64,
    /// Relative humidity percentage (0-100).
    pub humidity: f64,
    /// Wind speed in m/s.
    pub wind_speed: f64,
    /// Wind direction in degrees (0-360).
    pub wind_direction: f64,
}

impl Default for Reading {
    fn default() -> Self {
        Self {
            recorded_at: OffsetDateTime::UNIX_EPOCH,
            summary: String::new(),
            description: String::new(),
            temperature: 0.0,
            pressure: 0.0,
            humidity: 0.0,
            wind_speed: 0.0,
            wind_direction: 0.0,
        }
    }
}

impl Reading {
    /// Create a builder for constructing a `Reading`.
    pub fn builder() -> ReadingBuilder {
        ReadingBuilder::default()
    }
}

/// Builder for constructing a [`Reading`].
///
/// Use [`build`](Self::build) for unchecked construction, or
/// [`try_build`](Self::try_build) for validation of field values.
#[derive(Debug, Default)]
#[must_use]
pub struct ReadingBuilder {
    reading: Reading,
}

impl ReadingBuilder {
    /// Set the observation timestamp.
    pub fn recorded_at(mut self, at: OffsetDateTime) -> Self {
        self.reading.recorded_at = at;
        self
    }

    /// Set the condition token.
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.reading.summary = summary.into();
        self
    }

    /// Set the condition detail text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.reading.description = description.into();
        self
    }

    /// Set temperature in °C.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.reading.temperature = temperature;
        self
    }

    /// Set pressure in hPa.
    pub fn pressure(mut self, pressure: f64) -> Self {
        self.reading.pressure = pressure;
        self
    }

    /// Set relative humidity (0-100).
    pub fn humidity(mut self, humidity: f64) -> Self {
        self.reading.humidity = humidity;
        self
    }

    /// Set wind speed in m/s.
    pub fn wind_speed(mut self, wind_speed: f64) -> Self {
        self.reading.wind_speed = wind_speed;
        self
    }

    /// Set wind direction in degrees (0-360).
    pub fn wind_direction(mut self, wind_direction: f64) -> Self {
        self.reading.wind_direction = wind_direction;
        self
    }

    /// Build the `Reading` without validation.
    #[must_use]
    pub fn build(self) -> Reading {
        self.reading
    }

    /// Build the `Reading` with validation.
    ///
    /// Validates:
    /// - `humidity` is 0-100
    /// - `wind_direction` is 0-360
    /// - `wind_speed` is non-negative
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidValue`] if any field has an invalid value.
    pub fn try_build(self) -> Result<Reading, ValidationError> {
        if !(0.0..=100.0).contains(&self.reading.humidity) {
            return Err(ValidationError::InvalidValue(format!(
                "humidity {} is outside valid range (0-100)",
                self.reading.humidity
            )));
        }

        if !(0.0..=360.0).contains(&self.reading.wind_direction) {
            return Err(ValidationError::InvalidValue(format!(
                "wind direction {} is outside valid range (0-360)",
                self.reading.wind_direction
            )));
        }

        if self.reading.wind_speed < 0.0 {
            return Err(ValidationError::InvalidValue(format!(
                "wind speed {} cannot be negative",
                self.reading.wind_speed
            )));
        }

        Ok(self.reading)
    }
}

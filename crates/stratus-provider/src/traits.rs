//! Trait abstraction over weather data providers.
//!
//! This module provides the [`WeatherProvider`] trait that abstracts over
//! the real HTTP provider and mock providers for testing.

use async_trait::async_trait;

use stratus_types::{LocationInfo, Reading};

use crate::error::Result;

/// Trait abstracting a remote weather data provider.
///
/// This trait enables writing code that works against both the real HTTP
/// provider and a mock provider in tests. A provider is a read-only data
/// source: it publishes a set of named locations, the current reading per
/// location, and a per-year series of past readings.
///
/// # Example
///
/// ```ignore
/// use stratus_provider::{Result, WeatherProvider};
///
/// async fn print_current<P: WeatherProvider>(provider: &P, name: &str) -> Result<()> {
///     let reading = provider.current_reading(name).await?;
///     println!("{}: {:.1} °C", name, reading.temperature);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// List the names of all locations the provider publishes.
    async fn location_names(&self) -> Result<Vec<String>>;

    /// Fetch full detail for a named location.
    ///
    /// Returns `Ok(None)` when the provider does not know the name.
    async fn location_detail(&self, name: &str) -> Result<Option<LocationInfo>>;

    /// Fetch the most recent reading for a named location.
    async fn current_reading(&self, name: &str) -> Result<Reading>;

    /// Fetch the provider's series for a location and calendar year.
    ///
    /// The returned series carries no ordering guarantee and may contain
    /// readings a caller has already seen.
    async fn year_series(&self, name: &str, year: i32) -> Result<Vec<Reading>>;
}

//! Mock provider implementation for testing.
//!
//! This module provides a mock weather data provider that can be used for
//! unit testing without a network. The [`MockProvider`] implements the
//! [`WeatherProvider`] trait, allowing it to be used interchangeably with
//! the real HTTP provider in generic code.
//!
//! # Features
//!
//! - **Fixtures**: per-location current readings and per-year series
//! - **Failure injection**: flip the provider offline to exercise error paths
//! - **Call counting**: assert how often readings were actually fetched

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use stratus_types::{LocationInfo, Reading};

use crate::error::{Error, Result};
use crate::traits::WeatherProvider;

/// A mock weather data provider for testing.
///
/// Implements [`WeatherProvider`] for use in generic code and testing.
///
/// # Example
///
/// ```
/// use stratus_provider::{MockProvider, WeatherProvider};
/// use stratus_types::LocationInfo;
///
/// #[tokio::main]
/// async fn main() {
///     let provider = MockProvider::new();
///     provider
///         .add_location(LocationInfo::new("Davos", 7260, "CH"))
///         .await;
///
///     let names = provider.location_names().await.unwrap();
///     assert_eq!(names, vec!["Davos".to_string()]);
/// }
/// ```
#[derive(Debug, Default)]
pub struct MockProvider {
    locations: RwLock<Vec<LocationInfo>>,
    current: RwLock<HashMap<String, Reading>>,
    series: RwLock<HashMap<(String, i32), Vec<Reading>>>,
    offline: AtomicBool,
    current_fetches: AtomicU32,
    series_fetches: AtomicU32,
}

impl MockProvider {
    /// Create an empty mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a location.
    pub async fn add_location(&self, info: LocationInfo) {
        self.locations.write().await.push(info);
    }

    /// Set the current reading served for a location.
    pub async fn set_current(&self, name: &str, reading: Reading) {
        self.current.write().await.insert(name.to_string(), reading);
    }

    /// Set the series served for a location and year.
    pub async fn set_year_series(&self, name: &str, year: i32, series: Vec<Reading>) {
        self.series
            .write()
            .await
            .insert((name.to_string(), year), series);
    }

    /// Take the provider offline (or back online).
    ///
    /// While offline, every operation fails with a 503 error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Number of current-reading fetches performed.
    pub fn current_fetch_count(&self) -> u32 {
        self.current_fetches.load(Ordering::Relaxed)
    }

    /// Number of year-series fetches performed.
    pub fn series_fetch_count(&self) -> u32 {
        self.series_fetches.load(Ordering::Relaxed)
    }

    /// Reset fetch counters.
    pub fn reset_fetch_counts(&self) {
        self.current_fetches.store(0, Ordering::Relaxed);
        self.series_fetches.store(0, Ordering::Relaxed);
    }

    fn check_offline(&self) -> Result<()> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(Error::Api {
                status: 503,
                message: "provider offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn location_names(&self) -> Result<Vec<String>> {
        self.check_offline()?;
        Ok(self
            .locations
            .read()
            .await
            .iter()
            .map(|l| l.name.clone())
            .collect())
    }

    async fn location_detail(&self, name: &str) -> Result<Option<LocationInfo>> {
        self.check_offline()?;
        Ok(self
            .locations
            .read()
            .await
            .iter()
            .find(|l| l.name == name)
            .cloned())
    }

    async fn current_reading(&self, name: &str) -> Result<Reading> {
        self.check_offline()?;
        self.current_fetches.fetch_add(1, Ordering::Relaxed);

        self.current
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Api {
                status: 404,
                message: format!("no current weather for {}", name),
            })
    }

    async fn year_series(&self, name: &str, year: i32) -> Result<Vec<Reading>> {
        self.check_offline()?;
        self.series_fetches.fetch_add(1, Ordering::Relaxed);

        Ok(self
            .series
            .read()
            .await
            .get(&(name.to_string(), year))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn reading(temperature: f64) -> Reading {
        Reading {
            recorded_at: datetime!(2024-01-15 09:00:00 UTC),
            summary: "Clear".to_string(),
            description: "clear sky".to_string(),
            temperature,
            pressure: 1018.0,
            humidity: 60.0,
            wind_speed: 2.0,
            wind_direction: 180.0,
        }
    }

    #[tokio::test]
    async fn test_mock_locations() {
        let provider = MockProvider::new();
        provider
            .add_location(LocationInfo::new("Davos", 7260, "CH"))
            .await;
        provider
            .add_location(LocationInfo::new("Zermatt", 7500, "CH"))
            .await;

        let names = provider.location_names().await.unwrap();
        assert_eq!(names, vec!["Davos".to_string(), "Zermatt".to_string()]);

        let detail = provider.location_detail("Davos").await.unwrap().unwrap();
        assert_eq!(detail.site_code, 7260);

        assert!(provider.location_detail("Atlantis").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mock_current_reading() {
        let provider = MockProvider::new();
        provider.set_current("Davos", reading(-3.2)).await;

        let current = provider.current_reading("Davos").await.unwrap();
        assert_eq!(current.temperature, -3.2);
        assert_eq!(provider.current_fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_current_reading_unknown_location() {
        let provider = MockProvider::new();

        let result = provider.current_reading("Atlantis").await;
        assert!(matches!(result, Err(Error::Api { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_mock_year_series() {
        let provider = MockProvider::new();
        provider
            .set_year_series("Davos", 2024, vec![reading(-3.2), reading(-1.0)])
            .await;

        let series = provider.year_series("Davos", 2024).await.unwrap();
        assert_eq!(series.len(), 2);

        // Years without fixtures serve an empty series
        let empty = provider.year_series("Davos", 2023).await.unwrap();
        assert!(empty.is_empty());

        assert_eq!(provider.series_fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_offline() {
        let provider = MockProvider::new();
        provider.set_current("Davos", reading(-3.2)).await;
        provider.set_offline(true);

        let result = provider.current_reading("Davos").await;
        assert!(matches!(result, Err(Error::Api { status: 503, .. })));

        // Offline failures do not count as fetches
        assert_eq!(provider.current_fetch_count(), 0);

        provider.set_offline(false);
        assert!(provider.current_reading("Davos").await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_reset_fetch_counts() {
        let provider = MockProvider::new();
        provider.set_current("Davos", reading(-3.2)).await;

        provider.current_reading("Davos").await.unwrap();
        provider.current_reading("Davos").await.unwrap();
        assert_eq!(provider.current_fetch_count(), 2);

        provider.reset_fetch_counts();
        assert_eq!(provider.current_fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_trait_object() {
        let provider = MockProvider::new();
        provider
            .add_location(LocationInfo::new("Davos", 7260, "CH"))
            .await;

        let trait_provider: &dyn WeatherProvider = &provider;
        let names = trait_provider.location_names().await.unwrap();
        assert_eq!(names.len(), 1);
    }
}

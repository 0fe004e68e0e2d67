//! HTTP client for a weather data provider's REST API.
//!
//! This module implements [`WeatherProvider`] against a provider exposing
//! its locations and readings over JSON endpoints. Location-scoped requests
//! pass the location name as a query parameter so names containing spaces
//! survive URL encoding.
//!
//! # Example
//!
//! ```no_run
//! use stratus_provider::{HttpProvider, WeatherProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = HttpProvider::new("http://localhost:9090")?;
//!
//! let names = provider.location_names().await?;
//! for name in names {
//!     let reading = provider.current_reading(&name).await?;
//!     println!("{}: {:.1} °C", name, reading.temperature);
//! }
//! Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use stratus_types::{LocationInfo, Reading};

use crate::error::{Error, Result};
use crate::traits::WeatherProvider;

/// HTTP client for a weather data provider.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    base_url: String,
}

// ==========================================================================
// Wire Types
// ==========================================================================

/// Location record as published by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocationDto {
    name: String,
    site_code: u32,
    country: String,
}

impl LocationDto {
    fn into_info(self) -> LocationInfo {
        LocationInfo {
            name: self.name,
            site_code: self.site_code,
            country: self.country,
        }
    }
}

/// Weather reading as published by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReadingDto {
    #[serde(with = "time::serde::rfc3339")]
    recorded_at: OffsetDateTime,
    summary: String,
    description: String,
    temperature: f64,
    pressure: f64,
    humidity: f64,
    wind_speed: f64,
    wind_direction: f64,
}

impl ReadingDto {
    fn into_reading(self) -> Reading {
        Reading {
            recorded_at: self.recorded_at,
            summary: self.summary,
            description: self.description,
            temperature: self.temperature,
            pressure: self.pressure,
            humidity: self.humidity,
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction,
        }
    }
}

// ==========================================================================
// HttpProvider Implementation
// ==========================================================================

impl HttpProvider {
    /// Create a new provider client with the default 10 second timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the provider (e.g., "http://localhost:9090")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    /// Create a new provider client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        // Normalize URL (remove trailing slash)
        let base_url = base_url.trim_end_matches('/').to_string();

        // Validate URL format
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Request)?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List all locations the provider publishes.
    pub async fn locations(&self) -> Result<Vec<LocationInfo>> {
        let url = format!("{}/api/locations", self.base_url);
        let dtos: Vec<LocationDto> = self.get(&url).await?;
        Ok(dtos.into_iter().map(LocationDto::into_info).collect())
    }

    /// Fetch detail for one location, `None` if the provider does not know it.
    pub async fn detail(&self, name: &str) -> Result<Option<LocationInfo>> {
        let url = format!("{}/api/locations/detail", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| Error::Unreachable {
                url: url.clone(),
                source: e,
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let dto: LocationDto = self.handle_response(response).await?;
        Ok(Some(dto.into_info()))
    }

    /// Fetch the current reading for a location.
    pub async fn current(&self, name: &str) -> Result<Reading> {
        let url = format!("{}/api/weather/current", self.base_url);
        let dto: ReadingDto = self.get_query(&url, &[("location", name)]).await?;
        Ok(dto.into_reading())
    }

    /// Fetch the provider's series for a location and calendar year.
    pub async fn year(&self, name: &str, year: i32) -> Result<Vec<Reading>> {
        let url = format!("{}/api/weather/year", self.base_url);
        let year = year.to_string();
        let dtos: Vec<ReadingDto> = self
            .get_query(&url, &[("location", name), ("year", year.as_str())])
            .await?;
        Ok(dtos.into_iter().map(ReadingDto::into_reading).collect())
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Unreachable {
                url: url.to_string(),
                source: e,
            })?;

        self.handle_response(response).await
    }

    async fn get_query<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Unreachable {
                url: url.to_string(),
                source: e,
            })?;

        self.handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(Error::Request)
        } else {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| status.to_string());

            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl WeatherProvider for HttpProvider {
    async fn location_names(&self) -> Result<Vec<String>> {
        let locations = self.locations().await?;
        Ok(locations.into_iter().map(|l| l.name).collect())
    }

    async fn location_detail(&self, name: &str) -> Result<Option<LocationInfo>> {
        self.detail(name).await
    }

    async fn current_reading(&self, name: &str) -> Result<Reading> {
        self.current(name).await
    }

    async fn year_series(&self, name: &str, year: i32) -> Result<Vec<Reading>> {
        self.year(name, year).await
    }
}

//! Remote weather data provider access.
//!
//! This crate defines the [`WeatherProvider`] trait plus two
//! implementations: [`HttpProvider`] for a real provider speaking JSON over
//! HTTP, and [`MockProvider`] for tests. A provider publishes named
//! locations, a current reading per location, and per-year series of past
//! readings.
//!
//! # Example
//!
//! ```no_run
//! use stratus_provider::{HttpProvider, WeatherProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = HttpProvider::new("http://localhost:9090")?;
//!
//! if let Some(info) = provider.location_detail("Davos").await? {
//!     let reading = provider.current_reading(&info.name).await?;
//!     println!("{}: {:.1} °C", info.name, reading.temperature);
//! }
//! Ok(())
//! # }
//! ```

mod error;
mod http;
mod mock;
mod traits;

pub use error::{Error, Result};
pub use http::HttpProvider;
pub use mock::MockProvider;
pub use traits::WeatherProvider;

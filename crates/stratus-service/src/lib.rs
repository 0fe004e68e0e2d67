//! Background poller and HTTP REST API for stratus weather data.
//!
//! This crate provides a service that:
//! - Exposes the freshness reconciler and window queries over REST
//! - Optionally reconciles every stored location on a schedule
//! - Keeps all state in the local database
//!
//! # REST API Endpoints
//!
//! - `GET /api/health` - Service health check
//! - `GET /api/locations` - List stored locations
//! - `POST /api/locations/register` - Register provider locations not yet stored
//! - `POST /api/bootstrap` - Register locations and backfill a year of readings
//! - `GET /api/locations/{name}/current` - Current reading, refreshing the store first
//! - `POST /api/locations/{name}/sync` - Merge a year's series into the store
//! - `GET /api/locations/{name}/readings` - Window queries (year, month, week, span)
//! - `GET /api/readings` - Cross-location queries (year, recency in days)
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/stratus/server.toml`:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [storage]
//! path = "~/.local/share/stratus/data.db"
//!
//! [provider]
//! base_url = "http://localhost:9090"
//! timeout_secs = 10
//!
//! [sync]
//! staleness_minutes = 40
//! poll_interval_secs = 900
//! ```

pub mod api;
pub mod config;
pub mod poller;
pub mod state;

pub use config::{Config, ConfigError, ProviderConfig, ServerConfig, StorageConfig, SyncConfig};
pub use poller::Poller;
pub use state::{AppState, PollerState};

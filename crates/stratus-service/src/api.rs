//! REST API endpoints for the stratus-service.
//!
//! This module provides HTTP endpoints for the location registry, freshness
//! reconciliation, and temporal window queries.
//!
//! # Concurrency and Lock Acquisition
//!
//! All async handlers that access shared state acquire locks in a consistent order:
//!
//! - **`state.config`** (RwLock): Read lock where handlers need settings.
//! - **`state.store`** (Mutex): Acquired for database operations. Reconciling
//!   handlers hold it across their provider fetches so that concurrent
//!   requests for the same location cannot race each other's writes.
//!
//! ## Error Handling
//!
//! All endpoints return structured JSON errors via [`AppError`]. Store errors
//! return HTTP 500, upstream provider failures return 502, and client errors
//! (not found, bad selectors) return appropriate 4xx status codes. Window
//! queries with out-of-range arguments are not errors; they return `200` with
//! an empty array.
//!
//! # Example
//!
//! ```ignore
//! use axum::Router;
//! use stratus_service::api;
//!
//! let app = api::router().with_state(state);
//! ```

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use stratus_core::{BootstrapReport, MergeReport, Reconciler, Refresh, RegisterReport, WindowQueries};
use stratus_store::{StoredLocation, StoredReading};

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        // Health
        .route("/api/health", get(health))
        // Location registry
        .route("/api/locations", get(list_locations))
        .route("/api/locations/register", post(register_locations))
        .route("/api/bootstrap", post(bootstrap))
        // Per-location data
        .route("/api/locations/{name}/current", get(get_current))
        .route("/api/locations/{name}/sync", post(sync_location))
        .route("/api/locations/{name}/readings", get(get_readings))
        // Cross-location data
        .route("/api/readings", get(all_readings))
}

// ==========================================================================
// Health
// ==========================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Whether the background poller is running.
    pub poller_running: bool,
    /// When the poller was started, if it ever was.
    #[serde(with = "time::serde::rfc3339::option")]
    pub poller_started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        poller_running: state.poller.is_running(),
        poller_started_at: state.poller.started_at(),
        timestamp: OffsetDateTime::now_utc(),
    })
}

// ==========================================================================
// Location Registry
// ==========================================================================

/// List all stored locations.
///
/// # Lock Acquisition
///
/// Acquires the store mutex for the duration of the database query.
///
/// # Errors
///
/// Returns [`AppError::Store`] if the database query fails.
async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoredLocation>>, AppError> {
    let store = state.store.lock().await;
    let locations = store.all_locations()?;
    Ok(Json(locations))
}

/// Register every provider location not yet stored.
async fn register_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RegisterReport>, AppError> {
    let store = state.store.lock().await;
    let reconciler = Reconciler::new(&store, state.provider.as_ref(), state.policy);
    let report = reconciler.register_locations().await?;
    Ok(Json(report))
}

/// Register all provider locations and backfill a year of readings for each.
///
/// The year defaults to the current calendar year.
async fn bootstrap(
    State(state): State<Arc<AppState>>,
    Query(params): Query<YearParam>,
) -> Result<Json<BootstrapReport>, AppError> {
    let year = params
        .year
        .unwrap_or_else(|| OffsetDateTime::now_utc().year());
    let store = state.store.lock().await;
    let reconciler = Reconciler::new(&store, state.provider.as_ref(), state.policy);
    let report = reconciler.bootstrap(year).await?;
    Ok(Json(report))
}

// ==========================================================================
// Reconciliation
// ==========================================================================

/// Optional `?year=` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct YearParam {
    pub year: Option<i32>,
}

/// Response for the current-reading endpoint.
#[derive(Debug, Serialize)]
pub struct CurrentResponse {
    /// How the request was satisfied: `first`, `current`, `appended`, or
    /// `backfilled`.
    pub outcome: &'static str,
    /// Series entries merged, present only when the outcome is `backfilled`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged: Option<usize>,
    /// The freshest stored reading after reconciliation.
    pub reading: StoredReading,
}

/// Get the current reading for a location, refreshing the store first.
///
/// Reading this endpoint has a write side effect: stale or missing data is
/// fetched from the provider and stored before the response is built.
///
/// # Errors
///
/// Returns 404 when neither the store nor the provider knows the location,
/// 502 when the provider fails, and 500 on store errors.
async fn get_current(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<CurrentResponse>, AppError> {
    let store = state.store.lock().await;
    let reconciler = Reconciler::new(&store, state.provider.as_ref(), state.policy);
    let refresh = reconciler.ensure_current(&name).await?;

    let (outcome, merged, reading) = match refresh {
        Refresh::UnknownLocation => {
            return Err(AppError::NotFound(format!("Location not found: {}", name)));
        }
        Refresh::First(reading) => ("first", None, reading),
        Refresh::Current(reading) => ("current", None, reading),
        Refresh::Appended(reading) => ("appended", None, reading),
        Refresh::Backfilled { merged, reading } => ("backfilled", Some(merged), reading),
    };

    Ok(Json(CurrentResponse {
        outcome,
        merged,
        reading,
    }))
}

/// Merge the provider's series for a location and year into the store.
///
/// The year defaults to the current calendar year.
async fn sync_location(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<YearParam>,
) -> Result<Json<MergeReport>, AppError> {
    let year = params
        .year
        .unwrap_or_else(|| OffsetDateTime::now_utc().year());
    let store = state.store.lock().await;
    let reconciler = Reconciler::new(&store, state.provider.as_ref(), state.policy);
    let report = reconciler.ensure_year_coverage(&name, year).await?;
    Ok(Json(report))
}

// ==========================================================================
// Readings Queries
// ==========================================================================

/// Window selector parameters for per-location readings.
#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub week: Option<u8>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// A resolved window selector.
enum Window {
    Year(i32),
    Month(u8),
    Week(u8),
    Span(OffsetDateTime, OffsetDateTime),
}

impl WindowParams {
    /// Resolve the parameters into a single window selector.
    ///
    /// Exactly one of `year`, `month`, `week`, or the `from`/`to` pair must
    /// be present; `from` and `to` only count together.
    fn window(&self) -> Result<Window, AppError> {
        let mut selectors = 0;
        if self.year.is_some() {
            selectors += 1;
        }
        if self.month.is_some() {
            selectors += 1;
        }
        if self.week.is_some() {
            selectors += 1;
        }
        if self.from.is_some() || self.to.is_some() {
            selectors += 1;
        }
        if selectors != 1 {
            return Err(AppError::BadRequest(
                "Supply exactly one of: year, month, week, or from/to".to_string(),
            ));
        }

        if let Some(year) = self.year {
            return Ok(Window::Year(year));
        }
        if let Some(month) = self.month {
            return Ok(Window::Month(month));
        }
        if let Some(week) = self.week {
            return Ok(Window::Week(week));
        }
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => Ok(Window::Span(parse_rfc3339(from)?, parse_rfc3339(to)?)),
            _ => Err(AppError::BadRequest(
                "from and to must be supplied together".to_string(),
            )),
        }
    }
}

fn parse_rfc3339(value: &str) -> Result<OffsetDateTime, AppError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|_| AppError::BadRequest(format!("Invalid RFC 3339 timestamp: {}", value)))
}

/// Query readings for one location through a temporal window.
///
/// Out-of-range windows (month 13, week 54, an inverted span) are not
/// errors; they return an empty array.
async fn get_readings(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<WindowParams>,
) -> Result<Json<Vec<StoredReading>>, AppError> {
    let window = params.window()?;

    let store = state.store.lock().await;
    let queries = WindowQueries::new(&store);
    let readings = match window {
        Window::Year(year) => queries.by_year(&name, year)?,
        Window::Month(month) => queries.by_month(&name, month)?,
        Window::Week(week) => queries.by_week(&name, week)?,
        Window::Span(from, to) => queries.by_time_span(&name, from, to)?,
    };
    Ok(Json(readings))
}

/// Cross-location selector parameters.
#[derive(Debug, Default, Deserialize)]
pub struct GlobalParams {
    pub year: Option<i32>,
    pub days: Option<u16>,
}

/// Query readings across all locations by year or by recency in days.
async fn all_readings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GlobalParams>,
) -> Result<Json<Vec<StoredReading>>, AppError> {
    let store = state.store.lock().await;
    let queries = WindowQueries::new(&store);
    let readings = match (params.year, params.days) {
        (Some(year), None) => queries.by_year_all(year)?,
        (None, Some(days)) => queries.by_day_difference(days)?,
        _ => {
            return Err(AppError::BadRequest(
                "Supply exactly one of: year or days".to_string(),
            ));
        }
    };
    Ok(Json(readings))
}

// ==========================================================================
// Errors
// ==========================================================================

/// API error responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Provider(stratus_provider::Error),
    Store(stratus_store::Error),
}

impl From<stratus_store::Error> for AppError {
    fn from(e: stratus_store::Error) -> Self {
        AppError::Store(e)
    }
}

impl From<stratus_core::Error> for AppError {
    fn from(e: stratus_core::Error) -> Self {
        match e {
            stratus_core::Error::Provider(e) => AppError::Provider(e),
            stratus_core::Error::Store(e) => AppError::Store(e),
            stratus_core::Error::UnknownLocation(name) => {
                AppError::NotFound(format!("Location not found: {}", name))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Provider(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}

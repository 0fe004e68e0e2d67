//! Local data persistence for weather observations.
//!
//! This crate provides SQLite-based storage for weather readings keyed by
//! location and observation timestamp, enabling offline access, freshness
//! checks, and efficient time-range queries.
//!
//! # Features
//!
//! - Register locations and store readings with timestamps
//! - Deduplicate series on `(location, recorded_at)` at the database layer
//! - Query by location and time span, with pagination
//! - Diff incoming series against stored timestamps
//! - CSV and JSON export
//!
//! # Example
//!
//! ```no_run
//! use stratus_store::{Store, ReadingQuery};
//!
//! let store = Store::open_default()?;
//!
//! // Query recent readings
//! let query = ReadingQuery::new()
//!     .location(1)
//!     .newest_first()
//!     .limit(10);
//! let readings = store.query_readings(&query)?;
//! # Ok::<(), stratus_store::Error>(())
//! ```

mod error;
mod models;
mod queries;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::{StoredLocation, StoredReading};
pub use queries::ReadingQuery;
pub use store::{SeriesStats, Store};

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/stratus/data.db`
/// - macOS: `~/Library/Application Support/stratus/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\stratus\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("stratus")
        .join("data.db")
}

//! Weather data reconciliation engine.
//!
//! `stratus-core` sits between a remote [`WeatherProvider`] and the local
//! [`Store`] and keeps the two in agreement:
//!
//! - [`Reconciler`] decides, per location, whether the store is current,
//!   lags by a single observation, or has fallen far enough behind that
//!   the whole year series must be merged back in.
//! - [`WindowQueries`] answers calendar-window questions (year, month,
//!   week, recent days, arbitrary span) from whatever the store holds.
//!
//! The crate owns no connections and never schedules work on its own;
//! callers inject both handles and decide when reconciliation runs.
//!
//! # Quick Start
//!
//! ```no_run
//! use stratus_core::{Reconciler, Refresh, StalenessPolicy, WindowQueries};
//! use stratus_provider::HttpProvider;
//! use stratus_store::Store;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Store::open_in_memory()?;
//! let provider = HttpProvider::new("http://localhost:8080")?;
//! let reconciler = Reconciler::new(&store, &provider, StalenessPolicy::default());
//!
//! match reconciler.ensure_current("Davos").await? {
//!     Refresh::Current(reading) => println!("still fresh: {}", reading.recorded_at),
//!     outcome => println!("refreshed: {:?}", outcome),
//! }
//!
//! let queries = WindowQueries::new(&store);
//! let january = queries.by_month("Davos", 1)?;
//! println!("{} readings in January", january.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod policy;
pub mod query;
pub mod reconcile;

pub use error::{Error, Result};
pub use policy::{DEFAULT_STALENESS_MINUTES, StalenessPolicy};
pub use query::WindowQueries;
pub use reconcile::{BootstrapReport, MergeReport, Reconciler, Refresh, RegisterReport};

// Re-export the handle types callers wire together.
pub use stratus_provider::WeatherProvider;
pub use stratus_store::Store;

//! Shared domain types for the stratus weather cache.
//!
//! This crate provides the types passed between the remote provider, the
//! record store, and the reconciliation core.
//!
//! # Features
//!
//! - [`LocationInfo`]: a named provider site
//! - [`Reading`]: a single timestamped weather observation, with builder
//! - [`ValidationError`]: range validation for constructed readings
//!
//! # Example
//!
//! ```
//! use stratus_types::{LocationInfo, Reading};
//! use time::macros::datetime;
//!
//! let location = LocationInfo::new("Davos", 7270, "CH");
//! let reading = Reading::builder()
//!     .recorded_at(datetime!(2024-01-15 08:00:00 UTC))
//!     .summary("Snow")
//!     .temperature(-7.0)
//!     .humidity(92.0)
//!     .try_build()
//!     .unwrap();
//!
//! assert_eq!(location.name, "Davos");
//! assert_eq!(reading.summary, "Snow");
//! ```

pub mod error;
pub mod types;

pub use error::{ValidationError, ValidationResult};
pub use types::{LocationInfo, Reading, ReadingBuilder};

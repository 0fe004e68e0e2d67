//! Error types for constructing and validating weather data.

use thiserror::Error;

/// Errors that can occur when validating weather readings or locations.
///
/// This error type is transport-agnostic and does not include provider or
/// storage errors (those belong in stratus-provider and stratus-store).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A field value is outside its valid range.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result type alias using stratus-types' ValidationError type.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

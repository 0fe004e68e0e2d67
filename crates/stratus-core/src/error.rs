//! Error types for reconciliation and query operations.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the reconciler and the query engine.
///
/// The two transport variants call for different reactions: a
/// [`Error::Provider`] failure is transient and worth retrying, and
/// guarantees no local state was changed; a [`Error::Store`] failure is
/// fatal to the operation. A location that is merely unknown is not an
/// error here: lookups answer with `Option` or an empty series instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The remote provider could not be reached or rejected the request.
    #[error("Provider error: {0}")]
    Provider(#[from] stratus_provider::Error),

    /// The local store failed.
    #[error("Store error: {0}")]
    Store(#[from] stratus_store::Error),

    /// An operation that requires a registered location was given a name
    /// the store has never seen.
    #[error("Unknown location: {0}")]
    UnknownLocation(String),
}

impl Error {
    /// Whether retrying the same operation can succeed without any other
    /// intervention.
    ///
    /// Only provider failures qualify; they leave the store untouched.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Provider(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_errors_are_retryable() {
        let err = Error::from(stratus_provider::Error::Api {
            status: 503,
            message: "overloaded".to_string(),
        });
        assert!(err.is_retryable());
    }

    #[test]
    fn test_unknown_location_is_not_retryable() {
        let err = Error::UnknownLocation("Atlantis".to_string());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Unknown location: Atlantis");
    }
}

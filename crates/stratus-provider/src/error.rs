//! Error types for provider operations.

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to a weather data provider.
///
/// Every variant means the provider could not deliver usable data right
/// now; callers may retry later. No variant implies local state changed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The provider endpoint is not reachable.
    #[error("Provider not reachable at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP request failed or the response body could not be decoded.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The provider returned an error response.
    #[error("Provider error ({status}): {message}")]
    Api { status: u16, message: String },
}

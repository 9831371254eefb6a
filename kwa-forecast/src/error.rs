/// Error types for the forecast and geocoding collaborators
use thiserror::Error;

/// Main error type for forecast operations
#[derive(Error, Debug)]
pub enum ForecastError {
    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("Request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    BadStatus { url: String, status: u16 },

    /// Failed to parse HTTP response
    #[error("Failed to parse response: {0}")]
    ResponseParse(#[from] serde_json::Error),

    /// A required series is absent from the forecast
    #[error("Forecast is missing required series: {0}")]
    MissingSeries(&'static str),

    /// A series does not line up with its time axis
    #[error("Forecast series {series} has {found} values, expected {expected}")]
    SeriesLength {
        series: &'static str,
        expected: usize,
        found: usize,
    },

    /// Geocoding found nothing
    #[error("No matches found for {0}. Try a nearby town or a simpler name.")]
    NoMatches(String),
}

/// Type alias for Results using ForecastError
pub type Result<T> = std::result::Result<T, ForecastError>;

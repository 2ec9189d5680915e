//! Errors surfaced by searches, forecast fetches and location lookups.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeteoError {
    #[error("Search failed: {status}")]
    SearchFailed { status: u16 },

    #[error("Weather failed: {status}")]
    WeatherFetchFailed { status: u16 },

    #[error("Geolocation is not supported")]
    GeolocationUnavailable,

    #[error("{0}")]
    GeolocationDenied(String),

    #[error("Timed out after {secs}s while acquiring location")]
    GeolocationTimeout { secs: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for MeteoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for MeteoError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

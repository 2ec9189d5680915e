use crate::{
    Config,
    error::MeteoError,
    location::{ConfiguredLocation, LocationSource},
    model::{GeoResult, WeatherSnapshot},
    provider::{forecast::OpenMeteoForecast, geocoding::OpenMeteoGeocoder},
};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod forecast;
pub mod geocoding;
mod lenient;

const USER_AGENT: &str = concat!("meteo/", env!("CARGO_PKG_VERSION"));

/// Resolves free text to candidate places.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// At most five candidates; a blank query yields none without any request.
    async fn search(&self, query: &str) -> Result<Vec<GeoResult>, MeteoError>;
}

/// Fetches current conditions and the daily forecast for a coordinate pair.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch_weather(&self, latitude: f64, longitude: f64)
    -> Result<WeatherSnapshot, MeteoError>;
}

/// The collaborators the application controller drives.
#[derive(Debug, Clone)]
pub struct Services {
    pub geocoder: Arc<dyn Geocoder>,
    pub forecast: Arc<dyn ForecastSource>,
    pub location: Arc<dyn LocationSource>,
}

/// Build the shared HTTP client used by both Open-Meteo endpoints.
pub fn http_client(timeout: Duration) -> Result<Client, MeteoError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(MeteoError::from)
}

/// Construct the Open-Meteo clients and the configured location source.
pub fn services_from_config(config: &Config) -> Result<Services, MeteoError> {
    let http = http_client(config.request_timeout())?;

    Ok(Services {
        geocoder: Arc::new(OpenMeteoGeocoder::new(config.geocoding_url.clone(), http.clone())),
        forecast: Arc::new(OpenMeteoForecast::new(config.forecast_url.clone(), http)),
        location: Arc::new(ConfiguredLocation::from_config(config)),
    })
}

/// Shorten an error body for logging.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

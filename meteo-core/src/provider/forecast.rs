use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::MeteoError,
    model::{CurrentWeather, DailyForecast, WeatherSnapshot, round1},
    provider::{lenient, truncate_body},
};

use super::ForecastSource;

/// Today plus the next four days.
pub const FORECAST_DAYS: usize = 5;

pub const CURRENT_FIELDS: [&str; 4] =
    ["temperature_2m", "weather_code", "wind_speed_10m", "uv_index"];

pub const DAILY_FIELDS: [&str; 8] = [
    "temperature_2m_max",
    "temperature_2m_min",
    "weather_code",
    "sunrise",
    "sunset",
    "precipitation_probability_max",
    "wind_speed_10m_max",
    "uv_index_max",
];

/// Client for the Open-Meteo forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    base_url: String,
    http: Client,
}

impl OpenMeteoForecast {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self { base_url: base_url.into(), http }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ForecastResponse {
    #[serde(deserialize_with = "lenient::opt_string")]
    timezone: Option<String>,
    #[serde(deserialize_with = "lenient::opt_record")]
    current: Option<RawCurrent>,
    #[serde(deserialize_with = "lenient::opt_record")]
    daily: Option<RawDaily>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCurrent {
    #[serde(deserialize_with = "lenient::opt_f64")]
    temperature_2m: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_code")]
    weather_code: Option<i32>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    wind_speed_10m: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    uv_index: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_string")]
    time: Option<String>,
}

/// Parallel arrays, all indexed against `time`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDaily {
    #[serde(deserialize_with = "lenient::string_column")]
    time: Option<Vec<Option<String>>>,
    #[serde(deserialize_with = "lenient::f64_column")]
    temperature_2m_min: Option<Vec<Option<f64>>>,
    #[serde(deserialize_with = "lenient::f64_column")]
    temperature_2m_max: Option<Vec<Option<f64>>>,
    #[serde(deserialize_with = "lenient::code_column")]
    weather_code: Option<Vec<Option<i32>>>,
    #[serde(deserialize_with = "lenient::string_column")]
    sunrise: Option<Vec<Option<String>>>,
    #[serde(deserialize_with = "lenient::string_column")]
    sunset: Option<Vec<Option<String>>>,
    #[serde(deserialize_with = "lenient::f64_column")]
    precipitation_probability_max: Option<Vec<Option<f64>>>,
    #[serde(deserialize_with = "lenient::f64_column")]
    wind_speed_10m_max: Option<Vec<Option<f64>>>,
    #[serde(deserialize_with = "lenient::f64_column")]
    uv_index_max: Option<Vec<Option<f64>>>,
}

fn column<T: Clone>(values: &Option<Vec<Option<T>>>, idx: usize) -> Option<T> {
    values.as_ref()?.get(idx)?.clone()
}

impl RawDaily {
    fn into_days(self) -> Vec<DailyForecast> {
        let dates = self.time.clone().unwrap_or_default();

        dates
            .into_iter()
            .take(FORECAST_DAYS)
            .enumerate()
            .map(|(idx, date)| DailyForecast {
                date: date.unwrap_or_default(),
                t_min_c: round1(column(&self.temperature_2m_min, idx).unwrap_or_default()),
                t_max_c: round1(column(&self.temperature_2m_max, idx).unwrap_or_default()),
                weather_code: column(&self.weather_code, idx).unwrap_or_default(),
                sunrise: column(&self.sunrise, idx),
                sunset: column(&self.sunset, idx),
                precipitation_probability: column(&self.precipitation_probability_max, idx)
                    .map(|p| p.round().clamp(0.0, 100.0) as u8),
                wind_speed_max_kmh: column(&self.wind_speed_10m_max, idx),
                uv_index_max: column(&self.uv_index_max, idx),
            })
            .collect()
    }
}

impl ForecastResponse {
    fn into_snapshot(self) -> WeatherSnapshot {
        let raw = self.current.unwrap_or_default();

        let current = CurrentWeather {
            temperature_c: round1(raw.temperature_2m.unwrap_or_default()),
            wind_speed_kmh: round1(raw.wind_speed_10m.unwrap_or_default()),
            weather_code: raw.weather_code.unwrap_or_default(),
            uv_index: raw.uv_index,
            time: raw.time,
            timezone: self.timezone,
        };

        let daily = self.daily.map(RawDaily::into_days).unwrap_or_default();

        WeatherSnapshot { current, daily }
    }
}

fn parse_snapshot(body: &str) -> Result<WeatherSnapshot, MeteoError> {
    let parsed: ForecastResponse = serde_json::from_str(body)?;
    Ok(parsed.into_snapshot())
}

#[async_trait]
impl ForecastSource for OpenMeteoForecast {
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, MeteoError> {
        let latitude = latitude.to_string();
        let longitude = longitude.to_string();
        let current = CURRENT_FIELDS.join(",");
        let daily = DAILY_FIELDS.join(",");

        tracing::debug!(%latitude, %longitude, "fetching forecast");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", current.as_str()),
                ("daily", daily.as_str()),
                ("timezone", "auto"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, body = %truncate_body(&body), "forecast request failed");
            return Err(MeteoError::WeatherFetchFailed { status: status.as_u16() });
        }

        parse_snapshot(&body)
    }
}

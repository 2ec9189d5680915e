use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Id used for the "my current location" pseudo-place.
pub const MY_LOCATION_ID: i64 = -1;

/// A candidate place returned by geocoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub admin1: Option<String>,
}

impl GeoResult {
    /// The pseudo-place synthesized from device coordinates.
    pub fn my_location(latitude: f64, longitude: f64) -> Self {
        Self {
            id: MY_LOCATION_ID,
            name: "My Location".to_string(),
            country: String::new(),
            latitude,
            longitude,
            admin1: None,
        }
    }

    pub fn is_my_location(&self) -> bool {
        self.id == MY_LOCATION_ID
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates { latitude: self.latitude, longitude: self.longitude }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions, temperature and wind already rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub weather_code: i32,
    pub uv_index: Option<f64>,
    /// ISO-8601 local time as reported by the provider, e.g. `2024-01-01T12:00`.
    pub time: Option<String>,
    /// IANA timezone name.
    pub timezone: Option<String>,
}

impl CurrentWeather {
    /// Parses `time`; `None` when absent or malformed.
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        self.time.as_deref().and_then(parse_local_datetime)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// `YYYY-MM-DD`
    pub date: String,
    pub t_min_c: f64,
    pub t_max_c: f64,
    pub weather_code: i32,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub precipitation_probability: Option<u8>,
    pub wind_speed_max_kmh: Option<f64>,
    pub uv_index_max: Option<f64>,
}

impl DailyForecast {
    pub fn date_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn sunrise_time(&self) -> Option<NaiveDateTime> {
        self.sunrise.as_deref().and_then(parse_local_datetime)
    }

    pub fn sunset_time(&self) -> Option<NaiveDateTime> {
        self.sunset.as_deref().and_then(parse_local_datetime)
    }
}

/// Current conditions and the daily forecast from one fetch.
///
/// The two halves always describe the same location; they are only ever
/// replaced together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentWeather,
    pub daily: Vec<DailyForecast>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherMood {
    Good,
    #[default]
    Neutral,
    Bad,
}

impl WeatherMood {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherMood::Good => "good",
            WeatherMood::Neutral => "neutral",
            WeatherMood::Bad => "bad",
        }
    }
}

impl std::fmt::Display for WeatherMood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joins name, region and country with ", ", skipping empty parts.
pub fn format_location_label(place: &GeoResult) -> String {
    [Some(place.name.as_str()), place.admin1.as_deref(), Some(place.country.as_str())]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// WMO weather interpretation codes.
pub fn weather_code_to_text(code: i32) -> String {
    let text = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snowfall",
        73 => "Moderate snowfall",
        75 => "Heavy snowfall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        other => return format!("Code {other}"),
    };
    text.to_string()
}

pub fn evaluate_mood(code: i32) -> WeatherMood {
    match code {
        0..=2 => WeatherMood::Good,
        3 | 45 | 48 => WeatherMood::Neutral,
        51 | 53 | 55 | 56 | 57 | 61 | 63 | 65 | 66 | 67 | 71 | 73 | 75 | 77 | 80 | 81 | 82 | 85
        | 86 | 95 | 96 | 99 => WeatherMood::Bad,
        _ => WeatherMood::Neutral,
    }
}

/// Rounds half-up to one decimal place: `floor(x * 10 + 0.5) / 10`.
pub fn round1(value: f64) -> f64 {
    // adding +0.0 turns -0.0 into 0.0
    (value * 10.0 + 0.5).floor() / 10.0 + 0.0
}

/// Rounds half-up to a whole number.
pub fn round_whole(value: f64) -> f64 {
    (value + 0.5).floor() + 0.0
}

fn parse_local_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

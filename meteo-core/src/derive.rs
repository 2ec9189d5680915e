//! Presentation facts derived from fetched weather: alerts, UV banding and
//! chart coordinates. Everything here is pure and recomputed on read.

use serde::Serialize;

use crate::model::{CurrentWeather, DailyForecast, round1};

const THUNDER_CODES: [i32; 3] = [95, 96, 99];
const SNOW_CODES: [i32; 6] = [71, 73, 75, 77, 85, 86];
const RAIN_CODES: [i32; 13] = [51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 80, 81, 82];
const FOG_CODES: [i32; 2] = [45, 48];
const CLEAR_CODES: [i32; 3] = [0, 1, 2];
const OVERCAST_CODE: i32 = 3;

const COLD_BELOW_C: f64 = 10.0;
const HOT_ABOVE_C: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Success,
    Info,
    Warning,
    Error,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherAlert {
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
}

impl WeatherAlert {
    fn new(severity: AlertSeverity, title: &str, message: impl Into<String>) -> Self {
        Self { severity, title: title.to_string(), message: message.into() }
    }
}

/// Picks the single alert for the current conditions.
///
/// Conditions are checked in a fixed order and the first match wins:
/// thunder, snow, cold, hot, clear, rain, fog, overcast, then a generic update.
pub fn derive_alert(current: Option<&CurrentWeather>) -> Option<WeatherAlert> {
    let current = current?;
    let temp = current.temperature_c;
    let code = current.weather_code;

    let alert = if THUNDER_CODES.contains(&code) {
        WeatherAlert::new(
            AlertSeverity::Warning,
            "⚡ Thunderstorm Alert",
            "Thunderstorms expected. Stay safe indoors if possible.",
        )
    } else if SNOW_CODES.contains(&code) {
        WeatherAlert::new(
            AlertSeverity::Warning,
            "❄️ Snow Warning",
            "Snow or sleet expected. Dress warmly and be careful on roads.",
        )
    } else if temp < COLD_BELOW_C {
        WeatherAlert::new(
            AlertSeverity::Error,
            "🥶 Cold Alert",
            format!("Temperature is below 10°C ({temp}°C). Dress warmly!"),
        )
    } else if temp > HOT_ABOVE_C {
        WeatherAlert::new(
            AlertSeverity::Error,
            "🔥 Heat Alert",
            format!("Temperature is above 30°C ({temp}°C). Stay hydrated!"),
        )
    } else if CLEAR_CODES.contains(&code) {
        WeatherAlert::new(
            AlertSeverity::Success,
            "☀️ Perfect Weather",
            format!("Beautiful {temp}°C. Perfect time to enjoy the outdoors!"),
        )
    } else if RAIN_CODES.contains(&code) {
        WeatherAlert::new(AlertSeverity::Info, "🌧️ Rainy Day", "Rain expected. Bring an umbrella!")
    } else if FOG_CODES.contains(&code) {
        WeatherAlert::new(
            AlertSeverity::Info,
            "🌫️ Fog Warning",
            "Fog present. Drive safely with caution.",
        )
    } else if code == OVERCAST_CODE {
        WeatherAlert::new(AlertSeverity::Info, "☁️ Cloudy", format!("Overcast conditions. {temp}°C."))
    } else {
        WeatherAlert::new(
            AlertSeverity::Info,
            "🌤️ Weather Update",
            format!("Current temperature: {temp}°C."),
        )
    };

    Some(alert)
}

/// Upper end of the UV display scale.
pub const UV_SCALE_MAX: f64 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UvBand {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvBand {
    pub fn from_index(value: f64) -> Self {
        if value < 3.0 {
            Self::Low
        } else if value < 6.0 {
            Self::Moderate
        } else if value < 8.0 {
            Self::High
        } else if value < 11.0 {
            Self::VeryHigh
        } else {
            Self::Extreme
        }
    }

    /// Hex color on a green → violet scale.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#7ED957",
            Self::Moderate => "#FFEA00",
            Self::High => "#FF8C00",
            Self::VeryHigh => "#FF443A",
            Self::Extreme => "#9B30FF",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very high",
            Self::Extreme => "Extreme",
        }
    }
}

pub fn uv_color(value: f64) -> &'static str {
    UvBand::from_index(value).color()
}

/// Marker position on the UV bar, 0–100. Values are clamped to 0–11.
pub fn uv_scale_percent(value: f64) -> f64 {
    if !value.is_finite() {
        return if value == f64::INFINITY { 100.0 } else { 0.0 };
    }
    value.clamp(0.0, UV_SCALE_MAX) / UV_SCALE_MAX * 100.0
}

/// The numeric UV label: negatives floor at zero, the top end is left alone.
pub fn uv_display(value: f64) -> f64 {
    round1(value.max(0.0))
}

/// Logical canvas the forecast chart is laid out on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

pub const CHART_WIDTH: f64 = 320.0;
pub const CHART_HEIGHT: f64 = 140.0;
pub const CHART_PADDING: f64 = 20.0;

impl Default for ChartGeometry {
    fn default() -> Self {
        Self { width: CHART_WIDTH, height: CHART_HEIGHT, padding: CHART_PADDING }
    }
}

impl ChartGeometry {
    fn plot_width(&self) -> f64 {
        (self.width - 2.0 * self.padding).max(0.0)
    }

    fn plot_height(&self) -> f64 {
        (self.height - 2.0 * self.padding).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub x: f64,
    pub y_max: f64,
    pub y_min: f64,
}

/// Forecast days mapped onto a [`ChartGeometry`].
///
/// The temperature axis spans `min(tMin) - 1` at the bottom to `max(tMax) + 1`
/// at the top; y grows downward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureChart {
    pub geometry_width: f64,
    pub geometry_height: f64,
    pub axis_min_c: f64,
    pub axis_max_c: f64,
    pub points: Vec<ChartPoint>,
}

pub fn chart_points(days: &[DailyForecast], geometry: &ChartGeometry) -> TemperatureChart {
    let axis_min_c = days.iter().map(|d| d.t_min_c).fold(f64::INFINITY, f64::min) - 1.0;
    let axis_max_c = days.iter().map(|d| d.t_max_c).fold(f64::NEG_INFINITY, f64::max) + 1.0;

    let span = axis_max_c - axis_min_c;
    // Upstream data with tMin above every tMax could invert the axis.
    let span = if span.is_finite() && span > 0.0 { span } else { 1.0 };

    let plot_w = geometry.plot_width();
    let plot_h = geometry.plot_height();
    let n = days.len();

    let x_at = |idx: usize| {
        if n <= 1 {
            geometry.padding + plot_w / 2.0
        } else {
            geometry.padding + plot_w * idx as f64 / (n - 1) as f64
        }
    };
    let y_at = |temp: f64| geometry.padding + (axis_max_c - temp) / span * plot_h;

    let points = days
        .iter()
        .enumerate()
        .map(|(idx, day)| ChartPoint {
            date: day.date.clone(),
            x: x_at(idx),
            y_max: y_at(day.t_max_c),
            y_min: y_at(day.t_min_c),
        })
        .collect();

    TemperatureChart {
        geometry_width: geometry.width,
        geometry_height: geometry.height,
        axis_min_c: if n == 0 { 0.0 } else { axis_min_c },
        axis_max_c: if n == 0 { 0.0 } else { axis_max_c },
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current(code: i32, temp: f64) -> CurrentWeather {
        CurrentWeather {
            temperature_c: temp,
            wind_speed_kmh: 5.0,
            weather_code: code,
            uv_index: None,
            time: None,
            timezone: None,
        }
    }

    fn day(date: &str, t_min_c: f64, t_max_c: f64) -> DailyForecast {
        DailyForecast {
            date: date.into(),
            t_min_c,
            t_max_c,
            weather_code: 1,
            sunrise: None,
            sunset: None,
            precipitation_probability: None,
            wind_speed_max_kmh: None,
            uv_index_max: None,
        }
    }

    fn title(code: i32, temp: f64) -> String {
        derive_alert(Some(&current(code, temp))).expect("alert").title
    }

    #[test]
    fn no_weather_means_no_alert() {
        assert_eq!(derive_alert(None), None);
    }

    #[test]
    fn thunder_beats_heat() {
        let alert = derive_alert(Some(&current(95, 35.0))).unwrap();
        assert_eq!(alert.title, "⚡ Thunderstorm Alert");
        assert_eq!(alert.severity, AlertSeverity::Warning);
    }

    #[test]
    fn priority_order_is_preserved() {
        assert_eq!(title(73, -5.0), "❄️ Snow Warning");
        assert_eq!(title(0, 4.0), "🥶 Cold Alert");
        assert_eq!(title(61, 5.0), "🥶 Cold Alert");
        assert_eq!(title(1, 31.0), "🔥 Heat Alert");
        assert_eq!(title(2, 20.0), "☀️ Perfect Weather");
        assert_eq!(title(80, 15.0), "🌧️ Rainy Day");
        assert_eq!(title(45, 12.0), "🌫️ Fog Warning");
        assert_eq!(title(3, 18.0), "☁️ Cloudy");
        assert_eq!(title(42, 18.0), "🌤️ Weather Update");
    }

    #[test]
    fn boundaries_are_exclusive() {
        assert_eq!(title(3, 10.0), "☁️ Cloudy");
        assert_eq!(title(3, 30.0), "☁️ Cloudy");
    }

    #[test]
    fn messages_interpolate_temperature() {
        let hot = derive_alert(Some(&current(1, 35.5))).unwrap();
        assert_eq!(hot.message, "Temperature is above 30°C (35.5°C). Stay hydrated!");
        assert_eq!(hot.severity, AlertSeverity::Error);

        let nice = derive_alert(Some(&current(0, 21.0))).unwrap();
        assert_eq!(nice.message, "Beautiful 21°C. Perfect time to enjoy the outdoors!");
        assert_eq!(nice.severity, AlertSeverity::Success);
    }

    #[test]
    fn uv_bands() {
        assert_eq!(uv_color(0.0), "#7ED957");
        assert_eq!(uv_color(2.99), "#7ED957");
        assert_eq!(uv_color(3.0), "#FFEA00");
        assert_eq!(uv_color(6.0), "#FF8C00");
        assert_eq!(uv_color(8.0), "#FF443A");
        assert_eq!(uv_color(11.0), "#9B30FF");
        assert_eq!(UvBand::from_index(14.2), UvBand::Extreme);
    }

    #[test]
    fn uv_scale_clamps_but_label_does_not() {
        assert_eq!(uv_scale_percent(-2.0), 0.0);
        assert_eq!(uv_scale_percent(5.5), 50.0);
        assert_eq!(uv_scale_percent(14.0), 100.0);
        assert_eq!(uv_display(14.04), 14.0);
        assert_eq!(uv_display(-1.0), 0.0);
    }

    #[test]
    fn single_day_is_centered() {
        let chart = chart_points(&[day("2024-01-01", 2.0, 8.0)], &ChartGeometry::default());
        let point = &chart.points[0];

        assert_eq!(point.x, CHART_WIDTH / 2.0);
        assert!(point.y_max.is_finite() && point.y_min.is_finite());
        assert_eq!(chart.axis_min_c, 1.0);
        assert_eq!(chart.axis_max_c, 9.0);
    }

    #[test]
    fn days_are_evenly_spaced_and_scaled() {
        let geometry = ChartGeometry { width: 120.0, height: 60.0, padding: 10.0 };
        let days = [day("a", 0.0, 9.0), day("b", 1.0, 5.0), day("c", 4.0, 6.0)];

        let chart = chart_points(&days, &geometry);
        let xs: Vec<f64> = chart.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![10.0, 60.0, 110.0]);

        // axis -1..10, plot height 40
        assert_eq!(chart.points[0].y_max, 10.0 + 1.0 / 11.0 * 40.0);
        assert_eq!(chart.points[0].y_min, 10.0 + 10.0 / 11.0 * 40.0);
    }

    #[test]
    fn empty_forecast_has_no_points() {
        let chart = chart_points(&[], &ChartGeometry::default());
        assert!(chart.points.is_empty());
        assert_eq!(chart.axis_min_c, 0.0);
    }
}

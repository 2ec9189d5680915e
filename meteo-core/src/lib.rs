//! Core library for the `meteo` weather lookup.
//!
//! This crate defines:
//! - Domain models and label/condition formatters
//! - Open-Meteo geocoding and forecast clients behind provider traits
//! - Derived presentation facts (mood, alerts, UV banding, chart mapping)
//! - The application controller that sequences search → selection → fetch
//!
//! It is used by `meteo-cli`, but any other front end can drive
//! [`AppController`] and render the [`ViewState`] it exposes.

pub mod config;
pub mod controller;
pub mod derive;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;

pub use config::{Config, HomeLocation};
pub use controller::{AppController, SearchState, ViewState, WeatherState};
pub use derive::{AlertSeverity, ChartGeometry, TemperatureChart, UvBand, WeatherAlert};
pub use error::MeteoError;
pub use location::{ConfiguredLocation, LocationSource};
pub use model::{
    Coordinates, CurrentWeather, DailyForecast, GeoResult, WeatherMood, WeatherSnapshot,
    evaluate_mood, format_location_label, weather_code_to_text,
};
pub use provider::{ForecastSource, Geocoder, Services};

//! Application state: search → selection → forecast, plus the selected day.
//!
//! Every request is stamped with a per-kind generation. A response is only
//! adopted if its generation is still the latest for that kind, so a slow
//! answer to an old search or fetch can never overwrite a newer one.

use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};

use crate::{
    Config,
    derive::{ChartGeometry, TemperatureChart, WeatherAlert, chart_points, derive_alert},
    error::MeteoError,
    location::acquire_position,
    model::{
        CurrentWeather, DailyForecast, GeoResult, WeatherMood, WeatherSnapshot, evaluate_mood,
        format_location_label,
    },
    provider::{Services, services_from_config},
};

pub const DEFAULT_SUBTITLE: &str = "Search for a city or use your current location";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Searching,
    Results(Vec<GeoResult>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WeatherState {
    #[default]
    Empty,
    Loading,
    Loaded(WeatherSnapshot),
    Failed(String),
}

#[derive(Debug, Default)]
struct AppState {
    query: String,
    search: SearchState,
    selected: Option<GeoResult>,
    weather: WeatherState,
    selected_day: Option<DailyForecast>,
    search_generation: u64,
    weather_generation: u64,
}

/// An owned copy of everything a view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub query: String,
    pub search: SearchState,
    pub selected: Option<GeoResult>,
    pub weather: WeatherState,
    pub selected_day: Option<DailyForecast>,
}

impl ViewState {
    pub fn is_searching(&self) -> bool {
        matches!(self.search, SearchState::Searching)
    }

    pub fn search_results(&self) -> &[GeoResult] {
        match &self.search {
            SearchState::Results(list) => list.as_slice(),
            _ => &[],
        }
    }

    pub fn search_error(&self) -> Option<&str> {
        match &self.search {
            SearchState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn is_loading_weather(&self) -> bool {
        matches!(self.weather, WeatherState::Loading)
    }

    pub fn weather_error(&self) -> Option<&str> {
        match &self.weather {
            WeatherState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&CurrentWeather> {
        match &self.weather {
            WeatherState::Loaded(snapshot) => Some(&snapshot.current),
            _ => None,
        }
    }

    pub fn forecast(&self) -> &[DailyForecast] {
        match &self.weather {
            WeatherState::Loaded(snapshot) => snapshot.daily.as_slice(),
            _ => &[],
        }
    }

    /// Neutral unless weather is loaded.
    pub fn mood(&self) -> WeatherMood {
        self.current().map(|c| evaluate_mood(c.weather_code)).unwrap_or_default()
    }

    pub fn alert(&self) -> Option<WeatherAlert> {
        derive_alert(self.current())
    }

    pub fn chart(&self, geometry: &ChartGeometry) -> TemperatureChart {
        chart_points(self.forecast(), geometry)
    }

    pub fn header_subtitle(&self) -> String {
        self.selected
            .as_ref()
            .map(format_location_label)
            .unwrap_or_else(|| DEFAULT_SUBTITLE.to_string())
    }
}

/// Drives searches and forecast fetches and owns the resulting state.
///
/// Cloning is cheap; clones share the same state.
#[derive(Debug, Clone)]
pub struct AppController {
    services: Services,
    geolocation_timeout: Duration,
    state: Arc<Mutex<AppState>>,
}

impl AppController {
    pub fn new(services: Services, geolocation_timeout: Duration) -> Self {
        Self { services, geolocation_timeout, state: Arc::new(Mutex::new(AppState::default())) }
    }

    pub fn from_config(config: &Config) -> Result<Self, MeteoError> {
        Ok(Self::new(services_from_config(config)?, config.geolocation_timeout()))
    }

    pub fn snapshot(&self) -> ViewState {
        let state = self.state.lock();
        ViewState {
            query: state.query.clone(),
            search: state.search.clone(),
            selected: state.selected.clone(),
            weather: state.weather.clone(),
            selected_day: state.selected_day.clone(),
        }
    }

    pub fn set_query(&self, text: impl Into<String>) {
        self.state.lock().query = text.into();
    }

    /// Search for the current query text.
    ///
    /// A blank query clears the results without contacting the geocoder.
    pub async fn submit_search(&self) {
        let (generation, query) = {
            let mut state = self.state.lock();
            state.search_generation += 1;
            if state.query.trim().is_empty() {
                state.search = SearchState::Idle;
                return;
            }
            state.search = SearchState::Searching;
            (state.search_generation, state.query.clone())
        };

        let result = self.services.geocoder.search(&query).await;

        let mut state = self.state.lock();
        if state.search_generation != generation {
            tracing::debug!(query = %query, generation, "discarding stale search response");
            return;
        }
        state.search = match result {
            Ok(list) => SearchState::Results(list),
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "search failed");
                SearchState::Failed(e.to_string())
            }
        };
    }

    /// Adopt `place`, clear pending results and fetch its forecast.
    pub async fn select_result(&self, place: GeoResult) {
        let coordinates = place.coordinates();
        let generation = {
            let mut state = self.state.lock();
            tracing::info!(place = %format_location_label(&place), "place selected");
            state.query = format_location_label(&place);
            state.search = SearchState::Idle;
            state.search_generation += 1;
            state.selected = Some(place);
            begin_weather(&mut state)
        };

        let result = self
            .services
            .forecast
            .fetch_weather(coordinates.latitude, coordinates.longitude)
            .await;
        self.finish_weather(generation, result);
    }

    /// Locate the device and fetch the forecast there.
    ///
    /// Location failures land in the weather error slot.
    pub async fn use_my_location(&self) {
        let generation = begin_weather(&mut self.state.lock());

        let position =
            match acquire_position(self.services.location.as_ref(), self.geolocation_timeout).await
            {
                Ok(position) => position,
                Err(e) => {
                    self.finish_weather(generation, Err(e));
                    return;
                }
            };

        {
            let mut state = self.state.lock();
            if state.weather_generation != generation {
                tracing::debug!(generation, "discarding stale location result");
                return;
            }
            tracing::info!(
                latitude = position.latitude,
                longitude = position.longitude,
                "using device location"
            );
            state.selected = Some(GeoResult::my_location(position.latitude, position.longitude));
        }

        let result =
            self.services.forecast.fetch_weather(position.latitude, position.longitude).await;
        self.finish_weather(generation, result);
    }

    /// Select the loaded day with `day`'s date, or clear the selection if it
    /// is already selected. Does nothing unless weather is loaded.
    pub fn toggle_day(&self, day: &DailyForecast) -> bool {
        self.toggle_day_by_date(&day.date)
    }

    /// Returns `false` if no loaded day has this date.
    pub fn toggle_day_by_date(&self, date: &str) -> bool {
        let mut state = self.state.lock();
        let day = match &state.weather {
            WeatherState::Loaded(snapshot) => {
                snapshot.daily.iter().find(|d| d.date == date).cloned()
            }
            _ => None,
        };
        let Some(day) = day else {
            return false;
        };

        let already = state.selected_day.as_ref().is_some_and(|d| d.date == day.date);
        state.selected_day = if already { None } else { Some(day) };
        true
    }

    fn finish_weather(&self, generation: u64, result: Result<WeatherSnapshot, MeteoError>) {
        let mut state = self.state.lock();
        if state.weather_generation != generation {
            tracing::debug!(generation, "discarding stale weather response");
            return;
        }

        match result {
            Ok(snapshot) => {
                state.weather = WeatherState::Loaded(snapshot);
                state.selected_day = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "weather unavailable");
                state.weather = WeatherState::Failed(e.to_string());
                state.selected_day = None;
            }
        }
    }
}

/// Start a forecast request; any earlier one becomes stale.
fn begin_weather(state: &mut AppState) -> u64 {
    state.weather_generation += 1;
    state.weather = WeatherState::Loading;
    state.selected_day = None;
    state.weather_generation
}

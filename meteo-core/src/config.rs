use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::{Coordinates, GeoResult, format_location_label};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// A stored location used in place of device geolocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl HomeLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates { latitude: self.latitude, longitude: self.longitude }
    }
}

impl From<&GeoResult> for HomeLocation {
    fn from(place: &GeoResult) -> Self {
        Self {
            name: format_location_label(place),
            latitude: place.latitude,
            longitude: place.longitude,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// geolocation_timeout_secs = 10
///
/// [home]
/// name = "Paris, Île-de-France, France"
/// latitude = 48.85341
/// longitude = 2.3488
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub request_timeout_secs: u64,
    pub geolocation_timeout_secs: u64,
    pub home: Option<HomeLocation>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            request_timeout_secs: 15,
            geolocation_timeout_secs: 10,
            home: None,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_secs(self.geolocation_timeout_secs)
    }

    pub fn set_home(&mut self, place: &GeoResult) {
        self.home = Some(HomeLocation::from(place));
    }

    /// Load config from the platform location, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from `path`, or defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file: {}", path.display()));
            }
        };

        toml::from_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Save config to the platform location, returning where it was written.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let serialized = toml::to_string_pretty(self).context("Failed to serialize config")?;

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        fs::write(path, serialized)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteo", "meteo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lyon() -> GeoResult {
        GeoResult {
            id: 2996944,
            name: "Lyon".into(),
            country: "France".into(),
            latitude: 45.74846,
            longitude: 4.84671,
            admin1: Some("Auvergne-Rhône-Alpes".into()),
        }
    }

    #[test]
    fn defaults_point_at_open_meteo() {
        let cfg = Config::default();
        assert_eq!(cfg.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(cfg.forecast_url, DEFAULT_FORECAST_URL);
        assert_eq!(cfg.geolocation_timeout(), Duration::from_secs(10));
        assert!(cfg.home.is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "geolocation_timeout_secs = 3\n").expect("write");

        let cfg = Config::load_from(&path).expect("load");
        assert_eq!(cfg.geolocation_timeout_secs, 3);
        assert_eq!(cfg.forecast_url, DEFAULT_FORECAST_URL);
    }

    #[test]
    fn home_survives_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_home(&lyon());
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        let home = loaded.home.expect("home must be stored");
        assert_eq!(home.name, "Lyon, Auvergne-Rhône-Alpes, France");
        assert_eq!(home.coordinates(), lyon().coordinates());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "home = 5").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Config::load_from(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}

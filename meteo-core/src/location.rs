//! Device position acquisition.

use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

use crate::{
    config::{Config, HomeLocation},
    error::MeteoError,
    model::Coordinates,
};

/// Something that can report where the device is.
#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    /// Fails with `GeolocationUnavailable` when there is no way to locate the
    /// device, or `GeolocationDenied` when the lookup was refused.
    async fn current_position(&self) -> Result<Coordinates, MeteoError>;
}

/// Reports the `[home]` location from config as the device position.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    home: Option<HomeLocation>,
}

impl ConfiguredLocation {
    pub fn new(home: Option<HomeLocation>) -> Self {
        Self { home }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.home.clone())
    }
}

#[async_trait]
impl LocationSource for ConfiguredLocation {
    async fn current_position(&self) -> Result<Coordinates, MeteoError> {
        self.home
            .as_ref()
            .map(HomeLocation::coordinates)
            .ok_or(MeteoError::GeolocationUnavailable)
    }
}

/// Ask `source` for a position, giving up after `timeout`.
pub async fn acquire_position(
    source: &dyn LocationSource,
    timeout: Duration,
) -> Result<Coordinates, MeteoError> {
    match tokio::time::timeout(timeout, source.current_position()).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(?timeout, "location lookup timed out");
            Err(MeteoError::GeolocationTimeout { secs: timeout.as_secs() })
        }
    }
}

//! Seams between the workflow and the upstream services.

use async_trait::async_trait;
use climaflow_core::WeatherError;

use crate::types::{ResolvedLocation, WeatherSnapshot};

/// Turns a free-text place name into coordinates.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Resolve `query` to its best-ranked match.
    ///
    /// Fails with `WeatherError::LocationNotFound` when nothing matches and
    /// with `WeatherError::Geocoding` when the request does not complete.
    async fn resolve(&self, query: &str) -> Result<ResolvedLocation, WeatherError>;
}

/// Fetches a fresh forecast for a coordinate pair.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fails with `WeatherError::Forecast` on any transport or decode failure.
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot, WeatherError>;
}

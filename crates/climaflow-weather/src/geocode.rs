//! Forward geocoding: convert a place name to coordinates.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use std::time::Duration;

use async_trait::async_trait;
use climaflow_core::{NetworkError, ReqwestErrorExt, WeatherConfig, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::source::LocationResolver;
use crate::types::ResolvedLocation;

const USER_AGENT: &str = "ClimaFlow/0.1.0";

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
    name: String,
    admin1: Option<String>,
    country: Option<String>,
}

impl From<GeocodingResult> for ResolvedLocation {
    fn from(result: GeocodingResult) -> Self {
        Self {
            latitude: result.latitude,
            longitude: result.longitude,
            name: result.name,
            admin_region: non_blank(result.admin1),
            country: non_blank(result.country),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Client for the geocoding search endpoint.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    language: String,
}

impl GeocodingClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherError::Geocoding(e.into_network_error()))?;

        Ok(Self {
            client,
            base_url: config.geocoding_url.clone(),
            language: config.language.clone(),
        })
    }

    /// Search for `query` and return the first (best-ranked) result.
    /// No local ranking and no retry.
    #[instrument(skip(self), level = "info")]
    pub async fn search(&self, query: &str) -> Result<ResolvedLocation, WeatherError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("name", query),
                ("count", "1"),
                ("language", self.language.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Geocoding(e.into_network_error()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!("Geocoding returned status {}", status);
            return Err(WeatherError::Geocoding(NetworkError::ServerError {
                status: status.as_u16(),
                message,
            }));
        }

        let body: GeocodingResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Geocoding(NetworkError::InvalidResponse(e.to_string())))?;

        let location: ResolvedLocation = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::LocationNotFound(query.to_string()))?
            .into();

        tracing::info!(
            "Geocoded '{}' to {} ({}, {})",
            query,
            location.title(),
            location.latitude,
            location.longitude
        );
        Ok(location)
    }
}

#[async_trait]
impl LocationResolver for GeocodingClient {
    async fn resolve(&self, query: &str) -> Result<ResolvedLocation, WeatherError> {
        self.search(query).await
    }
}

//! Forecast retrieval from the Open-Meteo forecast API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use climaflow_core::{NetworkError, ReqwestErrorExt, WeatherConfig, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::source::ForecastSource;
use crate::types::{CurrentConditions, DailyPoint, HourlyPoint, WeatherSnapshot};

const HOURLY_FIELDS: &str = "temperature_2m,weathercode";
const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min";
const LOCAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    timezone: String,
    timezone_abbreviation: Option<String>,
    #[serde(default)]
    utc_offset_seconds: i32,
    current_weather: Option<CurrentWeatherBlock>,
    #[serde(default)]
    hourly: HourlyBlock,
    #[serde(default)]
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherBlock {
    time: Option<String>,
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: i32,
}

#[derive(Debug, Default, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    weathercode: Vec<Option<i32>>,
}

#[derive(Debug, Default, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    weathercode: Vec<Option<i32>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
}

fn invalid(message: impl Into<String>) -> WeatherError {
    WeatherError::Forecast(NetworkError::InvalidResponse(message.into()))
}

/// Parse a local wall-clock timestamp ("2024-06-01T13:00") in `offset`.
fn parse_local(value: &str, offset: FixedOffset) -> Result<DateTime<FixedOffset>, WeatherError> {
    let naive = NaiveDateTime::parse_from_str(value, LOCAL_TIME_FORMAT)
        .map_err(|e| invalid(format!("bad timestamp '{}': {}", value, e)))?;
    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| invalid(format!("ambiguous timestamp '{}'", value)))
}

impl ForecastResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, WeatherError> {
        let offset = FixedOffset::east_opt(self.utc_offset_seconds)
            .ok_or_else(|| invalid(format!("utc offset out of range: {}", self.utc_offset_seconds)))?;

        let current = self
            .current_weather
            .ok_or_else(|| invalid("missing current_weather"))?;
        let observed_at = current
            .time
            .as_deref()
            .map(|t| parse_local(t, offset))
            .transpose()?;

        // Series are aligned on `time`; short value arrays leave gaps, not errors
        let hourly = self
            .hourly
            .time
            .iter()
            .enumerate()
            .map(|(i, t)| -> Result<HourlyPoint, WeatherError> {
                Ok(HourlyPoint {
                    timestamp: parse_local(t, offset)?,
                    temperature: self.hourly.temperature_2m.get(i).copied().flatten(),
                    condition_code: self.hourly.weathercode.get(i).copied().flatten(),
                })
            })
            .collect::<Result<Vec<_>, WeatherError>>()?;

        let daily = self
            .daily
            .time
            .iter()
            .enumerate()
            .map(|(i, d)| -> Result<DailyPoint, WeatherError> {
                let date = NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .map_err(|e| invalid(format!("bad date '{}': {}", d, e)))?;
                Ok(DailyPoint {
                    date,
                    condition_code: self.daily.weathercode.get(i).copied().flatten(),
                    temperature_max: self.daily.temperature_2m_max.get(i).copied().flatten(),
                    temperature_min: self.daily.temperature_2m_min.get(i).copied().flatten(),
                })
            })
            .collect::<Result<Vec<_>, WeatherError>>()?;

        Ok(WeatherSnapshot {
            timezone: self.timezone,
            timezone_abbreviation: self.timezone_abbreviation,
            utc_offset: offset,
            current: CurrentConditions {
                temperature: current.temperature,
                wind_speed: current.windspeed,
                wind_direction_degrees: current.winddirection.round() as i32,
                condition_code: current.weathercode,
                observed_at,
            },
            hourly,
            daily,
        })
    }
}

/// Client for the forecast endpoint. Every call is a fresh round trip.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| WeatherError::Forecast(e.into_network_error()))?;

        Ok(Self {
            client,
            base_url: config.forecast_url.clone(),
        })
    }

    /// Fetch current conditions plus hourly and daily series, with the
    /// timezone auto-detected from the coordinates.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Forecast(e.into_network_error()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!("Forecast returned status {}", status);
            return Err(WeatherError::Forecast(NetworkError::ServerError {
                status: status.as_u16(),
                message,
            }));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| invalid(e.to_string()))?;

        let snapshot = body.into_snapshot()?;
        tracing::info!(
            "Fetched forecast for ({}, {}): {} hourly, {} daily entries in {}",
            latitude,
            longitude,
            snapshot.hourly.len(),
            snapshot.daily.len(),
            snapshot.timezone
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl ForecastSource for WeatherProvider {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot, WeatherError> {
        self.forecast(latitude, longitude).await
    }
}

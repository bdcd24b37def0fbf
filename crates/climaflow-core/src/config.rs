use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// One problem found in `config.toml`, keyed by its dotted field path
/// (for example `weather.forecast_url`).
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Problems found by [`Config::validate`]. Errors stop startup, warnings
/// are only logged.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Startup may proceed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All errors joined on one line, for the startup failure message.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream endpoints and request settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Derived view settings
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Open-Meteo geocoding search endpoint
    pub geocoding_url: String,

    /// Open-Meteo forecast endpoint
    pub forecast_url: String,

    /// Locale tag sent to the geocoding endpoint
    pub language: String,

    /// City searched on startup, before the user confirms another one
    pub default_city: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            language: "pt".to_string(),
            default_city: "São Paulo".to_string(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Number of hourly entries starting at the current hour
    pub hourly_window: usize,

    /// Number of days in the daily summary
    pub daily_days: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            hourly_window: 24,
            daily_days: 5,
        }
    }
}

impl Config {
    /// Load configuration from the user config directory, falling back to
    /// defaults when no file exists. Nothing is written back.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, defaults if it is missing.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load and validate, refusing to start on a broken endpoint, a blank
    /// default city or an empty display window. Warnings are logged and
    /// handed back with the config.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Check endpoints, the default city, the timeout and display sizes.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::check_endpoint(&self.weather.geocoding_url, "weather.geocoding_url", &mut result);
        Self::check_endpoint(&self.weather.forecast_url, "weather.forecast_url", &mut result);

        if self.weather.default_city.trim().is_empty() {
            result.add_error("weather.default_city", "Default city must not be blank");
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.weather.request_timeout_secs > 120 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Request timeout is unusually long (>120s)",
            );
        }

        // Labels and weekday names are Portuguese regardless of this tag
        if self.weather.language != "pt" {
            result.add_warning(
                "weather.language",
                format!(
                    "Place names will be in '{}' but labels stay in Portuguese",
                    self.weather.language
                ),
            );
        }

        if self.display.hourly_window == 0 {
            result.add_error("display.hourly_window", "Hourly window must be greater than 0");
        }

        if self.display.daily_days == 0 {
            result.add_error("display.daily_days", "Daily summary must show at least 1 day");
        }

        result
    }

    /// Both endpoints must be absolute http(s) URLs.
    fn check_endpoint(endpoint: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(endpoint) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("Endpoint must be http or https, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "Endpoint must name a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid endpoint URL: {}", e));
            }
        }
    }

    /// `<config dir>/climaflow/config.toml`
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("climaflow");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.weather.forecast_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.forecast_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.geocoding_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_broken_endpoints_are_reported_per_field() {
        let mut config = Config::default();
        config.weather.geocoding_url = "mailto:ops@example.com".to_string();
        config.weather.forecast_url = "/v1/forecast".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        let summary = result.error_summary();
        assert!(summary.contains("weather.geocoding_url"));
        assert!(summary.contains("weather.forecast_url"));
    }

    #[test]
    fn test_blank_default_city() {
        let mut config = Config::default();
        config.weather.default_city = "   ".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "weather.default_city"));
    }

    #[test]
    fn test_zero_timeout_and_windows() {
        let mut config = Config::default();
        config.weather.request_timeout_secs = 0;
        config.display.hourly_window = 0;
        config.display.daily_days = 0;
        let result = config.validate();
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_non_portuguese_language_is_warning() {
        let mut config = Config::default();
        config.weather.language = "en".to_string();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.language"));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.weather.default_city, "São Paulo");
        assert_eq!(config.display.hourly_window, 24);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[weather]\ndefault_city = \"Lisboa\"\n\n[display]\ndaily_days = 3\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.default_city, "Lisboa");
        assert_eq!(config.weather.language, "pt");
        assert_eq!(config.display.daily_days, 3);
        assert_eq!(config.display.hourly_window, 24);
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[weather\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}

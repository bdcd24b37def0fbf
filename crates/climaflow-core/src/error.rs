//! Centralized error types for ClimaFlow.
//!
//! This module provides a typed error hierarchy that:
//! - Separates "the city does not exist" from "the request did not complete"
//! - Maps each failure to the Portuguese message shown to the user
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Network-related errors (HTTP, connectivity, undecodable bodies).
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Weather workflow errors.
///
/// `LocationNotFound` is user-correctable (try another name). The two
/// transport variants are transient and tagged with the service that failed.
#[derive(Debug, Clone, Error)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Geocoding request failed: {0}")]
    Geocoding(#[source] NetworkError),

    #[error("Forecast request failed: {0}")]
    Forecast(#[source] NetworkError),
}

impl WeatherError {
    /// True when the geocoding service returned no match for the query.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::LocationNotFound(_))
    }

    /// True when a request could not be completed or its body was unusable.
    pub fn is_transport(&self) -> bool {
        matches!(self, WeatherError::Geocoding(_) | WeatherError::Forecast(_))
    }

    /// The message shown next to the last good forecast.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::LocationNotFound(_) => "Cidade não encontrada.",
            WeatherError::Geocoding(_) => "Falha ao buscar cidade.",
            WeatherError::Forecast(_) => "Falha ao obter dados meteorológicos.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

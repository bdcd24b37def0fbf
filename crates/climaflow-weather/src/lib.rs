//! Weather workflow for ClimaFlow
//!
//! Resolves a city name via the Open-Meteo geocoding API, fetches its
//! forecast, and exposes the result as observable state plus a derived
//! display model.

pub mod conditions;
pub mod geocode;
pub mod provider;
pub mod source;
pub mod types;
pub mod view;
pub mod workflow;

pub use conditions::{describe, ConditionDescriptor, ConditionIcon, DEFAULT_DESCRIPTOR};
pub use geocode::GeocodingClient;
pub use provider::WeatherProvider;
pub use source::{ForecastSource, LocationResolver};
pub use types::*;
pub use view::DisplayModel;
pub use workflow::{ForecastData, Phase, WeatherController, WorkflowState};

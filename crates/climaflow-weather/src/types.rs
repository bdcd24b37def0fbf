use chrono::{DateTime, FixedOffset, NaiveDate};

/// Best geocoding match for a search query
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    /// First-level administrative region (state, province)
    pub admin_region: Option<String>,
    pub country: Option<String>,
}

impl ResolvedLocation {
    /// "name, region" when a region is known, otherwise just the name.
    pub fn title(&self) -> String {
        match &self.admin_region {
            Some(region) => format!("{}, {}", self.name, region),
            None => self.name.clone(),
        }
    }
}

/// Current conditions at the forecast location
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: f64,
    /// km/h
    pub wind_speed: f64,
    pub wind_direction_degrees: i32,
    pub condition_code: i32,
    pub observed_at: Option<DateTime<FixedOffset>>,
}

/// One hour of the hourly series. Values the service omitted are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyPoint {
    pub timestamp: DateTime<FixedOffset>,
    pub temperature: Option<f64>,
    pub condition_code: Option<i32>,
}

/// One day of the daily series. Values the service omitted are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub condition_code: Option<i32>,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
}

/// Complete current + hourly + daily payload for one location.
///
/// Snapshots are never merged; a new one replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// IANA name detected by the forecast service, e.g. "America/Sao_Paulo"
    pub timezone: String,
    pub timezone_abbreviation: Option<String>,
    /// Offset every timestamp in this snapshot is expressed in
    pub utc_offset: FixedOffset,
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyPoint>,
}

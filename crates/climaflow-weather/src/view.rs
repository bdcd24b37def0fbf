//! Display model derived from a `WorkflowState`.
//!
//! Everything here is a pure function of the state plus the caller's clock;
//! nothing is cached between derivations.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Weekday};
use climaflow_core::DisplayConfig;

use crate::conditions::{
    describe, describe_opt, BackgroundTheme, ConditionDescriptor, ConditionIcon, DEFAULT_DESCRIPTOR,
};
use crate::types::{DailyPoint, HourlyPoint};
use crate::workflow::{ForecastData, Phase, WorkflowState};

const TODAY_LABEL: &str = "Hoje";
const UNKNOWN_COUNTRY: &str = "Local";

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayModel {
    pub phase: Phase,
    /// First load, nothing to show yet
    pub loading: bool,
    /// A search or refresh is in flight; the refresh action is disabled
    pub busy: bool,
    pub error: Option<String>,
    /// Follows the current condition, default theme when there is no data
    pub theme: BackgroundTheme,
    pub forecast: Option<ForecastView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    pub location_title: String,
    pub country: String,
    pub current: CurrentView,
    pub today_max: Option<i64>,
    pub today_min: Option<i64>,
    pub hourly: Vec<HourView>,
    pub daily: Vec<DayView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentView {
    pub temperature: i64,
    pub condition: ConditionDescriptor,
    pub wind_speed: f64,
    pub wind_direction_degrees: i32,
}

impl CurrentView {
    pub fn temperature_text(&self) -> String {
        format!("{}°", self.temperature)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourView {
    pub timestamp: DateTime<FixedOffset>,
    /// "HH:MM" in the forecast timezone
    pub label: String,
    pub icon: ConditionIcon,
    pub temperature: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub date: NaiveDate,
    /// "Hoje" or the pt-BR weekday name
    pub label: String,
    pub icon: ConditionIcon,
    pub max: Option<i64>,
    pub min: Option<i64>,
}

fn round_temp(value: f64) -> i64 {
    value.round() as i64
}

impl DisplayModel {
    /// Derive what the presentation layer shows for `state` at time `now`.
    pub fn derive(state: &WorkflowState, now: DateTime<FixedOffset>, config: &DisplayConfig) -> Self {
        let forecast = state
            .data
            .as_deref()
            .map(|data| ForecastView::derive(data, now, config));
        let theme = forecast
            .as_ref()
            .map(|f| f.current.condition.theme)
            .unwrap_or(DEFAULT_DESCRIPTOR.theme);

        Self {
            phase: state.phase,
            loading: state.is_loading(),
            busy: state.is_busy(),
            error: state.error.clone(),
            theme,
            forecast,
        }
    }
}

impl ForecastView {
    fn derive(data: &ForecastData, now: DateTime<FixedOffset>, config: &DisplayConfig) -> Self {
        let snapshot = &data.snapshot;
        let now = now.with_timezone(&snapshot.utc_offset);
        let today = snapshot.daily.first();

        let hourly = next_hours(&snapshot.hourly, now, config.hourly_window)
            .iter()
            .map(|point| HourView {
                timestamp: point.timestamp,
                label: point.timestamp.format("%H:%M").to_string(),
                icon: describe_opt(point.condition_code).icon,
                temperature: point.temperature.map(round_temp),
            })
            .collect();

        Self {
            location_title: data.location.title(),
            country: data
                .location
                .country
                .clone()
                .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
            current: CurrentView {
                temperature: round_temp(snapshot.current.temperature),
                condition: describe(snapshot.current.condition_code),
                wind_speed: snapshot.current.wind_speed,
                wind_direction_degrees: snapshot.current.wind_direction_degrees,
            },
            today_max: today.and_then(|d| d.temperature_max).map(round_temp),
            today_min: today.and_then(|d| d.temperature_min).map(round_temp),
            hourly,
            daily: daily_summary(&snapshot.daily, now.date_naive(), config.daily_days),
        }
    }
}

/// Index of the first entry in the same hour and day-of-month as `now`.
///
/// Falls back to 0 when no entry matches, so a series that starts after
/// `now` (or ended before it) is shown from its beginning.
pub fn current_hour_index(series: &[HourlyPoint], now: DateTime<FixedOffset>) -> usize {
    series
        .iter()
        .position(|point| point.timestamp.hour() == now.hour() && point.timestamp.day() == now.day())
        .unwrap_or(0)
}

/// Up to `len` consecutive entries starting at the current hour. Shorter
/// when the series runs out; never wraps or pads.
pub fn next_hours(series: &[HourlyPoint], now: DateTime<FixedOffset>, len: usize) -> &[HourlyPoint] {
    let start = current_hour_index(series, now);
    let end = start.saturating_add(len).min(series.len());
    series.get(start..end).unwrap_or(&[])
}

/// First `days` entries labelled relative to `today`.
pub fn daily_summary(series: &[DailyPoint], today: NaiveDate, days: usize) -> Vec<DayView> {
    series
        .iter()
        .take(days)
        .map(|day| DayView {
            date: day.date,
            label: day_label(day.date, today),
            icon: describe_opt(day.condition_code).icon,
            max: day.temperature_max.map(round_temp),
            min: day.temperature_min.map(round_temp),
        })
        .collect()
}

/// "Hoje" for `today`, otherwise the weekday name in Brazilian Portuguese.
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return TODAY_LABEL.to_string();
    }
    weekday_name(date.weekday()).to_string()
}

/// Long-form pt-BR weekday, "-feira" included for Monday to Friday.
fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

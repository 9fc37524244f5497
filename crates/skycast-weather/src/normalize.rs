//! Turns one raw forecast response into a view-ready snapshot.
//!
//! Normalization is a pure function: no I/O, no clocks. The caller
//! passes the current hour so the hourly window can be derived and
//! tested deterministically. Misaligned parallel arrays are reconciled
//! by truncating to the shortest length; only a missing mandatory
//! current field or an unparseable timestamp is an error.

use chrono::NaiveDate;

use crate::conditions::WeatherCondition;
use crate::types::{RawDaily, RawForecast, RawHourly, UnitSystem};
use crate::units::{self, PLACEHOLDER};

/// Hourly entries kept after the current-hour alignment.
const HOURLY_WINDOW: usize = 24;

const NO_TIME: &str = "--:--";

/// Fully-formed, immutable view state derived from one forecast fetch.
/// Replaced wholesale on every successful fetch, never patched.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSnapshot {
    pub current_temp: String,
    pub condition: String,
    pub high_low: String,
    pub apparent_temp: String,
    pub humidity: String,
    pub pressure: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub sunrise: String,
    pub sunset: String,
    pub hourly: Vec<HourlyItem>,
    pub daily: Vec<DailyItem>,
}

impl Default for ForecastSnapshot {
    fn default() -> Self {
        Self {
            current_temp: PLACEHOLDER.to_string(),
            condition: "Loading...".to_string(),
            high_low: format!("Max:{PLACEHOLDER} Min:{PLACEHOLDER}"),
            apparent_temp: PLACEHOLDER.to_string(),
            humidity: PLACEHOLDER.to_string(),
            pressure: PLACEHOLDER.to_string(),
            wind_speed: PLACEHOLDER.to_string(),
            wind_direction: PLACEHOLDER.to_string(),
            sunrise: NO_TIME.to_string(),
            sunset: NO_TIME.to_string(),
            hourly: Vec::new(),
            daily: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyItem {
    pub hour_label: String,
    pub temp: String,
    pub weather_code: i32,
    pub is_current_hour: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyItem {
    pub day_label: String,
    pub max_temp: String,
    pub min_temp: String,
    pub weather_code: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("missing mandatory field `{0}`")]
    MissingField(&'static str),
    #[error("unparseable timestamp `{0}`")]
    BadTimestamp(String),
}

/// Derive a snapshot from a raw response under the given unit system.
/// `now_hour` is the local hour of day (0..=23).
pub fn normalize(
    raw: &RawForecast,
    units_sel: UnitSystem,
    now_hour: u32,
) -> Result<ForecastSnapshot, NormalizeError> {
    let temperature = raw
        .current
        .temperature
        .ok_or(NormalizeError::MissingField("current.temperature_2m"))?;
    let weather_code = raw
        .current
        .weather_code
        .ok_or(NormalizeError::MissingField("current.weather_code"))?;

    // Empty daily arrays degrade to zeros rather than failing.
    let max = raw.daily.max_temps.first().map_or(0, |t| t.round() as i64);
    let min = raw.daily.min_temps.first().map_or(0, |t| t.round() as i64);

    Ok(ForecastSnapshot {
        current_temp: units::format_temperature(temperature),
        condition: WeatherCondition::from_code(weather_code).label().to_string(),
        high_low: format!("Max:{max}° Min:{min}°"),
        apparent_temp: raw
            .current
            .apparent_temperature
            .map_or_else(|| PLACEHOLDER.to_string(), units::format_temperature),
        humidity: raw
            .current
            .humidity
            .map_or_else(|| PLACEHOLDER.to_string(), units::format_humidity),
        pressure: raw
            .current
            .pressure
            .map_or_else(|| PLACEHOLDER.to_string(), units::format_pressure),
        wind_speed: raw
            .current
            .wind_speed
            .map_or_else(|| PLACEHOLDER.to_string(), |v| units::format_wind_speed(v, units_sel)),
        wind_direction: raw
            .current
            .wind_direction
            .map_or_else(|| PLACEHOLDER.to_string(), |d| units::compass_point(d).to_string()),
        sunrise: time_of_day(raw.daily.sunrise.as_ref().and_then(|v| v.first())),
        sunset: time_of_day(raw.daily.sunset.as_ref().and_then(|v| v.first())),
        hourly: hourly_window(&raw.hourly, now_hour)?,
        daily: daily_items(&raw.daily)?,
    })
}

/// Forward slice of the hourly arrays: drop leading entries strictly
/// before `now_hour`, keep at most [`HOURLY_WINDOW`] in source order.
/// Only the first remaining entry may be flagged current, and only when
/// its hour matches exactly; a provider granularity mismatch flags
/// nothing.
fn hourly_window(raw: &RawHourly, now_hour: u32) -> Result<Vec<HourlyItem>, NormalizeError> {
    let len = raw
        .time
        .len()
        .min(raw.temperatures.len())
        .min(raw.weather_codes.len());

    let mut items = Vec::with_capacity(HOURLY_WINDOW.min(len));
    for i in 0..len {
        let hour = parse_hour(&raw.time[i])?;
        if items.is_empty() && hour < now_hour {
            continue;
        }
        if items.len() == HOURLY_WINDOW {
            break;
        }
        let is_current = items.is_empty() && hour == now_hour;
        items.push(HourlyItem {
            hour_label: if is_current {
                "Now".to_string()
            } else {
                format!("{hour:02}:00")
            },
            temp: units::format_temperature(raw.temperatures[i]),
            weather_code: raw.weather_codes[i],
            is_current_hour: is_current,
        });
    }
    Ok(items)
}

/// Map every daily index, no truncation beyond array reconciliation.
fn daily_items(raw: &RawDaily) -> Result<Vec<DailyItem>, NormalizeError> {
    let len = raw
        .time
        .len()
        .min(raw.weather_codes.len())
        .min(raw.max_temps.len())
        .min(raw.min_temps.len());

    let mut items = Vec::with_capacity(len);
    for i in 0..len {
        let date = NaiveDate::parse_from_str(&raw.time[i], "%Y-%m-%d")
            .map_err(|_| NormalizeError::BadTimestamp(raw.time[i].clone()))?;
        items.push(DailyItem {
            day_label: date.format("%a").to_string(),
            max_temp: units::format_temperature(raw.max_temps[i]),
            min_temp: units::format_temperature(raw.min_temps[i]),
            weather_code: raw.weather_codes[i],
        });
    }
    Ok(items)
}

/// Hour-of-day from an ISO-8601 local timestamp such as
/// "2024-06-01T14:00".
fn parse_hour(timestamp: &str) -> Result<u32, NormalizeError> {
    timestamp
        .split('T')
        .nth(1)
        .and_then(|t| t.split(':').next())
        .and_then(|h| h.parse::<u32>().ok())
        .filter(|h| *h < 24)
        .ok_or_else(|| NormalizeError::BadTimestamp(timestamp.to_string()))
}

/// Time-of-day substring of an ISO timestamp, "--:--" when absent.
fn time_of_day(value: Option<&String>) -> String {
    value
        .and_then(|v| v.split('T').nth(1))
        .map_or_else(|| NO_TIME.to_string(), str::to_string)
}

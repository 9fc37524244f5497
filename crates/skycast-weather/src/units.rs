//! Pure display formatting for numeric weather values.
//!
//! The remote service already converts values into the requested unit
//! system, so these functions only round and attach suffixes; they
//! never convert.

use crate::types::UnitSystem;

/// Shown wherever an optional value is absent.
pub const PLACEHOLDER: &str = "--";

const COMPASS_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Round to the nearest integer and attach the degree sign. The value
/// is assumed to already be in the active unit system.
pub fn format_temperature(value: f64) -> String {
    format!("{}°", value.round() as i64)
}

pub fn format_wind_speed(value: f64, units: UnitSystem) -> String {
    let suffix = match units {
        UnitSystem::Metric => "km/h",
        UnitSystem::Imperial => "mph",
    };
    format!("{} {}", value.round() as i64, suffix)
}

/// Pressure is reported in hPa regardless of the unit system.
pub fn format_pressure(value: f64) -> String {
    format!("{} hPa", value.round() as i64)
}

pub fn format_humidity(value: i32) -> String {
    format!("{value}%")
}

/// Map wind direction degrees onto one of 8 compass points. Each point
/// owns a 45° arc centered on its heading, so N covers 337.5°..22.5°.
pub fn compass_point(degrees: i32) -> &'static str {
    let bucket = ((f64::from(degrees) + 22.5) / 45.0) as usize % 8;
    COMPASS_POINTS[bucket]
}

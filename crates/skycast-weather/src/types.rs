use serde::{Deserialize, Serialize};

/// Unit system preference. Drives temperature and wind-speed display;
/// pressure stays in hPa either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value for the Open-Meteo `temperature_unit` query parameter.
    pub fn temperature_unit(&self) -> &'static str {
        match self {
            Self::Metric => "celsius",
            Self::Imperial => "fahrenheit",
        }
    }

    /// Value for the Open-Meteo `wind_speed_unit` query parameter.
    pub fn wind_speed_unit(&self) -> &'static str {
        match self {
            Self::Metric => "kmh",
            Self::Imperial => "mph",
        }
    }
}

/// Geographic coordinate. Immutable once obtained for a fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A named place from geocoding search or the static suggestion seed.
///
/// `id` is the provider's stable identifier. An id of 0 means the
/// place has no persisted identity and cannot be favorited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCandidate {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub admin1: Option<String>,
}

impl GeoCandidate {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Comma-joined non-empty region and country, e.g. "Bavaria, Germany".
    pub fn description(&self) -> String {
        [self.admin1.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Raw Open-Meteo forecast payload. Field names mirror the wire format;
/// the hourly and daily blocks are index-aligned parallel arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawForecast {
    pub current: RawCurrent,
    #[serde(default)]
    pub hourly: RawHourly,
    #[serde(default)]
    pub daily: RawDaily,
}

/// Current conditions. Temperature and weather code are mandatory for
/// normalization; everything else degrades to a placeholder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCurrent {
    #[serde(default, rename = "temperature_2m")]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub weather_code: Option<i32>,
    #[serde(default)]
    pub apparent_temperature: Option<f64>,
    #[serde(default, rename = "relative_humidity_2m")]
    pub humidity: Option<i32>,
    #[serde(default, rename = "surface_pressure")]
    pub pressure: Option<f64>,
    #[serde(default, rename = "wind_speed_10m")]
    pub wind_speed: Option<f64>,
    #[serde(default, rename = "wind_direction_10m")]
    pub wind_direction: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHourly {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default, rename = "temperature_2m")]
    pub temperatures: Vec<f64>,
    #[serde(default, rename = "weather_code")]
    pub weather_codes: Vec<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDaily {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default, rename = "weather_code")]
    pub weather_codes: Vec<i32>,
    #[serde(default, rename = "temperature_2m_max")]
    pub max_temps: Vec<f64>,
    #[serde(default, rename = "temperature_2m_min")]
    pub min_temps: Vec<f64>,
    #[serde(default)]
    pub sunrise: Option<Vec<String>>,
    #[serde(default)]
    pub sunset: Option<Vec<String>>,
}

/// Forecast fetch errors.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("weather service returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Device location capability errors.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("location error: {0}")]
    Other(String),
}

/// Geocoding search errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("geocoding service returned status {0}")]
    Status(reqwest::StatusCode),
}

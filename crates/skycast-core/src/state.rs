//! The single source-of-truth application state.

use skycast_weather::{ForecastSnapshot, GeoCandidate, UnitSystem};

/// Non-fatal error surfaced on the state after a failed operation.
/// None of these crash the process; the previous valid snapshot stays
/// visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LocationUnavailable,
    NetworkFailure,
    SearchFailed,
    MalformedResponse,
    PreferenceWriteFailure,
}

impl ErrorKind {
    /// Short message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::LocationUnavailable => "Unable to determine your location.",
            ErrorKind::NetworkFailure => "Weather service unreachable. Please try again.",
            ErrorKind::SearchFailed => "City search failed. Please try again.",
            ErrorKind::MalformedResponse => "Received an unexpected response. Please try again.",
            ErrorKind::PreferenceWriteFailure => "Failed to save your settings. Please try again.",
        }
    }
}

/// Read-only snapshot published to the rendering layer. All mutations
/// go through `AppStateController`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub active_city: String,
    /// Stable geocoding id of the active city; `None` for GPS-derived
    /// locations, which are not favoritable.
    pub active_city_id: Option<i64>,
    pub snapshot: ForecastSnapshot,
    pub is_loading: bool,
    pub last_error: Option<ErrorKind>,
    pub search_query: String,
    pub search_results: Vec<GeoCandidate>,
    pub suggested_cities: Vec<GeoCandidate>,
    pub unit_system: UnitSystem,
    pub is_dark_theme: bool,
    /// Mirror of the preference store's favorites; unique by id.
    pub favorites: Vec<GeoCandidate>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_city: "Locating...".to_string(),
            active_city_id: None,
            snapshot: ForecastSnapshot::default(),
            is_loading: true,
            last_error: None,
            search_query: String::new(),
            search_results: Vec::new(),
            suggested_cities: Vec::new(),
            unit_system: UnitSystem::Metric,
            is_dark_theme: false,
            favorites: Vec::new(),
        }
    }
}

/// Static seed of well-known cities shown before the user searches.
/// GeoNames ids keep every entry favoritable.
pub fn suggested_cities() -> Vec<GeoCandidate> {
    [
        (2643743, "London", "United Kingdom", 51.5074, -0.1278),
        (2988507, "Paris", "France", 48.8566, 2.3522),
        (2950159, "Berlin", "Germany", 52.52, 13.405),
        (3117735, "Madrid", "Spain", 40.4168, -3.7038),
        (3169070, "Rome", "Italy", 41.9028, 12.4964),
        (5128581, "New York", "United States", 40.7128, -74.006),
        (6167865, "Toronto", "Canada", 43.6532, -79.3832),
        (524901, "Moscow", "Russia", 55.7558, 37.6173),
        (1850147, "Tokyo", "Japan", 35.6762, 139.6503),
        (2147714, "Sydney", "Australia", -33.8688, 151.2093),
    ]
    .into_iter()
    .map(|(id, name, country, latitude, longitude)| GeoCandidate {
        id,
        name: name.to_string(),
        latitude,
        longitude,
        country: Some(country.to_string()),
        admin1: None,
    })
    .collect()
}

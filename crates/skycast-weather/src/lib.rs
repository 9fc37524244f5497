//! Weather domain for Skycast
//!
//! Raw Open-Meteo response schemas, pure normalization into view-ready
//! forecast snapshots, and the location/geocoding capabilities that
//! feed the state controller.

pub mod api;
pub mod conditions;
pub mod geocode;
pub mod location;
pub mod normalize;
pub mod types;
pub mod units;

pub use api::ForecastClient;
pub use conditions::WeatherCondition;
pub use geocode::{GeocodingClient, NominatimGeocoder, ReverseGeocoder};
pub use location::{FixedLocationSource, LocationResolver, LocationSource, UNKNOWN_CITY};
pub use normalize::{normalize, DailyItem, ForecastSnapshot, HourlyItem, NormalizeError};
pub use types::*;

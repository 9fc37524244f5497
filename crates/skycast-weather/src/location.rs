//! Device location capability and the resolver that pairs a coordinate
//! with a locality name.

use std::sync::Arc;

use async_trait::async_trait;

use crate::geocode::ReverseGeocoder;
use crate::types::{Coordinate, LocationError};

/// Shown when reverse geocoding cannot name the locality.
pub const UNKNOWN_CITY: &str = "Unknown";

/// Best-effort device location capability. The implementation owns its
/// accuracy/power profile and timeout.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_location(&self) -> Result<Coordinate, LocationError>;
}

/// Location source pinned to a known coordinate, for config-provided
/// positions and hosts without a location service.
#[derive(Debug, Clone)]
pub struct FixedLocationSource {
    pub coordinate: Coordinate,
}

#[async_trait]
impl LocationSource for FixedLocationSource {
    async fn current_location(&self) -> Result<Coordinate, LocationError> {
        Ok(self.coordinate)
    }
}

/// Resolves the device position into a `(coordinate, city name)` pair.
pub struct LocationResolver {
    source: Arc<dyn LocationSource>,
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl LocationResolver {
    pub fn new(source: Arc<dyn LocationSource>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { source, geocoder }
    }

    /// A coordinate lookup failure is fatal for the cycle; a missing
    /// locality name is not - the coordinate is still usable.
    pub async fn resolve(&self) -> Result<(Coordinate, String), LocationError> {
        let coord = self.source.current_location().await?;
        tracing::info!(
            lat = coord.latitude,
            lon = coord.longitude,
            "resolved device location"
        );
        let city = self
            .geocoder
            .locality(coord)
            .await
            .unwrap_or_else(|| UNKNOWN_CITY.to_string());
        Ok((coord, city))
    }
}

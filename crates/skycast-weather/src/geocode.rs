//! Geocoding: free-text city search via the Open-Meteo geocoding API,
//! and best-effort reverse lookup of coordinates to locality names via
//! Nominatim (OpenStreetMap) - free, no API key required.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Coordinate, GeoCandidate, SearchError};

const GEOCODING_API_BASE: &str = "https://geocoding-api.open-meteo.com";
const NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "skycast/0.1.0 (https://github.com/skycast)";

// Fixed cap and locale for ranked candidates.
const RESULT_LIMIT: &str = "10";
const SEARCH_LANGUAGE: &str = "en";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<GeoCandidate>>,
}

/// Forward geocoding client: query text in, ranked candidates out.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeocodingClient {
    pub fn new() -> Result<Self, SearchError> {
        Self::with_base_url(GEOCODING_API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Search for cities by name. An empty result set is a valid
    /// success, not an error.
    #[instrument(skip(self), level = "info")]
    pub async fn search(&self, query: &str) -> Result<Vec<GeoCandidate>, SearchError> {
        let url = format!("{}/v1/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("name", query),
                ("count", RESULT_LIMIT),
                ("language", SEARCH_LANGUAGE),
                ("format", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status(response.status()));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.results.unwrap_or_default())
    }
}

/// Best-effort coordinate-to-locality lookup. Implementations never
/// fail hard; `None` means the caller falls back to a placeholder.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn locality(&self, coord: Coordinate) -> Option<String>;
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
}

/// Nominatim-backed reverse geocoder, zoomed to locality granularity.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl NominatimGeocoder {
    pub fn new() -> Self {
        Self::with_base_url(NOMINATIM_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn locality(&self, coord: Coordinate) -> Option<String> {
        // zoom=10 asks Nominatim for city-level granularity.
        let url = match url::Url::parse_with_params(
            &format!("{}/reverse", self.base_url),
            &[
                ("lat", coord.latitude.to_string()),
                ("lon", coord.longitude.to_string()),
                ("format", "json".to_string()),
                ("addressdetails", "1".to_string()),
                ("layer", "address".to_string()),
                ("zoom", "10".to_string()),
            ],
        ) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("invalid reverse geocode url: {}", e);
                return None;
            }
        };

        let response = match self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("reverse geocode request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("reverse geocode returned status {}", response.status());
            return None;
        }

        let body: NominatimResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("reverse geocode parse error: {}", e);
                return None;
            }
        };

        // Prefer city > town > village > municipality.
        let addr = body.address?;
        let place = addr
            .city
            .or(addr.town)
            .or(addr.village)
            .or(addr.municipality)?;

        tracing::info!("reverse geocoded to: {}", place);
        Some(place)
    }
}

//! Open-Meteo forecast client.

use std::time::Duration;

use tracing::instrument;

use crate::types::{Coordinate, RawForecast, UnitSystem, WeatherError};

const FORECAST_API_BASE: &str = "https://api.open-meteo.com";
const REQUEST_TIMEOUT_SECS: u64 = 10;

// Fixed variable sets; the normalizer knows exactly these fields.
const CURRENT_FIELDS: &str = "temperature_2m,weather_code,apparent_temperature,\
relative_humidity_2m,surface_pressure,wind_speed_10m,wind_direction_10m";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset";

#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: reqwest::Client,
    base_url: String,
}

impl ForecastClient {
    pub fn new() -> Result<Self, WeatherError> {
        Self::with_base_url(FORECAST_API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Fetch one forecast for the coordinate. The service converts
    /// values server-side, so the payload arrives already in the
    /// requested unit system.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(
        &self,
        coord: Coordinate,
        units: UnitSystem,
    ) -> Result<RawForecast, WeatherError> {
        let url = format!("{}/v1/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", coord.latitude.to_string()),
                ("longitude", coord.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
                ("temperature_unit", units.temperature_unit().to_string()),
                ("wind_speed_unit", units.wind_speed_unit().to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}

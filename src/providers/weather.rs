//! Weather provider client (Open-Meteo-compatible).

use serde::Deserialize;
use url::Url;

use crate::config::schema::ProviderConfig;
use crate::providers::{Coordinates, ProviderError};

/// Current conditions at a destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReading {
    pub temperature_c: f64,
    /// Precipitation probability in percent for the current hourly slot,
    /// when the provider reports one.
    pub precipitation_chance: Option<u8>,
}

/// Fetches the current temperature and rain probability.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    forecast_url: Url,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: Option<CurrentBlock>,
    #[serde(default)]
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: Option<f64>,
    time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
}

impl WeatherClient {
    pub const ENDPOINT: &'static str = "weather";

    pub fn new(http: reqwest::Client, config: &ProviderConfig) -> Result<Self, url::ParseError> {
        let forecast_url = Url::parse(&config.base_url)?.join("v1/forecast")?;
        Ok(Self { http, forecast_url })
    }

    /// Fetch the current reading for a location.
    pub async fn current(&self, coords: Coordinates) -> Result<WeatherReading, ProviderError> {
        let response = self
            .http
            .get(self.forecast_url.clone())
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("current", "temperature_2m".to_string()),
                ("hourly", "precipitation_probability".to_string()),
                ("forecast_days", "1".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let forecast: ForecastResponse = response.json().await?;
        reading_from(forecast)
    }
}

/// Extract a reading, aligning the rain probability to the current hourly
/// slot (falling back to the first slot when the timestamps don't line up).
fn reading_from(forecast: ForecastResponse) -> Result<WeatherReading, ProviderError> {
    let current = forecast
        .current
        .ok_or_else(|| ProviderError::Decode("missing current block".into()))?;
    let temperature_c = current
        .temperature_2m
        .ok_or_else(|| ProviderError::Decode("missing current temperature".into()))?;

    let precipitation_chance = forecast.hourly.as_ref().and_then(|hourly| {
        if hourly.time.is_empty() || hourly.time.len() != hourly.precipitation_probability.len() {
            return None;
        }
        let slot = current
            .time
            .as_deref()
            .and_then(|now| hourly.time.iter().position(|t| t == now))
            .unwrap_or(0);
        hourly
            .precipitation_probability
            .get(slot)
            .copied()
            .flatten()
            .map(|p| p.round().clamp(0.0, 100.0) as u8)
    });

    Ok(WeatherReading {
        temperature_c,
        precipitation_chance,
    })
}

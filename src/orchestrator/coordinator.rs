//! Parallel fan-out coordination.
//!
//! # Responsibilities
//! - Resolve the destination through the breaker-guarded geocoder
//! - Dispatch weather and places concurrently and join both outcomes
//! - Hand the settled outcomes to the composer
//!
//! # Design Decisions
//! - `tokio::join!` — a join, not a race; the fast side's result is held
//!   until the slow side settles, and neither side cancels the other
//! - Each side is self-bounding (timeout × attempts + backoff), so the
//!   join's wall clock is the slower side, never the sum
//! - Geocoding is guarded exactly like the other two endpoints; "place
//!   not found" is a successful geocoder answer, not a failure

use std::sync::Arc;

use thiserror::Error;

use crate::config::ConfigHandle;
use crate::observability::metrics;
use crate::orchestrator::composer;
use crate::providers::weather::WeatherReading;
use crate::providers::{build_http_client, Coordinates, GeocodingClient, PlacesClient, WeatherClient};
use crate::query::{parse_query, Intent};
use crate::resilience::retry::{run_with_retries, CallFailure, RetryPolicy};
use crate::resilience::BreakerRegistry;

/// Error building the coordinator from configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid provider URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Routes one parsed query through geocoding and the provider fan-out.
pub struct Coordinator {
    config: ConfigHandle,
    breakers: Arc<BreakerRegistry>,
    geocoding: GeocodingClient,
    weather: WeatherClient,
    places: PlacesClient,
}

impl Coordinator {
    /// Build clients from the current configuration snapshot.
    ///
    /// Base URLs and the contact header are fixed for the process; retry
    /// and timeout parameters are re-read from the handle on every query,
    /// so a hot reload takes effect without a restart.
    pub fn from_config(config: ConfigHandle, breakers: Arc<BreakerRegistry>) -> Result<Self, BuildError> {
        let snapshot = config.load_full();
        let http = build_http_client(&snapshot.contact.user_agent)?;

        let geocoding = GeocodingClient::new(http.clone(), &snapshot.providers.geocoding)?;
        let weather = WeatherClient::new(http.clone(), &snapshot.providers.weather)?;
        let places = PlacesClient::new(http, &snapshot.providers.places)?;

        Ok(Self {
            config,
            breakers,
            geocoding,
            weather,
            places,
        })
    }

    /// Answer a free-text travel query.
    ///
    /// Never fails as a whole: every internal failure has already been
    /// converted into either a composed partial answer or a fixed
    /// user-facing message.
    pub async fn answer(&self, input: &str) -> String {
        let parsed = parse_query(input);
        tracing::debug!(
            destination = %parsed.destination,
            intent = ?parsed.intent,
            "Parsed query"
        );

        let config = self.config.load_full();
        let geocoding_policy =
            RetryPolicy::new(config.providers.geocoding.timeout_secs, &config.retries);

        let breaker = self.breakers.get(GeocodingClient::ENDPOINT);
        let coords = match run_with_retries(&breaker, &geocoding_policy, || {
            self.geocoding.resolve(&parsed.destination)
        })
        .await
        {
            Ok(Some(coords)) => coords,
            Ok(None) => {
                tracing::info!(destination = %parsed.destination, "Destination not found");
                metrics::record_query("not_found");
                return composer::PLACE_NOT_FOUND.to_string();
            }
            Err(failure) => {
                tracing::warn!(
                    destination = %parsed.destination,
                    error = %failure,
                    "Geocoding unavailable"
                );
                metrics::record_query("failed");
                return composer::ALL_FAILED.to_string();
            }
        };

        let weather_policy =
            RetryPolicy::new(config.providers.weather.timeout_secs, &config.retries);
        let places_policy = RetryPolicy::new(config.providers.places.timeout_secs, &config.retries);

        let (weather, places) = match parsed.intent {
            Intent::Weather => (Some(self.fetch_weather(coords, &weather_policy).await), None),
            Intent::Places => (None, Some(self.fetch_places(coords, &places_policy).await)),
            Intent::Both => {
                let (weather, places) = tokio::join!(
                    self.fetch_weather(coords, &weather_policy),
                    self.fetch_places(coords, &places_policy),
                );
                (Some(weather), Some(places))
            }
        };

        metrics::record_query("answered");
        composer::compose(&parsed.destination, weather, places)
    }

    async fn fetch_weather(
        &self,
        coords: Coordinates,
        policy: &RetryPolicy,
    ) -> Result<WeatherReading, CallFailure> {
        let breaker = self.breakers.get(WeatherClient::ENDPOINT);
        run_with_retries(&breaker, policy, || self.weather.current(coords)).await
    }

    async fn fetch_places(
        &self,
        coords: Coordinates,
        policy: &RetryPolicy,
    ) -> Result<Vec<String>, CallFailure> {
        let breaker = self.breakers.get(PlacesClient::ENDPOINT);
        run_with_retries(&breaker, policy, || self.places.nearby(coords)).await
    }
}

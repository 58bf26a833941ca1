//! Upstream provider clients.
//!
//! Thin HTTP clients for the three external dependencies: geocoding
//! (Nominatim), weather (Open-Meteo), and points of interest (Overpass).
//! Clients do one request and decode it; timeouts, retries, and breaker
//! accounting live in the resilience layer above them.

pub mod geocoding;
pub mod places;
pub mod weather;

use thiserror::Error;

pub use geocoding::GeocodingClient;
pub use places::PlacesClient;
pub use weather::WeatherClient;

/// A resolved destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Error from a single provider request.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, TLS, or body-level transport failure (reqwest).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    /// The provider answered 200 but the payload was unusable.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Shared reqwest client carrying the contact header.
///
/// One pool for all providers; per-attempt deadlines are enforced by the
/// resilience layer, so only the connect phase is bounded here.
pub fn build_http_client(user_agent: &str) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .connect_timeout(std::time::Duration::from_secs(5))
        .build()
}

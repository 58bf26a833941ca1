//! Geocoding provider client (Nominatim-compatible).

use serde::Deserialize;
use url::Url;

use crate::config::schema::ProviderConfig;
use crate::providers::{Coordinates, ProviderError};

/// Converts a free-text place name into coordinates.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http: reqwest::Client,
    search_url: Url,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

impl GeocodingClient {
    pub const ENDPOINT: &'static str = "geocoding";

    pub fn new(http: reqwest::Client, config: &ProviderConfig) -> Result<Self, url::ParseError> {
        let search_url = Url::parse(&config.base_url)?.join("search")?;
        Ok(Self { http, search_url })
    }

    /// Resolve a place name.
    ///
    /// `Ok(None)` means the provider answered but knows no such place;
    /// that is a successful call, not a failure, and must not feed the
    /// circuit breaker as one.
    pub async fn resolve(&self, place: &str) -> Result<Option<Coordinates>, ProviderError> {
        let response = self
            .http
            .get(self.search_url.clone())
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let results: Vec<SearchResult> = response.json().await?;
        coordinates_from(results)
    }
}

fn coordinates_from(results: Vec<SearchResult>) -> Result<Option<Coordinates>, ProviderError> {
    let Some(first) = results.into_iter().next() else {
        return Ok(None);
    };

    let latitude: f64 = first
        .lat
        .parse()
        .map_err(|_| ProviderError::Decode(format!("unparsable latitude '{}'", first.lat)))?;
    let longitude: f64 = first
        .lon
        .parse()
        .map_err(|_| ProviderError::Decode(format!("unparsable longitude '{}'", first.lon)))?;

    Ok(Some(Coordinates {
        latitude,
        longitude,
    }))
}

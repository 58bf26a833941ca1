//! Points-of-interest provider client (Overpass-compatible).

use std::collections::HashSet;

use serde::Deserialize;
use url::Url;

use crate::config::schema::PlacesConfig;
use crate::providers::{Coordinates, ProviderError};

/// Fetches named tourist attractions around a destination.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    interpreter_url: Url,
    radius_meters: u32,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    #[serde(default)]
    tags: Option<std::collections::HashMap<String, String>>,
}

impl PlacesClient {
    pub const ENDPOINT: &'static str = "places";

    pub fn new(http: reqwest::Client, config: &PlacesConfig) -> Result<Self, url::ParseError> {
        let interpreter_url = Url::parse(&config.base_url)?.join("api/interpreter")?;
        Ok(Self {
            http,
            interpreter_url,
            radius_meters: config.radius_meters,
            max_results: config.max_results,
        })
    }

    /// Fetch up to `max_results` unique attraction names near a location.
    ///
    /// An empty list is a valid answer for a remote area.
    pub async fn nearby(&self, coords: Coordinates) -> Result<Vec<String>, ProviderError> {
        let query = format!(
            "[out:json][timeout:25];\n\
             node(around:{radius},{lat},{lon})[\"tourism\"=\"attraction\"];\n\
             out tags;",
            radius = self.radius_meters,
            lat = coords.latitude,
            lon = coords.longitude,
        );

        let response = self
            .http
            .post(self.interpreter_url.clone())
            .form(&[("data", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let body: OverpassResponse = response.json().await?;
        Ok(names_from(body, self.max_results))
    }
}

/// Collect unique attraction names in response order.
fn names_from(response: OverpassResponse, limit: usize) -> Vec<String> {
    let mut names = Vec::new();
    let mut seen = HashSet::new();

    for element in response.elements {
        let Some(name) = element.tags.and_then(|mut t| t.remove("name")) else {
            continue;
        };
        if seen.insert(name.clone()) {
            names.push(name);
        }
        if names.len() >= limit {
            break;
        }
    }

    names
}

//! OpenCage reverse geocoding client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{GeocodingProvider, ServiceError};

const SERVICE: &str = "OpenCage";

/// Place name hierarchy for a pair of coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Place {
    pub city: Option<String>,
    pub county: Option<String>,
}

impl Place {
    /// City if known, else county, else "Unknown Area".
    pub fn area(&self) -> String {
        fn known(name: &Option<String>) -> Option<&str> {
            name.as_deref().filter(|a| !a.trim().is_empty())
        }

        known(&self.city)
            .or_else(|| known(&self.county))
            .unwrap_or("Unknown Area")
            .to_string()
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    results: Vec<ReverseResult>,
}

#[derive(Debug, Deserialize)]
struct ReverseResult {
    #[serde(default)]
    components: Place,
}

/// Client for the OpenCage geocoding API.
pub struct OpenCageGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenCageGeocoder {
    /// Create a new geocoder client.
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl GeocodingProvider for OpenCageGeocoder {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Option<Place>, ServiceError> {
        let url = format!("{}/geocode/v1/json", self.base_url);
        let query = format!("{latitude}+{longitude}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("key", self.api_key.as_str()),
                ("no_annotations", "1"),
                ("limit", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response(SERVICE, response).await);
        }

        let parsed: ReverseResponse = response.json().await?;
        Ok(parsed.results.into_iter().next().map(|r| r.components))
    }
}

//! IP-based caller location.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use super::{LocationProvider, ServiceError};

const SERVICE: &str = "ipinfo";

/// Coarse location of the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub city: Option<String>,

    /// Latitude and longitude
    pub coordinates: Option<(f64, f64)>,
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    city: Option<String>,
    loc: Option<String>,
}

/// Parse a `"lat,lon"` pair.
fn parse_loc(loc: &str) -> Option<(f64, f64)> {
    let (lat, lon) = loc.split_once(',')?;
    Some((lat.trim().parse().ok()?, lon.trim().parse().ok()?))
}

/// Location lookup through ipinfo.io.
pub struct IpInfoLocator {
    client: Client,
    url: String,
}

impl IpInfoLocator {
    /// Create a new locator.
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl LocationProvider for IpInfoLocator {
    async fn locate(&self) -> Result<Location, ServiceError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response(SERVICE, response).await);
        }

        let parsed: IpInfoResponse = response.json().await?;
        Ok(Location {
            city: parsed.city.filter(|c| !c.is_empty()),
            coordinates: parsed.loc.as_deref().and_then(parse_loc),
        })
    }
}

/// The caller's city, or "Unknown" if it cannot be determined.
pub async fn city_or_unknown(provider: &dyn LocationProvider) -> String {
    match provider.locate().await {
        Ok(location) => location.city.unwrap_or_else(|| "Unknown".to_string()),
        Err(e) => {
            warn!(error = %e, "Location lookup failed");
            "Unknown".to_string()
        }
    }
}

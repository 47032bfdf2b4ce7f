//! Nearest-hospital lookup.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{GeocodingProvider, LocationProvider};
use crate::types::Hospital;

/// Stand-in hospital name; there is no hospital directory behind this lookup.
const PLACEHOLDER_NAME: &str = "City Medical Center";
const PLACEHOLDER_PHONE: &str = "+1-234-567-8901";

/// Finds a hospital near the caller.
///
/// Only the area is real (from reverse geocoding the caller's IP location);
/// the name and phone number are fixed placeholders and flagged as such.
pub struct HospitalLocator {
    location: Arc<dyn LocationProvider>,
    geocoder: Option<Arc<dyn GeocodingProvider>>,
}

impl HospitalLocator {
    /// Create a locator. Without a geocoder every lookup returns `None`.
    pub fn new(
        location: Arc<dyn LocationProvider>,
        geocoder: Option<Arc<dyn GeocodingProvider>>,
    ) -> Self {
        Self { location, geocoder }
    }

    /// Whether lookups can succeed at all.
    pub fn is_enabled(&self) -> bool {
        self.geocoder.is_some()
    }

    /// Nearest hospital, or `None` if any step fails.
    pub async fn nearest(&self) -> Option<Hospital> {
        let Some(geocoder) = &self.geocoder else {
            debug!("No geocoder configured, skipping hospital lookup");
            return None;
        };

        let location = match self.location.locate().await {
            Ok(location) => location,
            Err(e) => {
                warn!(error = %e, "Location lookup failed, hospital unavailable");
                return None;
            }
        };

        let (latitude, longitude) = location.coordinates?;

        match geocoder.reverse_geocode(latitude, longitude).await {
            Ok(Some(place)) => {
                let area = place.area();
                info!(area = %area, "Resolved hospital area");
                Some(Hospital {
                    name: PLACEHOLDER_NAME.to_string(),
                    area,
                    phone: PLACEHOLDER_PHONE.to_string(),
                    placeholder: true,
                })
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed, hospital unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{Location, Place, ServiceError};
    use async_trait::async_trait;

    struct FixedLocation(Location);

    #[async_trait]
    impl LocationProvider for FixedLocation {
        async fn locate(&self) -> Result<Location, ServiceError> {
            Ok(self.0.clone())
        }
    }

    struct FixedGeocoder(Result<Option<Place>, ()>);

    #[async_trait]
    impl GeocodingProvider for FixedGeocoder {
        async fn reverse_geocode(&self, _: f64, _: f64) -> Result<Option<Place>, ServiceError> {
            self.0
                .clone()
                .map_err(|_| ServiceError::NotConfigured("geocoder"))
        }
    }

    fn located() -> Arc<dyn LocationProvider> {
        Arc::new(FixedLocation(Location {
            city: Some("Pune".to_string()),
            coordinates: Some((18.52, 73.85)),
        }))
    }

    #[tokio::test]
    async fn test_hospital_is_flagged_placeholder() {
        let geocoder = FixedGeocoder(Ok(Some(Place {
            city: Some("Pune".to_string()),
            county: None,
        })));
        let locator = HospitalLocator::new(located(), Some(Arc::new(geocoder)));

        let hospital = locator.nearest().await.unwrap();
        assert_eq!(hospital.area, "Pune");
        assert_eq!(hospital.name, PLACEHOLDER_NAME);
        assert!(hospital.placeholder);
    }

    #[tokio::test]
    async fn test_failures_become_none() {
        let failing = HospitalLocator::new(located(), Some(Arc::new(FixedGeocoder(Err(())))));
        assert!(failing.nearest().await.is_none());

        let no_result = HospitalLocator::new(located(), Some(Arc::new(FixedGeocoder(Ok(None)))));
        assert!(no_result.nearest().await.is_none());

        let no_coordinates = HospitalLocator::new(
            Arc::new(FixedLocation(Location::default())),
            Some(Arc::new(FixedGeocoder(Ok(Some(Place::default()))))),
        );
        assert!(no_coordinates.nearest().await.is_none());

        assert!(HospitalLocator::new(located(), None).nearest().await.is_none());
    }
}

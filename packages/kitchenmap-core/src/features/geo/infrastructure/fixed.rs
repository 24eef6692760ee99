//! Table-driven geocoder for offline runs and tests

use async_trait::async_trait;
use std::collections::HashMap;

use crate::features::geo::domain::{GeocodeOutcome, UserLocation};
use crate::features::geo::ports::Geocoder;
use crate::shared::models::Result;

/// Resolves addresses from a fixed table (keys trimmed, case-insensitive)
#[derive(Debug, Clone, Default)]
pub struct FixedGeocoder {
    entries: HashMap<String, UserLocation>,
}

impl FixedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `address`; the formatted address echoes the input
    pub fn with(mut self, address: &str, latitude: f64, longitude: f64) -> Self {
        self.entries.insert(
            normalize(address),
            UserLocation::new(latitude, longitude, address.trim()),
        );
        self
    }

    pub fn with_location(mut self, address: &str, location: UserLocation) -> Self {
        self.entries.insert(normalize(address), location);
        self
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn resolve(&self, address: &str) -> Result<GeocodeOutcome> {
        Ok(match self.entries.get(&normalize(address)) {
            Some(location) => GeocodeOutcome::Resolved(location.clone()),
            None => GeocodeOutcome::NotFound,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_ignores_case_and_padding() {
        let geocoder = FixedGeocoder::new().with("Columbia University", 40.8075, -73.9626);

        let outcome = geocoder.resolve("  columbia UNIVERSITY ").await.unwrap();
        let location = outcome.into_location().unwrap();
        assert_eq!(location.latitude, 40.8075);
        assert_eq!(location.formatted_address, "Columbia University");

        assert_eq!(
            geocoder.resolve("zzzznotarealaddress").await.unwrap(),
            GeocodeOutcome::NotFound
        );
    }
}

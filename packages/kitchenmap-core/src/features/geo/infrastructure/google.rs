//! Google Geocoding API adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GeocodingConfig;
use crate::features::geo::domain::{GeocodeOutcome, UserLocation};
use crate::features::geo::ports::Geocoder;
use crate::shared::models::{KitchenmapError, Result};

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Geocoder backed by `GET {base_url}?address=..&key=..`
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: Client,
    config: GeocodingConfig,
}

impl GoogleGeocoder {
    pub fn new(config: GeocodingConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn resolve(&self, address: &str) -> Result<GeocodeOutcome> {
        let key = self.config.require_api_key()?;

        debug!(address, "Geocoding address");
        let response: GeocodeResponse = self
            .client
            .get(&self.config.base_url)
            .query(&[("address", address), ("key", key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        interpret(response)
    }
}

fn interpret(response: GeocodeResponse) -> Result<GeocodeOutcome> {
    match response.status.as_str() {
        STATUS_ZERO_RESULTS => Ok(GeocodeOutcome::NotFound),
        STATUS_OK => Ok(response
            .results
            .into_iter()
            .next()
            .map(|first| {
                GeocodeOutcome::Resolved(UserLocation::new(
                    first.geometry.location.lat,
                    first.geometry.location.lng,
                    first.formatted_address,
                ))
            })
            .unwrap_or(GeocodeOutcome::NotFound)),
        status => {
            let detail = response.error_message.unwrap_or_default();
            warn!(status, detail = %detail, "Geocoding request rejected");
            Err(KitchenmapError::external_service(format!(
                "Geocoding failed with status {}: {}",
                status, detail
            )))
        }
    }
}

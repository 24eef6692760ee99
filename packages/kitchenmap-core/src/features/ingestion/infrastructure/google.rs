//! Google Places text search adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::PlacesConfig;
use crate::features::ingestion::domain::PlaceRecord;
use crate::features::ingestion::ports::PlacesSource;
use crate::shared::models::Result;

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";
const FIELD_MASK: &str = "places.displayName,places.formattedAddress,\
places.nationalPhoneNumber,places.location,places.regularOpeningHours,\
places.businessStatus,places.accessibilityOptions,places.reviews";

#[derive(Debug, Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<PlaceRecord>,
}

/// `POST {base_url}` with `{"textQuery": ..}`
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: Client,
    config: PlacesConfig,
}

impl GooglePlacesClient {
    pub fn new(config: PlacesConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl PlacesSource for GooglePlacesClient {
    async fn search(&self, query: &str) -> Result<Vec<PlaceRecord>> {
        let key = self.config.require_api_key()?;

        debug!(query, "Searching places");
        let response: SearchTextResponse = self
            .client
            .post(&self.config.base_url)
            .header(API_KEY_HEADER, key)
            .header(FIELD_MASK_HEADER, FIELD_MASK)
            .json(&json!({ "textQuery": query }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(places = response.places.len(), "Places search returned");
        Ok(response.places)
    }
}

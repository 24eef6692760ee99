//! Kitchen recommendation use case

use kitchenmap_storage::KitchenStore;
use std::sync::Arc;
use tracing::info;

use super::domain::{render_prompt, Recommendation, RecommendationRequest};
use super::ports::RecommendationModel;
use crate::features::geo::{GeocodeOutcome, Geocoder};
use crate::shared::models::{KitchenmapError, Result};

#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<dyn KitchenStore>,
    geocoder: Arc<dyn Geocoder>,
    model: Arc<dyn RecommendationModel>,
}

impl RecommendationService {
    pub fn new(
        store: Arc<dyn KitchenStore>,
        geocoder: Arc<dyn Geocoder>,
        model: Arc<dyn RecommendationModel>,
    ) -> Self {
        Self {
            store,
            geocoder,
            model,
        }
    }

    pub async fn recommend(&self, request: &RecommendationRequest) -> Result<Recommendation> {
        let address = request.address.trim();
        if address.is_empty() {
            return Err(KitchenmapError::invalid_input("Address must not be blank"));
        }

        let location = match self.geocoder.resolve(address).await? {
            GeocodeOutcome::Resolved(location) => location,
            GeocodeOutcome::NotFound => {
                return Err(KitchenmapError::not_found(format!(
                    "No location found for address: {}",
                    address
                )))
            }
        };

        let kitchens = self.store.list_kitchens().await?;
        let ratings = self.store.list_ratings().await?;
        let prompt = render_prompt(
            &location,
            &kitchens,
            &ratings,
            request.accessibility_needs.as_deref(),
            request.meal_hours.as_deref(),
        );

        let answer = self.model.complete(&prompt).await?;
        info!(kitchens = kitchens.len(), "Recommendation generated");
        Ok(Recommendation { answer, location })
    }
}

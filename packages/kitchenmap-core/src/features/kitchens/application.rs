//! Kitchen directory use cases

use kitchenmap_storage::{GeoPoint, Kitchen, KitchenId, KitchenPatch, KitchenStore, NewKitchen};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::domain::{checked_count, normalize_new, normalize_patch, validate_new, validate_patch};
use crate::features::geo::{GeocodeOutcome, Geocoder};
use crate::features::ranking::{top_rated, NearestKitchenRanker, NearestOutcome};
use crate::features::ratings::RatingAggregator;
use crate::shared::models::{KitchenmapError, Result};

#[derive(Clone)]
pub struct KitchenService {
    store: Arc<dyn KitchenStore>,
    geocoder: Arc<dyn Geocoder>,
    ranker: NearestKitchenRanker,
    aggregator: RatingAggregator,
}

impl KitchenService {
    pub fn new(
        store: Arc<dyn KitchenStore>,
        geocoder: Arc<dyn Geocoder>,
        aggregator: RatingAggregator,
    ) -> Self {
        Self {
            ranker: NearestKitchenRanker::new(geocoder.clone()),
            store,
            geocoder,
            aggregator,
        }
    }

    /// Create a kitchen; geocodes the address when no coordinate is given
    pub async fn add_kitchen(&self, kitchen: NewKitchen) -> Result<Kitchen> {
        let mut kitchen = normalize_new(kitchen);
        validate_new(&kitchen)?;

        if self.store.find_kitchen_by_name(&kitchen.name).await?.is_some() {
            return Err(KitchenmapError::conflict(format!(
                "Kitchen already exists with name: {}",
                kitchen.name
            )));
        }

        if kitchen.location.is_none() {
            kitchen.location = self.locate(&kitchen.address).await;
        }

        let saved = self.store.insert_kitchen(&kitchen).await?;
        info!(kitchen_id = saved.id, name = %saved.name, "Kitchen added");
        Ok(saved)
    }

    pub async fn get_kitchen(&self, kitchen_id: KitchenId) -> Result<Kitchen> {
        self.store
            .get_kitchen(kitchen_id)
            .await?
            .ok_or_else(|| KitchenmapError::kitchen_not_found(kitchen_id))
    }

    pub async fn get_kitchen_by_name(&self, name: &str) -> Result<Kitchen> {
        self.store
            .find_kitchen_by_name(name.trim())
            .await?
            .ok_or_else(|| {
                KitchenmapError::not_found(format!("Kitchen not found with name: {}", name.trim()))
            })
    }

    pub async fn list_kitchens(&self) -> Result<Vec<Kitchen>> {
        Ok(self.store.list_kitchens().await?)
    }

    /// Kitchens whose name contains `fragment`, case-insensitive
    pub async fn search_kitchens(&self, fragment: &str) -> Result<Vec<Kitchen>> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Err(KitchenmapError::invalid_input("Search text must not be blank"));
        }
        Ok(self.store.find_kitchens_by_name_containing(fragment).await?)
    }

    /// Partial update; a new address without a coordinate is re-geocoded,
    /// and an unresolved one drops the old coordinate
    pub async fn update_kitchen(
        &self,
        kitchen_id: KitchenId,
        patch: KitchenPatch,
    ) -> Result<Kitchen> {
        let mut patch = normalize_patch(patch);
        validate_patch(&patch)?;

        let current = self.get_kitchen(kitchen_id).await?;
        if let Some(name) = &patch.name {
            if name != &current.name && self.store.find_kitchen_by_name(name).await?.is_some() {
                return Err(KitchenmapError::conflict(format!(
                    "Kitchen already exists with name: {}",
                    name
                )));
            }
        }

        if patch.location.is_none() {
            if let Some(address) = &patch.address {
                if address != &current.address {
                    patch.location = self.locate(address).await;
                    patch.clear_location = patch.location.is_none();
                }
            }
        }

        if patch.is_empty() {
            return Ok(current);
        }
        Ok(self.store.update_kitchen(kitchen_id, &patch).await?)
    }

    /// Delete a kitchen and all of its ratings
    pub async fn delete_kitchen(&self, kitchen_id: KitchenId) -> Result<usize> {
        let removed = self.store.delete_kitchen(kitchen_id).await?;
        info!(kitchen_id, ratings_removed = removed, "Kitchen deleted");
        Ok(removed)
    }

    /// Up to `count` kitchens nearest to `address`
    pub async fn nearest_kitchens(&self, address: &str, count: i64) -> Result<NearestOutcome> {
        let address = address.trim();
        if address.is_empty() {
            return Err(KitchenmapError::invalid_input("Address must not be blank"));
        }
        let count = checked_count(count)?;

        let candidates = self.store.list_kitchens().await?;
        if candidates.is_empty() {
            return Err(KitchenmapError::no_data("No kitchens are registered"));
        }

        self.ranker.nearest(address, &candidates, count).await
    }

    /// Up to `count` kitchens by descending average rating
    pub async fn top_rated_kitchens(&self, count: i64) -> Result<Vec<Kitchen>> {
        let count = checked_count(count)?;
        let candidates = self.store.list_kitchens().await?;
        Ok(top_rated(candidates, count))
    }

    pub async fn predicted_wait_time(&self, kitchen_id: KitchenId) -> Result<f64> {
        self.aggregator.predicted_wait_time(kitchen_id).await
    }

    /// Best-effort geocode; failures leave the coordinate absent
    async fn locate(&self, address: &str) -> Option<GeoPoint> {
        match self.geocoder.resolve(address).await {
            Ok(GeocodeOutcome::Resolved(location)) => Some(location.point()),
            Ok(GeocodeOutcome::NotFound) => {
                debug!(address, "Kitchen address did not resolve; storing without coordinate");
                None
            }
            Err(err) => {
                warn!(address, error = %err, "Geocoding kitchen address failed");
                None
            }
        }
    }
}

//! Nearest-kitchen ranking use case

use kitchenmap_storage::Kitchen;
use std::sync::Arc;
use tracing::debug;

use super::domain::{select_nearest, NearestOutcome};
use crate::features::geo::{GeocodeOutcome, Geocoder};
use crate::shared::models::Result;

/// Resolves an address and ranks candidates by great-circle distance
#[derive(Clone)]
pub struct NearestKitchenRanker {
    geocoder: Arc<dyn Geocoder>,
}

impl NearestKitchenRanker {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// Up to `count` candidates nearest to `address`
    ///
    /// The caller has already rejected a blank address and an empty
    /// candidate set. An unresolvable address yields
    /// [`NearestOutcome::AddressNotFound`], never an empty ranking.
    pub async fn nearest(
        &self,
        address: &str,
        candidates: &[Kitchen],
        count: usize,
    ) -> Result<NearestOutcome> {
        let origin = match self.geocoder.resolve(address).await? {
            GeocodeOutcome::Resolved(location) => location,
            GeocodeOutcome::NotFound => {
                debug!(address, "Address did not resolve");
                return Ok(NearestOutcome::AddressNotFound);
            }
        };

        let skipped = candidates.iter().filter(|k| k.location.is_none()).count();
        if skipped > 0 {
            debug!(skipped, "Skipping kitchens without coordinates");
        }

        let kitchens = select_nearest(origin.point(), candidates, count);
        Ok(NearestOutcome::Ranked { origin, kitchens })
    }
}

//! Bulk import from a places feed

use kitchenmap_storage::KitchenStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::domain::{ImportReport, PlaceRecord};
use super::ports::PlacesSource;
use crate::features::kitchens::KitchenService;
use crate::features::ratings::RatingAggregator;
use crate::shared::models::{ErrorKind, KitchenmapError, Result};

#[derive(Clone)]
pub struct PlacesImporter {
    source: Arc<dyn PlacesSource>,
    store: Arc<dyn KitchenStore>,
    kitchens: KitchenService,
    aggregator: RatingAggregator,
}

impl PlacesImporter {
    pub fn new(
        source: Arc<dyn PlacesSource>,
        store: Arc<dyn KitchenStore>,
        kitchens: KitchenService,
        aggregator: RatingAggregator,
    ) -> Self {
        Self {
            source,
            store,
            kitchens,
            aggregator,
        }
    }

    /// Fetch places for `query` and store the new ones with their reviews
    pub async fn import(&self, query: &str) -> Result<ImportReport> {
        let query = query.trim();
        if query.is_empty() {
            return Err(KitchenmapError::invalid_input("Import query must not be blank"));
        }

        let places = self.source.search(query).await?;
        let mut report = ImportReport {
            places_seen: places.len(),
            ..Default::default()
        };

        for place in &places {
            self.import_place(place, &mut report).await?;
        }

        info!(
            query,
            created = report.kitchens_created,
            skipped = report.places_skipped,
            ratings = report.ratings_imported,
            "Places import finished"
        );
        Ok(report)
    }

    async fn import_place(&self, place: &PlaceRecord, report: &mut ImportReport) -> Result<()> {
        let Some(new_kitchen) = place.to_new_kitchen() else {
            debug!("Skipping nameless place");
            report.places_skipped += 1;
            return Ok(());
        };
        if self
            .store
            .find_kitchen_by_name(&new_kitchen.name)
            .await?
            .is_some()
        {
            debug!(name = %new_kitchen.name, "Skipping existing kitchen");
            report.places_skipped += 1;
            return Ok(());
        }

        let kitchen = match self.kitchens.add_kitchen(new_kitchen).await {
            Ok(kitchen) => kitchen,
            Err(e) if matches!(e.kind, ErrorKind::InvalidInput | ErrorKind::Conflict) => {
                warn!(error = %e, "Skipping place");
                report.places_skipped += 1;
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        report.kitchens_created += 1;

        for review in &place.reviews {
            match review.to_new_rating(kitchen.id) {
                Some(rating) => {
                    self.aggregator.add_rating(rating).await?;
                    report.ratings_imported += 1;
                }
                None => {
                    warn!(
                        kitchen_id = kitchen.id,
                        score = ?review.rating,
                        "Skipping review without a valid score"
                    );
                    report.reviews_skipped += 1;
                }
            }
        }
        Ok(())
    }
}

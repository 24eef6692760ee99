//! Places import against a canned feed

mod common;

use async_trait::async_trait;
use common::Harness;
use kitchenmap_core::features::ingestion::PlaceRecord;
use kitchenmap_core::{ErrorKind, ImportReport, PlacesImporter, PlacesSource, Result};
use kitchenmap_storage::KitchenStore;
use pretty_assertions::assert_eq;
use std::sync::Arc;

struct CannedPlaces(Vec<PlaceRecord>);

#[async_trait]
impl PlacesSource for CannedPlaces {
    async fn search(&self, _query: &str) -> Result<Vec<PlaceRecord>> {
        Ok(self.0.clone())
    }
}

const FEED: &str = r#"[
    {"displayName": {"text": "Holy Apostles Soup Kitchen"},
     "formattedAddress": "296 9th Ave, New York, NY 10001, USA",
     "location": {"latitude": 40.7497, "longitude": -73.9993},
     "rating": 1.0,
     "reviews": [
        {"rating": 5, "text": {"text": "Great"}},
        {"rating": 4},
        {"rating": 9}
     ]},
    {"displayName": {"text": "KitchenA"},
     "formattedAddress": "2920 Broadway"},
    {"formattedAddress": "nameless"},
    {"displayName": {"text": "Xavier Mission"},
     "formattedAddress": "55 W 15th St, New York, NY 10011, USA"}
]"#;

fn importer(h: &Harness) -> PlacesImporter {
    let places: Vec<PlaceRecord> = serde_json::from_str(FEED).unwrap();
    PlacesImporter::new(
        Arc::new(CannedPlaces(places)),
        h.store.clone(),
        h.kitchens.clone(),
        h.aggregator.clone(),
    )
}

#[tokio::test]
async fn test_import_creates_new_places_with_reviews() {
    let h = Harness::new();
    h.seed_three().await;

    let report = importer(&h).import("soup kitchen in New York City").await.unwrap();

    assert_eq!(
        report,
        ImportReport {
            places_seen: 4,
            kitchens_created: 2,
            places_skipped: 2,
            ratings_imported: 2,
            reviews_skipped: 1,
        }
    );

    // Average comes from the imported reviews, not the feed's own rating
    let holy = h
        .kitchens
        .get_kitchen_by_name("Holy Apostles Soup Kitchen")
        .await
        .unwrap();
    assert_eq!(holy.average_rating, Some(4.5));
    assert_eq!(h.store.list_ratings_for_kitchen(holy.id).await.unwrap().len(), 2);

    let xavier = h.kitchens.get_kitchen_by_name("Xavier Mission").await.unwrap();
    assert_eq!(xavier.average_rating, None);
    assert_eq!(xavier.location, None);
}

#[tokio::test]
async fn test_reimport_skips_existing() {
    let h = Harness::new();
    let importer = importer(&h);
    importer.import("soup").await.unwrap();

    let report = importer.import("soup").await.unwrap();
    assert_eq!(report.kitchens_created, 0);
    assert_eq!(report.places_skipped, 4);
    assert_eq!(h.store.stats().await.unwrap().total_ratings, 2);
}

#[tokio::test]
async fn test_blank_query_rejected() {
    let h = Harness::new();
    let err = importer(&h).import("  ").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}

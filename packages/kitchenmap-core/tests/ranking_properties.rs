//! Property-based tests for distance and ranking
//!
//! Checks the selection guarantees over randomly generated candidate sets
//! rather than hand-picked fixtures.

use chrono::Utc;
use kitchenmap_core::distance_km;
use kitchenmap_core::features::ranking::{by_rating_desc, select_nearest, top_rated};
use kitchenmap_core::features::ratings::mean_score;
use kitchenmap_storage::{GeoPoint, Kitchen};
use proptest::prelude::*;
use std::cmp::Ordering;

// Strategy for points anywhere on the globe
fn point() -> impl Strategy<Value = GeoPoint> {
    (-90.0..=90.0f64, -180.0..=180.0f64).prop_map(|(lat, lng)| GeoPoint::new(lat, lng))
}

// Strategy for candidates, some without a coordinate and some unrated
fn candidates() -> impl Strategy<Value = Vec<Kitchen>> {
    prop::collection::vec(
        (
            prop::option::weighted(0.8, point()),
            prop::option::of(1.0..=5.0f64),
        ),
        0..30,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (location, average_rating))| kitchen(i as i64 + 1, location, average_rating))
            .collect()
    })
}

fn kitchen(id: i64, location: Option<GeoPoint>, average_rating: Option<f64>) -> Kitchen {
    Kitchen {
        id,
        name: format!("Kitchen {id}"),
        address: format!("{id} Main St"),
        contact_phone: None,
        location,
        average_rating,
        operating_hours: None,
        operational_status: None,
        accessibility_features: None,
        version: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

proptest! {
    /// Property: distance is symmetric and never negative
    #[test]
    fn prop_distance_symmetric(a in point(), b in point()) {
        let ab = distance_km(a, b);
        let ba = distance_km(b, a);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-6, "{ab} != {ba}");
        // Half the Earth's circumference bounds every great-circle distance
        prop_assert!(ab <= std::f64::consts::PI * 6371.0 + 1e-6);
    }

    /// Property: a point is at distance zero from itself
    #[test]
    fn prop_distance_identity(a in point()) {
        prop_assert!(distance_km(a, a).abs() < 1e-9);
    }

    /// Property: nearest-k returns min(k, coordinated) kitchens, nearest first
    #[test]
    fn prop_nearest_count_and_order(
        origin in point(),
        kitchens in candidates(),
        count in 0..40usize
    ) {
        let ranked = select_nearest(origin, &kitchens, count);
        let coordinated = kitchens.iter().filter(|k| k.location.is_some()).count();

        prop_assert_eq!(ranked.len(), count.min(coordinated));
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].distance_km <= pair[1].distance_km);
        }
    }

    /// Property: no excluded coordinated kitchen is closer than the farthest selected one
    #[test]
    fn prop_nearest_excludes_only_farther(
        origin in point(),
        kitchens in candidates(),
        count in 1..10usize
    ) {
        let ranked = select_nearest(origin, &kitchens, count);
        if let Some(farthest) = ranked.last() {
            for k in &kitchens {
                let Some(location) = k.location else { continue };
                if ranked.iter().any(|r| r.kitchen.id == k.id) {
                    continue;
                }
                prop_assert!(distance_km(origin, location) >= farthest.distance_km);
            }
        }
    }

    /// Property: top-k is sorted by average with unrated kitchens last
    #[test]
    fn prop_top_rated_ordering(kitchens in candidates(), count in 0..40usize) {
        let top = top_rated(kitchens.clone(), count);

        prop_assert_eq!(top.len(), count.min(kitchens.len()));
        for pair in top.windows(2) {
            prop_assert_ne!(by_rating_desc(&pair[0], &pair[1]), Ordering::Greater);
        }
        if top.iter().any(|k| k.average_rating.is_none()) {
            // Every rated kitchen must have made the cut
            let rated = kitchens.iter().filter(|k| k.average_rating.is_some()).count();
            prop_assert_eq!(top.iter().filter(|k| k.average_rating.is_some()).count(), rated);
        }
    }

    /// Property: the mean of valid scores stays within the score range
    #[test]
    fn prop_mean_within_range(scores in prop::collection::vec(1..=5i32, 1..50)) {
        let mean = mean_score(scores.iter().copied());
        let expected = scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64;
        prop_assert!((1.0..=5.0).contains(&mean));
        prop_assert!((mean - expected).abs() < 1e-9);
    }
}

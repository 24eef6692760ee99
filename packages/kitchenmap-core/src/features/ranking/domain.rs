//! Ranking domain: nearest-k and top-k selection over an in-memory candidate set

use kitchenmap_storage::{GeoPoint, Kitchen};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::features::geo::{distance_km, UserLocation};

/// Kitchen paired with its distance from the query origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyKitchen {
    pub kitchen: Kitchen,
    pub distance_km: f64,
}

/// Result of a nearest-kitchen query
#[derive(Debug, Clone, PartialEq)]
pub enum NearestOutcome {
    Ranked {
        origin: UserLocation,
        kitchens: Vec<NearbyKitchen>,
    },
    /// The geocoder found no match for the address
    AddressNotFound,
}

/// The `count` candidates closest to `origin`, nearest first
///
/// Candidates without a stored coordinate are skipped. Equal distances keep
/// their input order.
pub fn select_nearest(
    origin: GeoPoint,
    candidates: &[Kitchen],
    count: usize,
) -> Vec<NearbyKitchen> {
    if count == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<NearbyKitchen> = candidates
        .iter()
        .filter_map(|kitchen| {
            kitchen.location.map(|point| NearbyKitchen {
                kitchen: kitchen.clone(),
                distance_km: distance_km(origin, point),
            })
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(count);
    ranked
}

/// Highest average first; unrated kitchens after every rated one
pub fn by_rating_desc(a: &Kitchen, b: &Kitchen) -> Ordering {
    match (a.average_rating, b.average_rating) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The `count` best-rated candidates; ties keep input order
pub fn top_rated(mut candidates: Vec<Kitchen>, count: usize) -> Vec<Kitchen> {
    candidates.sort_by(by_rating_desc);
    candidates.truncate(count);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn kitchen(id: i64, location: Option<(f64, f64)>, average: Option<f64>) -> Kitchen {
        Kitchen {
            id,
            name: format!("Kitchen {id}"),
            address: format!("{id} Main St"),
            contact_phone: None,
            location: location.map(|(lat, lng)| GeoPoint::new(lat, lng)),
            average_rating: average,
            operating_hours: None,
            operational_status: None,
            accessibility_features: None,
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ids<T>(items: &[T], id: impl Fn(&T) -> i64) -> Vec<i64> {
        items.iter().map(id).collect()
    }

    #[test]
    fn test_nearest_orders_by_distance() {
        let origin = GeoPoint::new(40.8075, -73.9626);
        let candidates = vec![
            kitchen(1, Some((40.71, -74.01)), None),
            kitchen(2, Some((40.81, -73.96)), None),
            kitchen(3, Some((40.75, -73.99)), None),
        ];

        let ranked = select_nearest(origin, &candidates, 3);
        assert_eq!(ids(&ranked, |n| n.kitchen.id), vec![2, 3, 1]);
        assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn test_nearest_count_edges() {
        let origin = GeoPoint::new(0.0, 0.0);
        let candidates = vec![
            kitchen(1, Some((1.0, 1.0)), None),
            kitchen(2, Some((2.0, 2.0)), None),
        ];

        assert!(select_nearest(origin, &candidates, 0).is_empty());
        assert_eq!(select_nearest(origin, &candidates, 1).len(), 1);
        assert_eq!(select_nearest(origin, &candidates, 10).len(), 2);
    }

    #[test]
    fn test_nearest_ties_keep_input_order() {
        let origin = GeoPoint::new(0.0, 0.0);
        let candidates = vec![
            kitchen(7, Some((1.0, 0.0)), None),
            kitchen(3, Some((-1.0, 0.0)), None),
            kitchen(5, Some((0.0, 1.0)), None),
        ];

        let ranked = select_nearest(origin, &candidates, 3);
        assert_eq!(ids(&ranked, |n| n.kitchen.id), vec![7, 3, 5]);
    }

    #[test]
    fn test_nearest_skips_uncoordinated() {
        let origin = GeoPoint::new(0.0, 0.0);
        let candidates = vec![kitchen(1, None, None), kitchen(2, Some((5.0, 5.0)), None)];

        let ranked = select_nearest(origin, &candidates, 2);
        assert_eq!(ids(&ranked, |n| n.kitchen.id), vec![2]);
    }

    #[test]
    fn test_top_rated() {
        let candidates = vec![
            kitchen(1, None, Some(3.0)),
            kitchen(2, None, None),
            kitchen(3, None, Some(4.5)),
            kitchen(4, None, Some(3.0)),
        ];

        let top = top_rated(candidates.clone(), 10);
        assert_eq!(ids(&top, |k| k.id), vec![3, 1, 4, 2]);

        let top = top_rated(candidates, 2);
        assert_eq!(ids(&top, |k| k.id), vec![3, 1]);
    }

    #[test]
    fn test_top_rated_zero_count() {
        assert!(top_rated(vec![kitchen(1, None, Some(5.0))], 0).is_empty());
    }
}

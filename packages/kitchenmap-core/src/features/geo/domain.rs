//! Geographic domain: resolved locations and great-circle distance

use kitchenmap_storage::GeoPoint;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by [`distance_km`]
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Address resolved by a geocoder. Ephemeral: consumed by the caller, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
}

impl UserLocation {
    pub fn new(latitude: f64, longitude: f64, formatted_address: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            formatted_address: formatted_address.into(),
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Geocoder result. `NotFound` is a legitimate outcome (unresolvable address),
/// not a failure; failures travel as `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Resolved(UserLocation),
    NotFound,
}

impl GeocodeOutcome {
    pub fn into_location(self) -> Option<UserLocation> {
        match self {
            GeocodeOutcome::Resolved(location) => Some(location),
            GeocodeOutcome::NotFound => None,
        }
    }
}

/// Haversine great-circle distance in kilometers (inputs in degrees)
///
/// Symmetric, zero for identical points, never negative.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

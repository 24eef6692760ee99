//! Geolocation
//!
//! # Hexagonal Architecture
//! ```text
//! ports/ (Geocoder)
//!           ↓
//! domain/ (UserLocation, distance_km)
//!           ↓
//! infrastructure/ (Google Geocoding API, fixed table)
//! ```

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{distance_km, GeocodeOutcome, UserLocation, EARTH_RADIUS_KM};
pub use infrastructure::{FixedGeocoder, GoogleGeocoder};
pub use ports::Geocoder;

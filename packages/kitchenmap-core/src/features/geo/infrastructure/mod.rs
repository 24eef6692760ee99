//! Geocoder adapters

pub mod fixed;
pub mod google;

pub use fixed::FixedGeocoder;
pub use google::GoogleGeocoder;

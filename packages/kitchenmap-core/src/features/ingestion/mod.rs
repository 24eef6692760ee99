//! Places ingestion
//!
//! Pulls kitchens and their reviews from an external places feed.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::PlacesImporter;
pub use domain::{ImportReport, PlaceRecord, PlaceReview};
pub use infrastructure::GooglePlacesClient;
pub use ports::PlacesSource;

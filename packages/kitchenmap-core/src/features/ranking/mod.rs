//! Kitchen ranking: nearest to an address, best rated

pub mod application;
pub mod domain;

pub use application::NearestKitchenRanker;
pub use domain::{by_rating_desc, select_nearest, top_rated, NearbyKitchen, NearestOutcome};

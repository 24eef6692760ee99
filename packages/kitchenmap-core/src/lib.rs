//! Kitchenmap core
//!
//! Directory of charity kitchens: where they are, how people rate them, and
//! which ones are nearest to an address.
//!
//! ## Features
//!
//! - `geo`: address resolution and great-circle distance
//! - `ranking`: nearest-k and top-rated selection
//! - `ratings`: rating writes that keep each kitchen's average current
//! - `kitchens`: the kitchen directory
//! - `users`: accounts, hashed credentials, derived tiers
//! - `ingestion`: bulk import from a places feed
//! - `recommendation`: language-model recommendations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kitchenmap_core::features::geo::FixedGeocoder;
//! use kitchenmap_core::{KitchenService, RatingAggregator};
//! use kitchenmap_storage::{InMemoryKitchenStore, KitchenStore, NewKitchen};
//!
//! let store: Arc<dyn KitchenStore> = Arc::new(InMemoryKitchenStore::new());
//! let geocoder = Arc::new(FixedGeocoder::new().with("Columbia University", 40.8075, -73.9626));
//! let aggregator = RatingAggregator::new(store.clone());
//! let kitchens = KitchenService::new(store, geocoder, aggregator);
//!
//! kitchens.add_kitchen(NewKitchen::new("Kitchen A", "2920 Broadway")).await?;
//! let nearest = kitchens.nearest_kitchens("Columbia University", 3).await?;
//! ```

pub mod config;
pub mod features;
pub mod shared;

pub use config::{AppConfig, ConfigError};
pub use shared::models::{ErrorKind, KitchenmapError, Result};

pub use features::geo::{distance_km, GeocodeOutcome, Geocoder, UserLocation};
pub use features::ingestion::{ImportReport, PlacesImporter, PlacesSource};
pub use features::kitchens::KitchenService;
pub use features::ranking::{NearbyKitchen, NearestKitchenRanker, NearestOutcome};
pub use features::ratings::{RatingAggregator, NO_WAIT_DATA};
pub use features::recommendation::{
    Recommendation, RecommendationModel, RecommendationRequest, RecommendationService,
};
pub use features::users::{UserProfile, UserService, UserTier};

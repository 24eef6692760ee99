//! Shared application state

use std::sync::Arc;

use kitchenmap_core::features::geo::GoogleGeocoder;
use kitchenmap_core::features::ingestion::GooglePlacesClient;
use kitchenmap_core::features::recommendation::OpenAiChatModel;
use kitchenmap_core::{
    AppConfig, Geocoder, KitchenService, PlacesImporter, PlacesSource, RatingAggregator,
    RecommendationModel, RecommendationService, Result, UserService,
};
use kitchenmap_storage::{InMemoryKitchenStore, KitchenStore, SqliteKitchenStore};
use tracing::info;

pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn KitchenStore>,
    pub kitchens: KitchenService,
    pub ratings: RatingAggregator,
    pub users: UserService,
    pub importer: PlacesImporter,
    pub recommender: RecommendationService,
}

impl AppState {
    /// Open the configured store and build the Google/OpenAI collaborators
    pub fn from_config(config: AppConfig) -> Result<Arc<Self>> {
        let store: Arc<dyn KitchenStore> = if config.database.is_in_memory() {
            info!("Using in-memory store");
            Arc::new(InMemoryKitchenStore::new())
        } else {
            info!(path = %config.database.path, "Opening SQLite store");
            Arc::new(SqliteKitchenStore::open(&config.database.path)?)
        };

        let geocoder = Arc::new(GoogleGeocoder::new(config.geocoding.clone())?);
        let places = Arc::new(GooglePlacesClient::new(config.places.clone())?);
        let model = Arc::new(OpenAiChatModel::new(config.recommendation.clone())?);

        Ok(Self::with_collaborators(config, store, geocoder, places, model))
    }

    pub fn with_collaborators(
        config: AppConfig,
        store: Arc<dyn KitchenStore>,
        geocoder: Arc<dyn Geocoder>,
        places: Arc<dyn PlacesSource>,
        model: Arc<dyn RecommendationModel>,
    ) -> Arc<Self> {
        let ratings = RatingAggregator::new(store.clone())
            .with_max_conflict_retries(config.ratings.max_conflict_retries);
        let kitchens = KitchenService::new(store.clone(), geocoder.clone(), ratings.clone());
        let users = UserService::new(store.clone(), ratings.clone());
        let importer =
            PlacesImporter::new(places, store.clone(), kitchens.clone(), ratings.clone());
        let recommender = RecommendationService::new(store.clone(), geocoder, model);

        Arc::new(Self {
            config,
            store,
            kitchens,
            ratings,
            users,
            importer,
            recommender,
        })
    }
}

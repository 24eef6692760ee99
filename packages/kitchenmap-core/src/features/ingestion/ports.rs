use async_trait::async_trait;

use super::domain::PlaceRecord;
use crate::shared::models::Result;

/// Source of place records for a text query
#[async_trait]
pub trait PlacesSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<PlaceRecord>>;
}

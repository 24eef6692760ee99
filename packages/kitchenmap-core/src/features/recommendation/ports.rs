use async_trait::async_trait;

use crate::shared::models::Result;

/// Text completion model; its ranking logic is opaque to the caller
#[async_trait]
pub trait RecommendationModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

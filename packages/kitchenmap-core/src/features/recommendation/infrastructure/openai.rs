//! OpenAI chat-completions adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::RecommendationConfig;
use crate::features::recommendation::ports::RecommendationModel;
use crate::shared::models::{KitchenmapError, Result};

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiChatModel {
    client: Client,
    config: RecommendationConfig,
}

impl OpenAiChatModel {
    pub fn new(config: RecommendationConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl RecommendationModel for OpenAiChatModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let key = self.config.require_api_key()?;

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Requesting completion");
        let completion: ChatCompletion = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(key)
            .json(&json!({
                "model": self.config.model,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        first_content(completion)
    }
}

fn first_content(completion: ChatCompletion) -> Result<String> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| KitchenmapError::external_service("Model returned no completion"))
}

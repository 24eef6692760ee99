//! Kitchen recommendations from an external language model

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::RecommendationService;
pub use domain::{render_prompt, Recommendation, RecommendationRequest};
pub use infrastructure::OpenAiChatModel;
pub use ports::RecommendationModel;

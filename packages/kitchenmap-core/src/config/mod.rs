//! Configuration System
//!
//! One `AppConfig` with a section per collaborator. Values come from defaults,
//! an optional YAML file and environment overrides, in that order.
//!
//! # Examples
//!
//! ```rust,ignore
//! use kitchenmap_core::config::AppConfig;
//!
//! // Defaults + KITCHENMAP_CONFIG + env overrides, validated
//! let config = AppConfig::from_env()?;
//!
//! // Explicit file, no env
//! let config = AppConfig::from_yaml("kitchenmap.yaml")?;
//! ```

pub mod app_config;
pub mod error;
pub mod validation;

pub use app_config::{
    AppConfig, DatabaseConfig, GeocodingConfig, PlacesConfig, RatingsConfig,
    RecommendationConfig, ServerConfig, CONFIG_PATH_ENV, IN_MEMORY_DATABASE,
};
pub use error::{ConfigError, ConfigResult};
pub use validation::Validatable;

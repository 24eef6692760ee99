//! Application configuration
//!
//! Resolution order (later wins):
//! 1. Built-in defaults
//! 2. YAML file named by `KITCHENMAP_CONFIG` (or passed to [`AppConfig::from_yaml`])
//! 3. Environment overrides (`KITCHENMAP_PORT`, `GOOGLE_MAPS_API_KEY`, ...)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::error::{ConfigError, ConfigResult};
use super::validation::{check_not_empty, check_range, Validatable};

pub const CONFIG_PATH_ENV: &str = "KITCHENMAP_CONFIG";

/// Database path value selecting an in-memory SQLite database
pub const IN_MEMORY_DATABASE: &str = ":memory:";

// ═══════════════════════════════════════════════════════════════════════════
// Sections
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_not_empty("server.host", &self.host)?;
        check_range("server.port", self.port, 1, u16::MAX, "Port 0 cannot be bound")
    }

    fn config_name(&self) -> &'static str {
        "ServerConfig"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "kitchenmap.db".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_DATABASE
    }
}

impl Validatable for DatabaseConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_not_empty("database.path", &self.path)
    }

    fn config_name(&self) -> &'static str {
        "DatabaseConfig"
    }
}

/// Google Geocoding API client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeocodingConfig {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub http_timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            api_key: None,
            http_timeout_secs: 10,
        }
    }
}

impl GeocodingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn require_api_key(&self) -> ConfigResult<&str> {
        require_key(
            &self.api_key,
            "geocoding",
            "GOOGLE_MAPS_API_KEY",
            "geocoding.api_key",
        )
    }
}

impl Validatable for GeocodingConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_not_empty("geocoding.base_url", &self.base_url)?;
        check_timeout("geocoding.http_timeout_secs", self.http_timeout_secs)
    }

    fn config_name(&self) -> &'static str {
        "GeocodingConfig"
    }
}

/// Google Places (text search) client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacesConfig {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub http_timeout_secs: u64,
    /// Text query used when an import request names none
    pub default_query: String,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://places.googleapis.com/v1/places:searchText".to_string(),
            api_key: None,
            http_timeout_secs: 10,
            default_query: "soup kitchen in New York City".to_string(),
        }
    }
}

impl PlacesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn require_api_key(&self) -> ConfigResult<&str> {
        require_key(
            &self.api_key,
            "places",
            "GOOGLE_PLACES_API_KEY",
            "places.api_key",
        )
    }
}

impl Validatable for PlacesConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_not_empty("places.base_url", &self.base_url)?;
        check_not_empty("places.default_query", &self.default_query)?;
        check_timeout("places.http_timeout_secs", self.http_timeout_secs)
    }

    fn config_name(&self) -> &'static str {
        "PlacesConfig"
    }
}

/// Chat-completions model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecommendationConfig {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub http_timeout_secs: u64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            http_timeout_secs: 30,
        }
    }
}

impl RecommendationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn require_api_key(&self) -> ConfigResult<&str> {
        require_key(
            &self.api_key,
            "recommendation",
            "OPENAI_API_KEY",
            "recommendation.api_key",
        )
    }
}

impl Validatable for RecommendationConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_not_empty("recommendation.base_url", &self.base_url)?;
        check_not_empty("recommendation.model", &self.model)?;
        check_timeout("recommendation.http_timeout_secs", self.http_timeout_secs)
    }

    fn config_name(&self) -> &'static str {
        "RecommendationConfig"
    }
}

/// Rating aggregate settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RatingsConfig {
    /// Re-reads allowed after a kitchen version conflict before giving up
    pub max_conflict_retries: u32,
}

impl Default for RatingsConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: 3,
        }
    }
}

impl Validatable for RatingsConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_range(
            "ratings.max_conflict_retries",
            self.max_conflict_retries,
            0,
            16,
            "Each retry re-reads the kitchen and its ratings",
        )
    }

    fn config_name(&self) -> &'static str {
        "RatingsConfig"
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// AppConfig
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub geocoding: GeocodingConfig,
    pub places: PlacesConfig,
    pub recommendation: RecommendationConfig,
    pub ratings: RatingsConfig,
}

impl AppConfig {
    /// Load a YAML file (missing sections take defaults); no env overrides
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Defaults, then `KITCHENMAP_CONFIG`, then environment overrides, validated
    pub fn from_env() -> ConfigResult<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable lookup
    pub fn load_with<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_ENV) {
            Some(path) if !path.trim().is_empty() => Self::from_yaml(path.trim())?,
            _ => Self::default(),
        };
        config.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of the current values
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("KITCHENMAP_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("KITCHENMAP_PORT") {
            self.server.port = parse_env("KITCHENMAP_PORT", &port)?;
        }
        if let Some(path) = get("KITCHENMAP_DATABASE") {
            self.database.path = path;
        }
        if let Some(key) = get("GOOGLE_MAPS_API_KEY") {
            self.geocoding.api_key = Some(key);
        }
        match get("GOOGLE_PLACES_API_KEY") {
            Some(key) => self.places.api_key = Some(key),
            None if self.places.api_key.is_none() => {
                self.places.api_key = self.geocoding.api_key.clone();
            }
            None => {}
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.recommendation.api_key = Some(key);
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.recommendation.model = model;
        }
        if let Some(timeout) = get("KITCHENMAP_HTTP_TIMEOUT_SECS") {
            let secs: u64 = parse_env("KITCHENMAP_HTTP_TIMEOUT_SECS", &timeout)?;
            self.geocoding.http_timeout_secs = secs;
            self.places.http_timeout_secs = secs;
            self.recommendation.http_timeout_secs = secs;
        }
        Ok(())
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.geocoding.validate()?;
        self.places.validate()?;
        self.recommendation.validate()?;
        self.ratings.validate()
    }

    fn config_name(&self) -> &'static str {
        "AppConfig"
    }
}

fn check_timeout(field: &str, secs: u64) -> ConfigResult<()> {
    check_range(field, secs, 1, 120, "Outbound calls need a bounded timeout")
}

fn require_key<'a>(
    key: &'a Option<String>,
    service: &str,
    env_var: &str,
    field: &str,
) -> ConfigResult<&'a str> {
    key.as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ConfigError::missing_credential(service, env_var, field))
}

fn parse_env<T>(var: &str, value: &str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: ToString,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid_env(var, value, e))
}

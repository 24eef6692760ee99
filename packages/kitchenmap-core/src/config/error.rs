//! Configuration error types

use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Range validation error
    #[error("Invalid range for field '{field}': {value} not in {min}..={max}. {hint}")]
    Range {
        field: String,
        value: String,
        min: String,
        max: String,
        hint: String,
    },

    /// Required string left empty
    #[error("Field '{field}' must not be empty")]
    Empty { field: String },

    /// Environment override could not be parsed
    #[error("Environment variable {var}={value:?} is invalid: {reason}")]
    InvalidEnv {
        var: String,
        value: String,
        reason: String,
    },

    /// A client was used without its API credential
    #[error("No API key configured for {service}. Set {env_var} or '{field}' in the config file.")]
    MissingCredential {
        service: String,
        env_var: String,
        field: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create a range error with a hint
    pub fn range_with_hint(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
        hint: impl Into<String>,
    ) -> Self {
        Self::Range {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
            hint: hint.into(),
        }
    }

    pub fn empty(field: impl Into<String>) -> Self {
        Self::Empty {
            field: field.into(),
        }
    }

    pub fn invalid_env(
        var: impl Into<String>,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidEnv {
            var: var.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    pub fn missing_credential(
        service: impl Into<String>,
        env_var: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::MissingCredential {
            service: service.into(),
            env_var: env_var.into(),
            field: field.into(),
        }
    }
}

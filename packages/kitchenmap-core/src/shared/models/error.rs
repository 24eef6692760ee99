//! Error types for the kitchenmap-core crate
//!
//! Unified error handling across all features.
//!
//! Features:
//! - Categorized error kinds matching the caller-facing taxonomy
//!   (bad input, absent data, external failures)
//! - Optional entity context (`kitchen 12`, `rating 7`)
//! - Source error chaining

use kitchenmap_storage::StorageError;
use std::fmt;

/// Error kind categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-constraint caller arguments
    InvalidInput,
    /// Referenced entity absent, or address unresolvable
    NotFound,
    /// Query ran against an empty candidate set
    NoData,
    /// Duplicate key, or optimistic-concurrency retries exhausted
    Conflict,
    /// Credentials rejected
    Unauthorized,
    /// Geocoding, places or model call failed
    ExternalService,
    /// Persistence layer failure
    Storage,
    /// Configuration errors
    Config,
    /// Internal errors (bugs)
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::NoData => "no_data",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::ExternalService => "external_service",
            ErrorKind::Storage => "storage",
            ErrorKind::Config => "config",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Unified error type
#[derive(Debug)]
pub struct KitchenmapError {
    pub kind: ErrorKind,
    pub message: String,
    pub entity: Option<String>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl KitchenmapError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            entity: None,
            source: None,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoData, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn kitchen_not_found(kitchen_id: i64) -> Self {
        Self::not_found(format!("Kitchen not found: {}", kitchen_id))
            .with_entity(format!("kitchen {}", kitchen_id))
    }

    pub fn rating_not_found(rating_id: i64) -> Self {
        Self::not_found(format!("Rating not found: {}", rating_id))
            .with_entity(format!("rating {}", rating_id))
    }

    pub fn user_not_found(user_id: i64) -> Self {
        Self::not_found(format!("User not found: {}", user_id))
            .with_entity(format!("user {}", user_id))
    }
}

impl fmt::Display for KitchenmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)?;
        if let Some(ref entity) = self.entity {
            write!(f, " ({})", entity)?;
        }
        Ok(())
    }
}

impl std::error::Error for KitchenmapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, KitchenmapError>;

// Storage error conversion
impl From<StorageError> for KitchenmapError {
    fn from(err: StorageError) -> Self {
        use kitchenmap_storage::ErrorKind as StorageKind;

        let kind = match err.kind {
            k if k.is_not_found() => ErrorKind::NotFound,
            StorageKind::VersionConflict | StorageKind::Duplicate => ErrorKind::Conflict,
            _ => ErrorKind::Storage,
        };
        KitchenmapError::new(kind, err.message.clone()).with_source(err)
    }
}

impl From<reqwest::Error> for KitchenmapError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("HTTP request timed out: {}", err)
        } else {
            format!("HTTP request failed: {}", err)
        };
        KitchenmapError::external_service(message).with_source(err)
    }
}

impl From<serde_json::Error> for KitchenmapError {
    fn from(err: serde_json::Error) -> Self {
        KitchenmapError::external_service(format!("Malformed JSON payload: {}", err))
            .with_source(err)
    }
}

impl From<crate::config::ConfigError> for KitchenmapError {
    fn from(err: crate::config::ConfigError) -> Self {
        KitchenmapError::config(err.to_string()).with_source(err)
    }
}

//! Error types for kitchenmap-storage

use std::fmt;
use thiserror::Error;

/// Storage error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Database errors (SQLite)
    Database,
    /// Serialization/deserialization errors
    Serialization,
    /// Kitchen not found
    KitchenNotFound,
    /// Rating not found
    RatingNotFound,
    /// User not found
    UserNotFound,
    /// Optimistic-concurrency check failed (kitchen version moved)
    VersionConflict,
    /// Unique constraint violated (kitchen name, username)
    Duplicate,
    /// Write rejected because it breaks a domain constraint
    Constraint,
    /// Transaction errors
    Transaction,
    /// Lock poisoned by a panicking writer
    Poisoned,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Database => "database",
            ErrorKind::Serialization => "serialization",
            ErrorKind::KitchenNotFound => "kitchen_not_found",
            ErrorKind::RatingNotFound => "rating_not_found",
            ErrorKind::UserNotFound => "user_not_found",
            ErrorKind::VersionConflict => "version_conflict",
            ErrorKind::Duplicate => "duplicate",
            ErrorKind::Constraint => "constraint",
            ErrorKind::Transaction => "transaction",
            ErrorKind::Poisoned => "poisoned",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorKind::KitchenNotFound | ErrorKind::RatingNotFound | ErrorKind::UserNotFound
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct StorageError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl StorageError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    pub fn kitchen_not_found(kitchen_id: i64) -> Self {
        Self::new(
            ErrorKind::KitchenNotFound,
            format!("Kitchen not found: {}", kitchen_id),
        )
    }

    pub fn rating_not_found(rating_id: i64) -> Self {
        Self::new(
            ErrorKind::RatingNotFound,
            format!("Rating not found: {}", rating_id),
        )
    }

    pub fn user_not_found(user_id: i64) -> Self {
        Self::new(
            ErrorKind::UserNotFound,
            format!("User not found: {}", user_id),
        )
    }

    pub fn version_conflict(kitchen_id: i64, expected: u64, found: u64) -> Self {
        Self::new(
            ErrorKind::VersionConflict,
            format!(
                "Kitchen {} changed concurrently: expected version {}, found {}",
                kitchen_id, expected, found
            ),
        )
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Duplicate, message)
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Constraint, message)
    }

    pub fn transaction(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transaction, message)
    }
}

// SQLite error conversions
#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
            if failure.code == rusqlite::ErrorCode::ConstraintViolation {
                return StorageError::constraint(format!("SQLite constraint: {}", err))
                    .with_source(err);
            }
        }
        StorageError::database(format!("SQLite error: {}", err)).with_source(err)
    }
}

// JSON error conversions
impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::serialization(format!("JSON error: {}", err)).with_source(err)
    }
}

// Lock poisoning (Arc<Mutex<Connection>>, Arc<RwLock<..>>)
impl<T> From<std::sync::PoisonError<T>> for StorageError {
    fn from(_err: std::sync::PoisonError<T>) -> Self {
        StorageError::new(ErrorKind::Poisoned, "Store lock poisoned")
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StorageError>;

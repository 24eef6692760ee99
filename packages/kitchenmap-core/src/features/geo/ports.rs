//! Geocoder port

use async_trait::async_trait;

use super::domain::GeocodeOutcome;
use crate::shared::models::Result;

/// Translates free text into a location
///
/// Implementations make no attempt to cache or retry; every call resolves
/// afresh. Callers reject blank input before calling.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<GeocodeOutcome>;
}

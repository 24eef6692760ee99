//! Record models
//!
//! Identities are assigned by the store on insert; nothing in the process
//! hands out ids on its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type KitchenId = i64;
pub type RatingId = i64;
pub type UserId = i64;

/// Lowest accepted rating score (inclusive)
pub const MIN_SCORE: i32 = 1;
/// Highest accepted rating score (inclusive)
pub const MAX_SCORE: i32 = 5;

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Kitchen
// ═══════════════════════════════════════════════════════════════════════════

/// Charity kitchen record
///
/// `average_rating` is derived: it is `None` until the first rating lands and
/// afterwards always equals the mean score of the kitchen's ratings (0.0 once
/// every rating has been removed). `version` moves on every aggregate write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kitchen {
    pub id: KitchenId,
    pub name: String,
    pub address: String,
    pub contact_phone: Option<String>,
    pub location: Option<GeoPoint>,
    pub average_rating: Option<f64>,
    pub operating_hours: Option<String>,
    pub operational_status: Option<String>,
    pub accessibility_features: Option<String>,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a kitchen (id, average and version are store-owned)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewKitchen {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub operational_status: Option<String>,
    #[serde(default)]
    pub accessibility_features: Option<String>,
}

impl NewKitchen {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(GeoPoint::new(latitude, longitude));
        self
    }
}

/// Partial kitchen update: `None` leaves the stored field untouched.
/// `clear_location` drops the stored coordinate when no new one is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KitchenPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub clear_location: bool,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub operational_status: Option<String>,
    #[serde(default)]
    pub accessibility_features: Option<String>,
}

impl KitchenPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.contact_phone.is_none()
            && self.location.is_none()
            && !self.clear_location
            && self.operating_hours.is_none()
            && self.operational_status.is_none()
            && self.accessibility_features.is_none()
    }
}

impl Kitchen {
    /// Apply the present fields of `patch`. Average and version stay put.
    pub fn apply_patch(&mut self, patch: &KitchenPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(address) = &patch.address {
            self.address = address.clone();
        }
        if let Some(phone) = &patch.contact_phone {
            self.contact_phone = Some(phone.clone());
        }
        if patch.location.is_some() || patch.clear_location {
            self.location = patch.location;
        }
        if let Some(hours) = &patch.operating_hours {
            self.operating_hours = Some(hours.clone());
        }
        if let Some(status) = &patch.operational_status {
            self.operational_status = Some(status.clone());
        }
        if let Some(features) = &patch.accessibility_features {
            self.accessibility_features = Some(features.clone());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Rating
// ═══════════════════════════════════════════════════════════════════════════

/// User (or feed) feedback for a kitchen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: RatingId,
    pub kitchen_id: KitchenId,
    pub user_id: Option<UserId>,
    /// Denormalized rater display name
    pub user_name: Option<String>,
    /// Score in `MIN_SCORE..=MAX_SCORE`
    pub score: i32,
    pub comments: Option<String>,
    pub wait_time_secs: Option<u64>,
    pub comment_url: Option<String>,
    pub publish_time: Option<String>,
    pub relative_time: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a rating
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRating {
    pub kitchen_id: KitchenId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub score: i32,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub wait_time_secs: Option<u64>,
    #[serde(default)]
    pub comment_url: Option<String>,
    #[serde(default)]
    pub publish_time: Option<String>,
    #[serde(default)]
    pub relative_time: Option<String>,
}

impl NewRating {
    pub fn new(kitchen_id: KitchenId, score: i32) -> Self {
        Self {
            kitchen_id,
            score,
            ..Default::default()
        }
    }

    pub fn with_wait_time(mut self, secs: u64) -> Self {
        self.wait_time_secs = Some(secs);
        self
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Partial rating update. The owning kitchen is fixed for the rating's life.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingPatch {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub wait_time_secs: Option<u64>,
    #[serde(default)]
    pub comment_url: Option<String>,
    #[serde(default)]
    pub publish_time: Option<String>,
    #[serde(default)]
    pub relative_time: Option<String>,
}

impl Rating {
    /// Apply the present fields of `patch` and return the result
    pub fn patched(&self, patch: &RatingPatch) -> Rating {
        let mut next = self.clone();
        if let Some(user_id) = patch.user_id {
            next.user_id = Some(user_id);
        }
        if let Some(name) = &patch.user_name {
            next.user_name = Some(name.clone());
        }
        if let Some(score) = patch.score {
            next.score = score;
        }
        if let Some(comments) = &patch.comments {
            next.comments = Some(comments.clone());
        }
        if let Some(wait) = patch.wait_time_secs {
            next.wait_time_secs = Some(wait);
        }
        if let Some(url) = &patch.comment_url {
            next.comment_url = Some(url.clone());
        }
        if let Some(publish) = &patch.publish_time {
            next.publish_time = Some(publish.clone());
        }
        if let Some(relative) = &patch.relative_time {
            next.relative_time = Some(relative.clone());
        }
        next
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// User
// ═══════════════════════════════════════════════════════════════════════════

/// Persisted account role. Membership tiers are derived on read, not stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    #[default]
    Member,
    Manager,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Member => "member",
            AccountRole::Manager => "manager",
            AccountRole::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "member" | "user" | "" => Some(AccountRole::Member),
            "manager" | "role_manager" => Some(AccountRole::Manager),
            "admin" | "role_admin" => Some(AccountRole::Admin),
            _ => None,
        }
    }
}

/// Account record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Hashed credential, never the raw password
    pub password_hash: String,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a user
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: AccountRole,
    /// Account creation time; `None` means "now"
    pub created_at: Option<DateTime<Utc>>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Aggregate writes
// ═══════════════════════════════════════════════════════════════════════════

/// Rating mutation applied together with the kitchen aggregate
#[derive(Debug, Clone, PartialEq)]
pub enum RatingOp {
    Insert(NewRating),
    Replace(Rating),
    Delete(RatingId),
}

/// One optimistic-concurrency write: the op is applied and the kitchen's
/// average replaced only if the kitchen is still at `expected_version`.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingWrite {
    pub kitchen_id: KitchenId,
    pub expected_version: u64,
    pub average_rating: f64,
    pub op: RatingOp,
}

/// Result of a committed [`RatingWrite`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingWriteOutcome {
    /// Kitchen after the write (new average, bumped version)
    pub kitchen: Kitchen,
    /// Stored rating for inserts/replacements, `None` for deletes
    pub rating: Option<Rating>,
}

/// Row counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_kitchens: usize,
    pub total_ratings: usize,
    pub total_users: usize,
}

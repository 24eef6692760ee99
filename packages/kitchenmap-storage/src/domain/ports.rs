//! Record Store Port (Trait Interface)
//!
//! Port/Adapter pattern for backend flexibility:
//! - Production/local: SQLite (file-backed, zero-config)
//! - Testing: InMemory (fast unit tests)

use async_trait::async_trait;

use super::models::{
    Kitchen, KitchenId, KitchenPatch, NewKitchen, NewUser, Rating, RatingId, RatingWrite,
    RatingWriteOutcome, StoreStats, User, UserId,
};
use crate::Result;

/// Kitchen Store Port (Primary Interface)
///
/// All storage backends must implement this trait. Lookups return
/// `Ok(None)` for absent rows; mutations addressed at an absent row fail with
/// the matching `*NotFound` error kind.
#[async_trait]
pub trait KitchenStore: Send + Sync {
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Kitchens
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Insert a kitchen; the store assigns id, version 0 and no average
    ///
    /// Fails with `Duplicate` if a kitchen with the same name exists.
    async fn insert_kitchen(&self, kitchen: &NewKitchen) -> Result<Kitchen>;

    /// Get kitchen by ID
    async fn get_kitchen(&self, kitchen_id: KitchenId) -> Result<Option<Kitchen>>;

    /// Get kitchen by exact name
    async fn find_kitchen_by_name(&self, name: &str) -> Result<Option<Kitchen>>;

    /// Kitchens whose name contains `fragment` (case-insensitive), ascending id
    async fn find_kitchens_by_name_containing(&self, fragment: &str) -> Result<Vec<Kitchen>>;

    /// All kitchens, ascending id
    async fn list_kitchens(&self) -> Result<Vec<Kitchen>>;

    /// Up to `limit` kitchens by average rating descending
    ///
    /// Unrated kitchens come after every rated one; ties keep ascending id.
    async fn top_rated_kitchens(&self, limit: usize) -> Result<Vec<Kitchen>>;

    /// Apply a partial update (never touches average or version)
    async fn update_kitchen(&self, kitchen_id: KitchenId, patch: &KitchenPatch)
        -> Result<Kitchen>;

    /// Delete a kitchen and, explicitly, every rating referencing it
    ///
    /// Returns the number of ratings removed.
    async fn delete_kitchen(&self, kitchen_id: KitchenId) -> Result<usize>;

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Ratings
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Get rating by ID
    async fn get_rating(&self, rating_id: RatingId) -> Result<Option<Rating>>;

    /// All ratings, ascending id
    async fn list_ratings(&self) -> Result<Vec<Rating>>;

    /// Ratings owned by a kitchen, ascending id
    async fn list_ratings_for_kitchen(&self, kitchen_id: KitchenId) -> Result<Vec<Rating>>;

    /// Ratings attributed to a user, ascending id
    async fn list_ratings_for_user(&self, user_id: UserId) -> Result<Vec<Rating>>;

    /// Apply a rating mutation and the kitchen's new average atomically
    ///
    /// # Errors
    ///
    /// - `KitchenNotFound` if the kitchen is gone
    /// - `VersionConflict` if the kitchen's version is not `expected_version`
    /// - `RatingNotFound` if a replaced/deleted rating is gone or belongs to
    ///   another kitchen
    ///
    /// Nothing is written when an error is returned.
    async fn commit_rating_write(&self, write: &RatingWrite) -> Result<RatingWriteOutcome>;

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Users
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Insert a user; fails with `Duplicate` on a taken username
    async fn insert_user(&self, user: &NewUser) -> Result<User>;

    /// Get user by ID
    async fn get_user(&self, user_id: UserId) -> Result<Option<User>>;

    /// Get user by username
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Delete a user record
    ///
    /// Ratings still pointing at the user lose the reference; callers that
    /// want them gone delete them first so kitchen averages stay current.
    async fn delete_user(&self, user_id: UserId) -> Result<()>;

    /// Number of ratings attributed to a user
    async fn count_ratings_by_user(&self, user_id: UserId) -> Result<usize>;

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Statistics
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    async fn stats(&self) -> Result<StoreStats>;
}

/// Order used by `top_rated_kitchens`: average descending, unrated last,
/// then ascending id.
pub fn rating_order(a: &Kitchen, b: &Kitchen) -> std::cmp::Ordering {
    match (a.average_rating, b.average_rating) {
        (Some(x), Some(y)) => y.total_cmp(&x).then(a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}

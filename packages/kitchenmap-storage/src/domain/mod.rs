//! Domain layer for the kitchen record store
//!
//! # Domain Models
//!
//! - `Kitchen`: charity kitchen with a derived average rating and a version
//! - `Rating`: feedback owned by exactly one kitchen, optionally attributed to a user
//! - `User`: account with a hashed credential and a persisted role
//!
//! # Port Trait
//!
//! - `KitchenStore`: Primary storage abstraction
//!
//! # Examples
//!
//! ```rust,ignore
//! use kitchenmap_storage::domain::{KitchenStore, NewKitchen};
//!
//! async fn example(store: impl KitchenStore) -> Result<()> {
//!     let new = NewKitchen::new("Holy Apostles", "296 9th Ave").with_location(40.75, -73.99);
//!     let kitchen = store.insert_kitchen(&new).await?;
//!     let ratings = store.list_ratings_for_kitchen(kitchen.id).await?;
//!     assert!(ratings.is_empty());
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod ports;

pub use models::{
    AccountRole, GeoPoint, Kitchen, KitchenId, KitchenPatch, NewKitchen, NewRating, NewUser,
    Rating, RatingId, RatingOp, RatingPatch, RatingWrite, RatingWriteOutcome, StoreStats, User,
    UserId, MAX_SCORE, MIN_SCORE,
};
pub use ports::{rating_order, KitchenStore};

//! Kitchen record store
//!
//! Durable storage for kitchens, their ratings and user accounts.
//!
//! ## Core Principles
//!
//! 1. **Store-owned identity**: every id comes from the backend on insert
//! 2. **Explicit cascades**: deleting a kitchen bulk-deletes its ratings in the same transaction
//! 3. **Versioned aggregates**: a kitchen's average only changes through
//!    `commit_rating_write`, which checks the kitchen version before writing
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kitchenmap_storage::{KitchenStore, NewKitchen, NewRating, RatingOp, RatingWrite};
//! use kitchenmap_storage::infrastructure::SqliteKitchenStore;
//!
//! let store = SqliteKitchenStore::open("kitchens.db")?;
//! let kitchen = store.insert_kitchen(&NewKitchen::new("Bowery Mission", "227 Bowery")).await?;
//!
//! // Insert a rating and publish the kitchen's new average in one step
//! store.commit_rating_write(&RatingWrite {
//!     kitchen_id: kitchen.id,
//!     expected_version: kitchen.version,
//!     average_rating: 5.0,
//!     op: RatingOp::Insert(NewRating::new(kitchen.id, 5)),
//! }).await?;
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{ErrorKind, Result, StorageError};

pub use domain::{
    AccountRole, GeoPoint, Kitchen, KitchenId, KitchenPatch, KitchenStore, NewKitchen, NewRating,
    NewUser, Rating, RatingId, RatingOp, RatingPatch, RatingWrite, RatingWriteOutcome, StoreStats,
    User, UserId, MAX_SCORE, MIN_SCORE,
};

pub use infrastructure::InMemoryKitchenStore;
#[cfg(feature = "sqlite")]
pub use infrastructure::SqliteKitchenStore;

//! Infrastructure layer - Storage adapters
//!
//! - `memory`: HashMap-backed store for tests and ephemeral runs
//! - `sqlite`: file or in-memory SQLite database

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::InMemoryKitchenStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteKitchenStore;

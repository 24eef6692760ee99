//! User accounts
//!
//! Roles are persisted; tiers are derived on read. Token issuance and
//! authorization live outside this crate.

pub mod application;
pub mod domain;
pub mod password;

pub use application::UserService;
pub use domain::{months_between, UserProfile, UserTier};
pub use password::{hash_password, verify_password};

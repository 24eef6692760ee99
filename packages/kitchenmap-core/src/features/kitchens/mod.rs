//! Kitchen directory

pub mod application;
pub mod domain;

pub use application::KitchenService;
pub use domain::{checked_count, MAX_ACCESSIBILITY_LEN, MAX_ADDRESS_LEN, MAX_PHONE_LEN};

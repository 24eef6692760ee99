//! Shared models used across features

pub mod error;

pub use error::{ErrorKind, KitchenmapError, Result};

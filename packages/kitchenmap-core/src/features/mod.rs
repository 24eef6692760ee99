//! Feature modules
//!
//! Each feature follows the same layout: `domain` (pure types and rules),
//! `ports` (traits at the IO seams), `application` (use cases) and
//! `infrastructure` (adapters).

pub mod geo;
pub mod ingestion;
pub mod kitchens;
pub mod ranking;
pub mod ratings;
pub mod recommendation;
pub mod users;

//! Ratings and the derived kitchen aggregate
//!
//! `average_rating` always equals the mean score of the kitchen's ratings
//! after a completed write; `predicted_wait_time` averages wait samples.

pub mod application;
pub mod domain;

pub use application::{RatingAggregator, DEFAULT_MAX_CONFLICT_RETRIES};
pub use domain::{mean_score, predicted_wait, validate_score, NO_WAIT_DATA};

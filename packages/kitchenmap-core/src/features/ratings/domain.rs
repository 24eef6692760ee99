//! Rating aggregate rules

use kitchenmap_storage::{Rating, MAX_SCORE, MIN_SCORE};

use crate::shared::models::{KitchenmapError, Result};

/// Predicted wait time when no rating carries a sample
pub const NO_WAIT_DATA: f64 = -1.0;

pub fn validate_score(score: i32) -> Result<()> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(KitchenmapError::invalid_input(format!(
            "Rating must be between {} and {}, got {}",
            MIN_SCORE, MAX_SCORE, score
        )));
    }
    Ok(())
}

/// Arithmetic mean of `scores`; an empty set averages to 0.0
pub fn mean_score<I>(scores: I) -> f64
where
    I: IntoIterator<Item = i32>,
{
    let (sum, count) = scores
        .into_iter()
        .fold((0i64, 0u64), |(sum, count), s| (sum + i64::from(s), count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Mean of the present wait-time samples, or [`NO_WAIT_DATA`]
///
/// A sample of zero seconds is real data and counts toward the mean.
pub fn predicted_wait(ratings: &[Rating]) -> f64 {
    let samples: Vec<u64> = ratings.iter().filter_map(|r| r.wait_time_secs).collect();
    if samples.is_empty() {
        return NO_WAIT_DATA;
    }
    let total: f64 = samples.iter().map(|&s| s as f64).sum();
    total / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rating(score: i32, wait: Option<u64>) -> Rating {
        Rating {
            id: 1,
            kitchen_id: 1,
            user_id: None,
            user_name: None,
            score,
            comments: None,
            wait_time_secs: wait,
            comment_url: None,
            publish_time: None,
            relative_time: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_score_bounds() {
        assert!(validate_score(1).is_ok());
        assert!(validate_score(5).is_ok());
        assert!(validate_score(0).is_err());
        assert!(validate_score(6).is_err());
        assert!(validate_score(-3).is_err());
    }

    #[test]
    fn test_mean_score() {
        assert_eq!(mean_score([5, 4, 3]), 4.0);
        assert_eq!(mean_score([5, 4]), 4.5);
        assert_eq!(mean_score(Vec::<i32>::new()), 0.0);
        assert!((mean_score([5, 4, 1]) - 10.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_predicted_wait() {
        assert_eq!(predicted_wait(&[]), NO_WAIT_DATA);
        assert_eq!(predicted_wait(&[rating(3, None), rating(4, None)]), NO_WAIT_DATA);
        assert_eq!(
            predicted_wait(&[rating(3, Some(600)), rating(4, None), rating(5, Some(1200))]),
            900.0
        );
        // Zero is a sample, not "no data"
        assert_eq!(predicted_wait(&[rating(3, Some(0))]), 0.0);
    }
}

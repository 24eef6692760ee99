//! Rating Aggregator
//!
//! Every rating mutation recomputes the owning kitchen's average from the
//! full rating set and publishes both through one versioned store write. A
//! concurrent writer moves the kitchen version; the losing cycle re-reads and
//! recomputes, up to `max_conflict_retries` times.

use kitchenmap_storage::{
    ErrorKind as StorageKind, KitchenId, KitchenStore, NewRating, Rating, RatingId, RatingOp,
    RatingPatch, RatingWrite, RatingWriteOutcome, UserId,
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::domain::{mean_score, predicted_wait, validate_score};
use crate::shared::models::{KitchenmapError, Result};

pub const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;

#[derive(Clone)]
pub struct RatingAggregator {
    store: Arc<dyn KitchenStore>,
    max_conflict_retries: u32,
}

impl RatingAggregator {
    pub fn new(store: Arc<dyn KitchenStore>) -> Self {
        Self {
            store,
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
        }
    }

    pub fn with_max_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }

    /// Validate, insert and publish the new average
    ///
    /// A referenced user must exist; the rater name defaults to the username.
    pub async fn add_rating(&self, mut rating: NewRating) -> Result<RatingWriteOutcome> {
        validate_score(rating.score)?;
        if let Some(user_id) = rating.user_id {
            let user = self
                .store
                .get_user(user_id)
                .await?
                .ok_or_else(|| KitchenmapError::user_not_found(user_id))?;
            if rating.user_name.is_none() {
                rating.user_name = Some(user.username);
            }
        }

        let kitchen_id = rating.kitchen_id;
        self.commit(kitchen_id, |current| {
            let average = mean_score(
                current
                    .iter()
                    .map(|r| r.score)
                    .chain(std::iter::once(rating.score)),
            );
            Ok((RatingOp::Insert(rating.clone()), average))
        })
        .await
    }

    /// Apply the present fields of `patch` and republish the average
    pub async fn update_rating(
        &self,
        rating_id: RatingId,
        patch: &RatingPatch,
    ) -> Result<RatingWriteOutcome> {
        if let Some(score) = patch.score {
            validate_score(score)?;
        }
        if let Some(user_id) = patch.user_id {
            if self.store.get_user(user_id).await?.is_none() {
                return Err(KitchenmapError::user_not_found(user_id));
            }
        }

        let kitchen_id = self.get_rating(rating_id).await?.kitchen_id;
        self.commit(kitchen_id, |current| {
            let existing = current
                .iter()
                .find(|r| r.id == rating_id)
                .ok_or_else(|| KitchenmapError::rating_not_found(rating_id))?;
            let updated = existing.patched(patch);
            let average = mean_score(current.iter().map(|r| {
                if r.id == rating_id {
                    updated.score
                } else {
                    r.score
                }
            }));
            Ok((RatingOp::Replace(updated), average))
        })
        .await
    }

    /// Remove a rating; the last removal leaves an average of 0.0
    pub async fn delete_rating(&self, rating_id: RatingId) -> Result<RatingWriteOutcome> {
        let kitchen_id = self.get_rating(rating_id).await?.kitchen_id;
        self.commit(kitchen_id, |current| {
            if !current.iter().any(|r| r.id == rating_id) {
                return Err(KitchenmapError::rating_not_found(rating_id));
            }
            let average = mean_score(
                current
                    .iter()
                    .filter(|r| r.id != rating_id)
                    .map(|r| r.score),
            );
            Ok((RatingOp::Delete(rating_id), average))
        })
        .await
    }

    /// Delete every rating attributed to a user, one aggregate write each
    pub async fn delete_ratings_by_user(&self, user_id: UserId) -> Result<usize> {
        let ratings = self.store.list_ratings_for_user(user_id).await?;
        let mut removed = 0;
        for rating in ratings {
            match self.delete_rating(rating.id).await {
                Ok(_) => removed += 1,
                // Already gone (kitchen deleted meanwhile)
                Err(err) if err.kind == crate::shared::models::ErrorKind::NotFound => {}
                Err(err) => return Err(err),
            }
        }
        Ok(removed)
    }

    /// Mean wait-time sample in seconds, or -1.0 without samples
    pub async fn predicted_wait_time(&self, kitchen_id: KitchenId) -> Result<f64> {
        let ratings = self.ratings_for_kitchen(kitchen_id).await?;
        Ok(predicted_wait(&ratings))
    }

    pub async fn get_rating(&self, rating_id: RatingId) -> Result<Rating> {
        self.store
            .get_rating(rating_id)
            .await?
            .ok_or_else(|| KitchenmapError::rating_not_found(rating_id))
    }

    pub async fn list_ratings(&self) -> Result<Vec<Rating>> {
        Ok(self.store.list_ratings().await?)
    }

    pub async fn ratings_for_kitchen(&self, kitchen_id: KitchenId) -> Result<Vec<Rating>> {
        if self.store.get_kitchen(kitchen_id).await?.is_none() {
            return Err(KitchenmapError::kitchen_not_found(kitchen_id));
        }
        Ok(self.store.list_ratings_for_kitchen(kitchen_id).await?)
    }

    /// Read-compute-write cycle guarded by the kitchen version
    ///
    /// `build` sees the kitchen's current ratings and returns the mutation
    /// plus the average it produces.
    async fn commit<F>(&self, kitchen_id: KitchenId, build: F) -> Result<RatingWriteOutcome>
    where
        F: Fn(&[Rating]) -> Result<(RatingOp, f64)> + Send + Sync,
    {
        let mut attempt: u32 = 0;
        loop {
            let kitchen = self
                .store
                .get_kitchen(kitchen_id)
                .await?
                .ok_or_else(|| KitchenmapError::kitchen_not_found(kitchen_id))?;
            let current = self.store.list_ratings_for_kitchen(kitchen_id).await?;
            let (op, average_rating) = build(&current)?;

            let write = RatingWrite {
                kitchen_id,
                expected_version: kitchen.version,
                average_rating,
                op,
            };
            match self.store.commit_rating_write(&write).await {
                Ok(outcome) => {
                    debug!(
                        kitchen_id,
                        average = average_rating,
                        version = outcome.kitchen.version,
                        "Kitchen average updated"
                    );
                    return Ok(outcome);
                }
                Err(err) if err.kind == StorageKind::VersionConflict => {
                    if attempt >= self.max_conflict_retries {
                        warn!(kitchen_id, attempts = attempt + 1, "Giving up on contended kitchen");
                        return Err(KitchenmapError::conflict(format!(
                            "Kitchen {} kept changing during rating update; try again",
                            kitchen_id
                        ))
                        .with_source(err));
                    }
                    attempt += 1;
                    debug!(kitchen_id, attempt, "Kitchen version moved, recomputing");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

//! In-Memory Kitchen Store (for testing)
//!
//! BTreeMap-based implementation used by unit tests and ephemeral servers.
//! All tables sit behind one lock so aggregate writes are atomic.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::domain::models::{
    Kitchen, KitchenId, KitchenPatch, NewKitchen, NewUser, Rating, RatingId, RatingOp,
    RatingWrite, RatingWriteOutcome, StoreStats, User, UserId, MAX_SCORE, MIN_SCORE,
};
use crate::domain::ports::{rating_order, KitchenStore};
use crate::error::{Result, StorageError};

#[derive(Default)]
struct State {
    kitchens: BTreeMap<KitchenId, Kitchen>,
    ratings: BTreeMap<RatingId, Rating>,
    users: BTreeMap<UserId, User>,
    next_kitchen_id: KitchenId,
    next_rating_id: RatingId,
    next_user_id: UserId,
}

impl State {
    fn allocate(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

#[derive(Clone, Default)]
pub struct InMemoryKitchenStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryKitchenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KitchenStore for InMemoryKitchenStore {
    async fn insert_kitchen(&self, kitchen: &NewKitchen) -> Result<Kitchen> {
        let mut state = self.state.write()?;
        if state.kitchens.values().any(|k| k.name == kitchen.name) {
            return Err(StorageError::duplicate(format!(
                "Kitchen name already exists: {}",
                kitchen.name
            )));
        }

        let now = Utc::now();
        let id = State::allocate(&mut state.next_kitchen_id);
        let stored = Kitchen {
            id,
            name: kitchen.name.clone(),
            address: kitchen.address.clone(),
            contact_phone: kitchen.contact_phone.clone(),
            location: kitchen.location,
            average_rating: None,
            operating_hours: kitchen.operating_hours.clone(),
            operational_status: kitchen.operational_status.clone(),
            accessibility_features: kitchen.accessibility_features.clone(),
            version: 0,
            created_at: now,
            updated_at: now,
        };
        state.kitchens.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_kitchen(&self, kitchen_id: KitchenId) -> Result<Option<Kitchen>> {
        Ok(self.state.read()?.kitchens.get(&kitchen_id).cloned())
    }

    async fn find_kitchen_by_name(&self, name: &str) -> Result<Option<Kitchen>> {
        Ok(self
            .state
            .read()?
            .kitchens
            .values()
            .find(|k| k.name == name)
            .cloned())
    }

    async fn find_kitchens_by_name_containing(&self, fragment: &str) -> Result<Vec<Kitchen>> {
        let needle = fragment.to_lowercase();
        Ok(self
            .state
            .read()?
            .kitchens
            .values()
            .filter(|k| k.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn list_kitchens(&self) -> Result<Vec<Kitchen>> {
        Ok(self.state.read()?.kitchens.values().cloned().collect())
    }

    async fn top_rated_kitchens(&self, limit: usize) -> Result<Vec<Kitchen>> {
        let mut kitchens: Vec<Kitchen> = self.state.read()?.kitchens.values().cloned().collect();
        kitchens.sort_by(rating_order);
        kitchens.truncate(limit);
        Ok(kitchens)
    }

    async fn update_kitchen(
        &self,
        kitchen_id: KitchenId,
        patch: &KitchenPatch,
    ) -> Result<Kitchen> {
        let mut state = self.state.write()?;
        if let Some(name) = &patch.name {
            if state
                .kitchens
                .values()
                .any(|k| k.id != kitchen_id && &k.name == name)
            {
                return Err(StorageError::duplicate(format!(
                    "Kitchen name already exists: {}",
                    name
                )));
            }
        }

        let kitchen = state
            .kitchens
            .get_mut(&kitchen_id)
            .ok_or_else(|| StorageError::kitchen_not_found(kitchen_id))?;
        kitchen.apply_patch(patch);
        kitchen.updated_at = Utc::now();
        Ok(kitchen.clone())
    }

    async fn delete_kitchen(&self, kitchen_id: KitchenId) -> Result<usize> {
        let mut state = self.state.write()?;
        if state.kitchens.remove(&kitchen_id).is_none() {
            return Err(StorageError::kitchen_not_found(kitchen_id));
        }
        let before = state.ratings.len();
        state.ratings.retain(|_, r| r.kitchen_id != kitchen_id);
        Ok(before - state.ratings.len())
    }

    async fn get_rating(&self, rating_id: RatingId) -> Result<Option<Rating>> {
        Ok(self.state.read()?.ratings.get(&rating_id).cloned())
    }

    async fn list_ratings(&self) -> Result<Vec<Rating>> {
        Ok(self.state.read()?.ratings.values().cloned().collect())
    }

    async fn list_ratings_for_kitchen(&self, kitchen_id: KitchenId) -> Result<Vec<Rating>> {
        Ok(self
            .state
            .read()?
            .ratings
            .values()
            .filter(|r| r.kitchen_id == kitchen_id)
            .cloned()
            .collect())
    }

    async fn list_ratings_for_user(&self, user_id: UserId) -> Result<Vec<Rating>> {
        Ok(self
            .state
            .read()?
            .ratings
            .values()
            .filter(|r| r.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn commit_rating_write(&self, write: &RatingWrite) -> Result<RatingWriteOutcome> {
        let mut state = self.state.write()?;

        let current_version = state
            .kitchens
            .get(&write.kitchen_id)
            .map(|k| k.version)
            .ok_or_else(|| StorageError::kitchen_not_found(write.kitchen_id))?;
        if current_version != write.expected_version {
            return Err(StorageError::version_conflict(
                write.kitchen_id,
                write.expected_version,
                current_version,
            ));
        }

        // Validate before mutating anything
        let (score, user_id) = match &write.op {
            RatingOp::Insert(new_rating) => (Some(new_rating.score), new_rating.user_id),
            RatingOp::Replace(rating) => (Some(rating.score), rating.user_id),
            RatingOp::Delete(_) => (None, None),
        };
        if let Some(score) = score {
            if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                return Err(StorageError::constraint(format!(
                    "Score {} outside {}..={}",
                    score, MIN_SCORE, MAX_SCORE
                )));
            }
        }
        if let Some(user_id) = user_id {
            if !state.users.contains_key(&user_id) {
                return Err(StorageError::constraint(format!(
                    "Rating references unknown user {}",
                    user_id
                )));
            }
        }
        match &write.op {
            RatingOp::Insert(new_rating) => {
                if new_rating.kitchen_id != write.kitchen_id {
                    return Err(StorageError::constraint(format!(
                        "Rating targets kitchen {} but write is for kitchen {}",
                        new_rating.kitchen_id, write.kitchen_id
                    )));
                }
            }
            RatingOp::Replace(rating) => {
                let owned = state
                    .ratings
                    .get(&rating.id)
                    .is_some_and(|r| r.kitchen_id == write.kitchen_id);
                if !owned || rating.kitchen_id != write.kitchen_id {
                    return Err(StorageError::rating_not_found(rating.id));
                }
            }
            RatingOp::Delete(rating_id) => {
                let owned = state
                    .ratings
                    .get(rating_id)
                    .is_some_and(|r| r.kitchen_id == write.kitchen_id);
                if !owned {
                    return Err(StorageError::rating_not_found(*rating_id));
                }
            }
        }

        let stored = match &write.op {
            RatingOp::Insert(new_rating) => {
                let id = State::allocate(&mut state.next_rating_id);
                let rating = Rating {
                    id,
                    kitchen_id: new_rating.kitchen_id,
                    user_id: new_rating.user_id,
                    user_name: new_rating.user_name.clone(),
                    score: new_rating.score,
                    comments: new_rating.comments.clone(),
                    wait_time_secs: new_rating.wait_time_secs,
                    comment_url: new_rating.comment_url.clone(),
                    publish_time: new_rating.publish_time.clone(),
                    relative_time: new_rating.relative_time.clone(),
                    created_at: Utc::now(),
                };
                state.ratings.insert(id, rating.clone());
                Some(rating)
            }
            RatingOp::Replace(rating) => {
                state.ratings.insert(rating.id, rating.clone());
                Some(rating.clone())
            }
            RatingOp::Delete(rating_id) => {
                state.ratings.remove(rating_id);
                None
            }
        };

        let kitchen = state
            .kitchens
            .get_mut(&write.kitchen_id)
            .ok_or_else(|| StorageError::kitchen_not_found(write.kitchen_id))?;
        kitchen.average_rating = Some(write.average_rating);
        kitchen.version += 1;
        kitchen.updated_at = Utc::now();

        Ok(RatingWriteOutcome {
            kitchen: kitchen.clone(),
            rating: stored,
        })
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User> {
        let mut state = self.state.write()?;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(StorageError::duplicate(format!(
                "Username already taken: {}",
                user.username
            )));
        }

        let id = State::allocate(&mut state.next_user_id);
        let stored = User {
            id,
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            created_at: user.created_at.unwrap_or_else(Utc::now),
        };
        state.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        Ok(self.state.read()?.users.get(&user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .state
            .read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn delete_user(&self, user_id: UserId) -> Result<()> {
        let mut state = self.state.write()?;
        if state.users.remove(&user_id).is_none() {
            return Err(StorageError::user_not_found(user_id));
        }
        for rating in state.ratings.values_mut() {
            if rating.user_id == Some(user_id) {
                rating.user_id = None;
            }
        }
        Ok(())
    }

    async fn count_ratings_by_user(&self, user_id: UserId) -> Result<usize> {
        Ok(self
            .state
            .read()?
            .ratings
            .values()
            .filter(|r| r.user_id == Some(user_id))
            .count())
    }

    async fn stats(&self) -> Result<StoreStats> {
        let state = self.state.read()?;
        Ok(StoreStats {
            total_kitchens: state.kitchens.len(),
            total_ratings: state.ratings.len(),
            total_users: state.users.len(),
        })
    }
}

//! Account use cases

use chrono::Utc;
use kitchenmap_storage::{AccountRole, KitchenStore, NewUser, User, UserId};
use std::sync::Arc;
use tracing::info;

use super::domain::UserProfile;
use super::password::{hash_password, verify_password};
use crate::features::ratings::RatingAggregator;
use crate::shared::models::{KitchenmapError, Result};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn KitchenStore>,
    aggregator: RatingAggregator,
}

impl UserService {
    pub fn new(store: Arc<dyn KitchenStore>, aggregator: RatingAggregator) -> Self {
        Self { store, aggregator }
    }

    /// Create an account; the password is stored hashed
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: AccountRole,
    ) -> Result<UserProfile> {
        let username = username.trim();
        if username.is_empty() {
            return Err(KitchenmapError::invalid_input("Username must not be blank"));
        }
        if password.trim().is_empty() {
            return Err(KitchenmapError::invalid_input("Password must not be blank"));
        }
        if self.store.find_user_by_username(username).await?.is_some() {
            return Err(KitchenmapError::conflict(format!(
                "Username already taken: {}",
                username
            )));
        }

        let user = self
            .store
            .insert_user(&NewUser {
                username: username.to_string(),
                password_hash: hash_password(password),
                role,
                created_at: None,
            })
            .await?;
        info!(user_id = user.id, role = user.role.as_str(), "User registered");
        Ok(UserProfile::derive(&user, 0, Utc::now()))
    }

    /// Profile with the tier derived as of now
    pub async fn get_profile(&self, user_id: UserId) -> Result<UserProfile> {
        let user = self.get_user(user_id).await?;
        self.profile_of(&user).await
    }

    /// Check a username/password pair
    ///
    /// Unknown users and wrong passwords are indistinguishable to the caller.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<UserProfile> {
        let rejected = || KitchenmapError::unauthorized("Invalid username or password");

        let user = self
            .store
            .find_user_by_username(username.trim())
            .await?
            .ok_or_else(rejected)?;
        if !verify_password(password, &user.password_hash) {
            return Err(rejected());
        }
        self.profile_of(&user).await
    }

    /// Delete the user's ratings (keeping kitchen averages current), then the user
    pub async fn delete_user(&self, user_id: UserId) -> Result<usize> {
        self.get_user(user_id).await?;
        let removed = self.aggregator.delete_ratings_by_user(user_id).await?;
        self.store.delete_user(user_id).await?;
        info!(user_id, ratings_removed = removed, "User deleted");
        Ok(removed)
    }

    async fn get_user(&self, user_id: UserId) -> Result<User> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| KitchenmapError::user_not_found(user_id))
    }

    async fn profile_of(&self, user: &User) -> Result<UserProfile> {
        let activity = self.store.count_ratings_by_user(user.id).await?;
        Ok(UserProfile::derive(user, activity, Utc::now()))
    }
}

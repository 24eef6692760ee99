//! Shared fixtures for the kitchenmap-core integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use kitchenmap_core::features::geo::FixedGeocoder;
use kitchenmap_core::{KitchenService, RatingAggregator, UserService};
use kitchenmap_storage::{
    InMemoryKitchenStore, Kitchen, KitchenId, KitchenPatch, KitchenStore, NewKitchen, NewUser,
    Rating, RatingId, RatingWrite, RatingWriteOutcome, Result as StoreResult, StorageError,
    StoreStats, User, UserId,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub const COLUMBIA: (f64, f64) = (40.8075, -73.9626);
pub const UNKNOWN_ADDRESS: &str = "zzzznotarealaddress";

pub fn geocoder() -> FixedGeocoder {
    FixedGeocoder::new()
        .with("Columbia University", COLUMBIA.0, COLUMBIA.1)
        .with("2920 Broadway", 40.8086, -73.9630)
        .with("Times Square", 40.7580, -73.9855)
        .with("Prospect Park", 40.6602, -73.9690)
}

pub struct Harness {
    pub store: Arc<dyn KitchenStore>,
    pub aggregator: RatingAggregator,
    pub kitchens: KitchenService,
    pub users: UserService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryKitchenStore::new()))
    }

    pub fn with_store(store: Arc<dyn KitchenStore>) -> Self {
        let aggregator = RatingAggregator::new(store.clone());
        let kitchens = KitchenService::new(store.clone(), Arc::new(geocoder()), aggregator.clone());
        let users = UserService::new(store.clone(), aggregator.clone());
        Self {
            store,
            aggregator,
            kitchens,
            users,
        }
    }

    pub async fn add(&self, name: &str, address: &str, lat: f64, lng: f64) -> Kitchen {
        self.kitchens
            .add_kitchen(NewKitchen::new(name, address).with_location(lat, lng))
            .await
            .unwrap()
    }

    /// Kitchen A is a few hundred meters from Columbia, B in midtown, C in Brooklyn
    pub async fn seed_three(&self) -> (Kitchen, Kitchen, Kitchen) {
        let a = self.add("KitchenA", "2920 Broadway", 40.8086, -73.9630).await;
        let b = self.add("KitchenB", "Times Square", 40.7580, -73.9855).await;
        let c = self.add("KitchenC", "Prospect Park", 40.6602, -73.9690).await;
        (a, b, c)
    }
}

/// Store wrapper whose next `conflicts` aggregate writes fail with a version conflict
pub struct ContendedStore {
    inner: InMemoryKitchenStore,
    conflicts: AtomicU32,
}

impl ContendedStore {
    pub fn new(conflicts: u32) -> Self {
        Self {
            inner: InMemoryKitchenStore::new(),
            conflicts: AtomicU32::new(conflicts),
        }
    }

    pub fn remaining_conflicts(&self) -> u32 {
        self.conflicts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KitchenStore for ContendedStore {
    async fn insert_kitchen(&self, kitchen: &NewKitchen) -> StoreResult<Kitchen> {
        self.inner.insert_kitchen(kitchen).await
    }

    async fn get_kitchen(&self, kitchen_id: KitchenId) -> StoreResult<Option<Kitchen>> {
        self.inner.get_kitchen(kitchen_id).await
    }

    async fn find_kitchen_by_name(&self, name: &str) -> StoreResult<Option<Kitchen>> {
        self.inner.find_kitchen_by_name(name).await
    }

    async fn find_kitchens_by_name_containing(&self, fragment: &str) -> StoreResult<Vec<Kitchen>> {
        self.inner.find_kitchens_by_name_containing(fragment).await
    }

    async fn list_kitchens(&self) -> StoreResult<Vec<Kitchen>> {
        self.inner.list_kitchens().await
    }

    async fn top_rated_kitchens(&self, limit: usize) -> StoreResult<Vec<Kitchen>> {
        self.inner.top_rated_kitchens(limit).await
    }

    async fn update_kitchen(
        &self,
        kitchen_id: KitchenId,
        patch: &KitchenPatch,
    ) -> StoreResult<Kitchen> {
        self.inner.update_kitchen(kitchen_id, patch).await
    }

    async fn delete_kitchen(&self, kitchen_id: KitchenId) -> StoreResult<usize> {
        self.inner.delete_kitchen(kitchen_id).await
    }

    async fn get_rating(&self, rating_id: RatingId) -> StoreResult<Option<Rating>> {
        self.inner.get_rating(rating_id).await
    }

    async fn list_ratings(&self) -> StoreResult<Vec<Rating>> {
        self.inner.list_ratings().await
    }

    async fn list_ratings_for_kitchen(&self, kitchen_id: KitchenId) -> StoreResult<Vec<Rating>> {
        self.inner.list_ratings_for_kitchen(kitchen_id).await
    }

    async fn list_ratings_for_user(&self, user_id: UserId) -> StoreResult<Vec<Rating>> {
        self.inner.list_ratings_for_user(user_id).await
    }

    async fn commit_rating_write(&self, write: &RatingWrite) -> StoreResult<RatingWriteOutcome> {
        let injected = self
            .conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(StorageError::version_conflict(
                write.kitchen_id,
                write.expected_version,
                write.expected_version + 1,
            ));
        }
        self.inner.commit_rating_write(write).await
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        self.inner.insert_user(user).await
    }

    async fn get_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        self.inner.get_user(user_id).await
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.inner.find_user_by_username(username).await
    }

    async fn delete_user(&self, user_id: UserId) -> StoreResult<()> {
        self.inner.delete_user(user_id).await
    }

    async fn count_ratings_by_user(&self, user_id: UserId) -> StoreResult<usize> {
        self.inner.count_ratings_by_user(user_id).await
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        self.inner.stats().await
    }
}

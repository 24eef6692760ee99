//! `/api` handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use kitchenmap_core::{
    ImportReport, KitchenmapError, NearbyKitchen, NearestOutcome, Recommendation,
    RecommendationRequest, UserLocation, UserProfile, NO_WAIT_DATA,
};
use kitchenmap_storage::{
    AccountRole, Kitchen, KitchenId, KitchenPatch, NewKitchen, NewRating, Rating, RatingId,
    RatingPatch, RatingWriteOutcome, StoreStats, UserId,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;
pub type Created<T> = Result<(StatusCode, Json<T>), AppError>;

/// Result count used when a query names none
pub const DEFAULT_COUNT: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    #[serde(default)]
    pub address: String,
    pub count: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub count: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImportBody {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: AccountRole,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NearestResponse {
    pub origin: UserLocation,
    pub kitchens: Vec<NearbyKitchen>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WaitTimeResponse {
    pub kitchen_id: KitchenId,
    /// Mean wait in seconds, -1.0 without samples
    pub predicted_wait_time_secs: f64,
    pub has_data: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KitchenDeleted {
    pub id: KitchenId,
    pub ratings_removed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDeleted {
    pub id: UserId,
    pub ratings_removed: usize,
}

pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Welcome to the Kitchen API!".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Kitchens
// ═══════════════════════════════════════════════════════════════════════════

pub async fn list_kitchens(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Kitchen>> {
    Ok(Json(state.kitchens.list_kitchens().await?))
}

pub async fn nearest_kitchens(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearestQuery>,
) -> ApiResult<NearestResponse> {
    let count = query.count.unwrap_or(DEFAULT_COUNT);
    match state.kitchens.nearest_kitchens(&query.address, count).await? {
        NearestOutcome::Ranked { origin, kitchens } => {
            Ok(Json(NearestResponse { origin, kitchens }))
        }
        NearestOutcome::AddressNotFound => Err(KitchenmapError::not_found(format!(
            "Invalid address, please try again with an accurate address: {}",
            query.address.trim()
        ))
        .into()),
    }
}

pub async fn top_rated_kitchens(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CountQuery>,
) -> ApiResult<Vec<Kitchen>> {
    let count = query.count.unwrap_or(DEFAULT_COUNT);
    Ok(Json(state.kitchens.top_rated_kitchens(count).await?))
}

pub async fn search_kitchens(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<Kitchen>> {
    Ok(Json(state.kitchens.search_kitchens(&query.name).await?))
}

pub async fn get_kitchen(
    State(state): State<Arc<AppState>>,
    Path(id): Path<KitchenId>,
) -> ApiResult<Kitchen> {
    Ok(Json(state.kitchens.get_kitchen(id).await?))
}

pub async fn create_kitchen(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewKitchen>,
) -> Created<Kitchen> {
    let kitchen = state.kitchens.add_kitchen(body).await?;
    Ok((StatusCode::CREATED, Json(kitchen)))
}

pub async fn update_kitchen(
    State(state): State<Arc<AppState>>,
    Path(id): Path<KitchenId>,
    Json(patch): Json<KitchenPatch>,
) -> ApiResult<Kitchen> {
    Ok(Json(state.kitchens.update_kitchen(id, patch).await?))
}

pub async fn delete_kitchen(
    State(state): State<Arc<AppState>>,
    Path(id): Path<KitchenId>,
) -> ApiResult<KitchenDeleted> {
    let ratings_removed = state.kitchens.delete_kitchen(id).await?;
    Ok(Json(KitchenDeleted {
        id,
        ratings_removed,
    }))
}

pub async fn kitchen_ratings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<KitchenId>,
) -> ApiResult<Vec<Rating>> {
    Ok(Json(state.ratings.ratings_for_kitchen(id).await?))
}

pub async fn kitchen_wait_time(
    State(state): State<Arc<AppState>>,
    Path(id): Path<KitchenId>,
) -> ApiResult<WaitTimeResponse> {
    let wait = state.kitchens.predicted_wait_time(id).await?;
    Ok(Json(WaitTimeResponse {
        kitchen_id: id,
        predicted_wait_time_secs: wait,
        has_data: wait != NO_WAIT_DATA,
    }))
}

pub async fn import_kitchens(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ImportBody>>,
) -> ApiResult<ImportReport> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let query = body
        .query
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| state.config.places.default_query.clone());
    Ok(Json(state.importer.import(&query).await?))
}

// ═══════════════════════════════════════════════════════════════════════════
// Ratings
// ═══════════════════════════════════════════════════════════════════════════

pub async fn create_rating(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewRating>,
) -> Created<RatingWriteOutcome> {
    let outcome = state.ratings.add_rating(body).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn update_rating(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RatingId>,
    Json(patch): Json<RatingPatch>,
) -> ApiResult<RatingWriteOutcome> {
    Ok(Json(state.ratings.update_rating(id, &patch).await?))
}

pub async fn delete_rating(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RatingId>,
) -> ApiResult<RatingWriteOutcome> {
    Ok(Json(state.ratings.delete_rating(id).await?))
}

// ═══════════════════════════════════════════════════════════════════════════
// Users
// ═══════════════════════════════════════════════════════════════════════════

pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterBody>,
) -> Created<UserProfile> {
    let profile = state
        .users
        .register(&body.username, &body.password, body.role)
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginBody>,
) -> ApiResult<UserProfile> {
    Ok(Json(
        state
            .users
            .verify_credentials(&body.username, &body.password)
            .await?,
    ))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<UserId>,
) -> ApiResult<UserProfile> {
    Ok(Json(state.users.get_profile(id).await?))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<UserId>,
) -> ApiResult<UserDeleted> {
    let ratings_removed = state.users.delete_user(id).await?;
    Ok(Json(UserDeleted {
        id,
        ratings_removed,
    }))
}

// ═══════════════════════════════════════════════════════════════════════════
// Misc
// ═══════════════════════════════════════════════════════════════════════════

pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecommendationRequest>,
) -> ApiResult<Recommendation> {
    Ok(Json(state.recommender.recommend(&body).await?))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> ApiResult<StoreStats> {
    Ok(Json(state.store.stats().await.map_err(KitchenmapError::from)?))
}

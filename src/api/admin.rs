//! Admin panel API. Every handler requires an [`AdminUser`].

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{AdminUser, AppState};
use crate::error::{ApiError, ApiResult};
use crate::locate::{Boundary, BoundaryPoint};
use crate::models::{
    ConfigEntry, ConfigUpdate, Hotel, HotelInput, Place, PlaceCreate, PlaceUpdate, Restaurant,
    RestaurantInput, Shop, ShopInput,
};

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/places", get(list_places).post(create_place))
        .route("/places/{id}", put(update_place).delete(delete_place))
        .route("/hotels", get(list_hotels).post(create_hotel))
        .route("/hotels/{id}", put(update_hotel).delete(delete_hotel))
        .route("/restaurants", get(list_restaurants).post(create_restaurant))
        .route("/restaurants/{id}", put(update_restaurant).delete(delete_restaurant))
        .route("/shops", get(list_shops).post(create_shop))
        .route("/shops/{id}", put(update_shop).delete(delete_shop))
        .route("/config", get(list_config).put(update_config))
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
struct PlaceListParams {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    include_children: bool,
}

/// Drop empty recordings and reject outlines the mapper could not have produced.
fn normalize_boundary(
    points: Option<Vec<BoundaryPoint>>,
) -> ApiResult<Option<Vec<BoundaryPoint>>> {
    match points {
        Some(points) if points.is_empty() => Ok(None),
        Some(points) => {
            Boundary::from_points(&points)?;
            Ok(Some(points))
        }
        None => Ok(None),
    }
}

async fn dashboard(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Value>> {
    let counts = state.db.counts().await?;
    Ok(Json(json!({ "items": counts })))
}

// Places

async fn list_places(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlaceListParams>,
) -> ApiResult<Json<Vec<Place>>> {
    if params.skip < 0 || params.limit < 0 {
        return Err(ApiError::BadRequest(
            "skip and limit must not be negative".to_string(),
        ));
    }
    let places = state
        .db
        .list_places_admin(params.skip, params.limit, params.include_children)
        .await?;
    Ok(Json(places))
}

async fn create_place(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Json(mut input): Json<PlaceCreate>,
) -> ApiResult<Json<Place>> {
    input.boundary_points = normalize_boundary(input.boundary_points)?;
    let place = state.db.create_place(input).await?;
    info!("{} created place {} '{}'", admin.email, place.id, place.name);
    Ok(Json(place))
}

async fn update_place(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(mut update): Json<PlaceUpdate>,
) -> ApiResult<Json<Place>> {
    if let Some(points) = update.boundary_points.take() {
        update.boundary_points = Some(normalize_boundary(points)?);
    }
    if update.parent_id == Some(Some(id)) {
        return Err(ApiError::BadRequest(
            "A place cannot be its own parent".to_string(),
        ));
    }
    state
        .db
        .update_place(id, update)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Place not found".to_string()))
}

/// Delete a place together with every micro-location nested under it.
async fn delete_place(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let removed = state.db.delete_place_cascade(id).await?;
    info!("{} deleted place {} ({} rows)", admin.email, id, removed);
    Ok(Json(json!({ "status": "success" })))
}

// Hotels

async fn list_hotels(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Hotel>>> {
    Ok(Json(state.db.list_hotels(false).await?))
}

async fn create_hotel(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<HotelInput>,
) -> ApiResult<Json<Hotel>> {
    Ok(Json(state.db.create_hotel(input).await?))
}

async fn update_hotel(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<HotelInput>,
) -> ApiResult<Json<Hotel>> {
    state
        .db
        .update_hotel(id, input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Hotel not found".to_string()))
}

async fn delete_hotel(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.delete_hotel(id).await?;
    Ok(Json(json!({ "ok": true })))
}

// Restaurants

async fn list_restaurants(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Restaurant>>> {
    Ok(Json(state.db.list_restaurants(false).await?))
}

async fn create_restaurant(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<RestaurantInput>,
) -> ApiResult<Json<Restaurant>> {
    Ok(Json(state.db.create_restaurant(input).await?))
}

async fn update_restaurant(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<RestaurantInput>,
) -> ApiResult<Json<Restaurant>> {
    state
        .db
        .update_restaurant(id, input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Restaurant not found".to_string()))
}

async fn delete_restaurant(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.delete_restaurant(id).await?;
    Ok(Json(json!({ "ok": true })))
}

// Shops

async fn list_shops(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Shop>>> {
    Ok(Json(state.db.list_shops(false).await?))
}

async fn create_shop(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<ShopInput>,
) -> ApiResult<Json<Shop>> {
    Ok(Json(state.db.create_shop(input).await?))
}

async fn update_shop(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<ShopInput>,
) -> ApiResult<Json<Shop>> {
    state
        .db
        .update_shop(id, input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Shop not found".to_string()))
}

async fn delete_shop(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.delete_shop(id).await?;
    Ok(Json(json!({ "ok": true })))
}

// Global config

async fn list_config(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ConfigEntry>>> {
    Ok(Json(state.db.list_config().await?))
}

async fn update_config(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(update): Json<ConfigUpdate>,
) -> ApiResult<Json<ConfigEntry>> {
    Ok(Json(state.db.upsert_config(&update.key, &update.value).await?))
}

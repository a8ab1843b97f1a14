//! Endpoints used by the visitor app. No authentication.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use tracing::{debug, info};

use super::AppState;
use crate::ai::MAX_PLAN_DAYS;
use crate::error::{ApiError, ApiResult};
use crate::locate::{Boundary, GeoPoint};
use crate::models::{
    AudioResponse, ChatRequest, ChatResponse, ConfigEntry, Hotel, Place, PlaceView, PlanRequest,
    PlanResponse, Restaurant, Shop, TranslationRequest, TranslationResponse,
};

#[derive(Debug, Deserialize)]
pub(super) struct LocationParams {
    lat: f64,
    lng: f64,
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_mode() -> String {
    "short".to_string()
}

#[derive(Debug, Deserialize)]
pub(super) struct AudioParams {
    #[serde(default = "default_lang")]
    lang: String,
    /// "short" or "long"
    #[serde(default = "default_mode")]
    mode: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct LangParams {
    #[serde(default = "default_lang")]
    lang: String,
}

async fn active_place(state: &AppState, id: i64) -> ApiResult<Place> {
    state
        .db
        .get_active_place(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Place not found".to_string()))
}

/// Base64 MP3 for `text`, or 500 if synthesis fails.
async fn narrate(state: &AppState, text: &str, lang: &str) -> ApiResult<String> {
    let audio = state
        .guide
        .narrate(text, lang)
        .await
        .map_err(|_| ApiError::Internal("Audio generation failed".to_string()))?;
    Ok(STANDARD.encode(audio))
}

pub(super) async fn list_places(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PlaceView>>> {
    let places = state.db.list_top_level_places().await?;
    Ok(Json(places.into_iter().map(PlaceView::from).collect()))
}

pub(super) async fn get_place(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PlaceView>> {
    let place = active_place(&state, id).await?;
    Ok(Json(place.into()))
}

/// Which place is the visitor standing at?
pub(super) async fn place_by_location(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationParams>,
) -> ApiResult<Json<PlaceView>> {
    let query = GeoPoint::new(params.lat, params.lng);
    if !query.is_finite()
        || !(-90.0..=90.0).contains(&params.lat)
        || !(-180.0..=180.0).contains(&params.lng)
    {
        return Err(ApiError::BadRequest(format!(
            "Invalid coordinates: lat={}, lng={}",
            params.lat, params.lng
        )));
    }

    let candidates = state.db.list_active_places().await?;
    let place = state.resolver.resolve(query, &candidates)?;

    info!(
        "Visitor at ({}, {}) matched '{}' within {}m",
        params.lat,
        params.lng,
        place.name,
        state.resolver.threshold_meters()
    );
    if let Some(outline) = place
        .boundary_points
        .as_deref()
        .and_then(|points| Boundary::from_points(points).ok())
    {
        debug!("Inside outline of '{}': {}", place.name, outline.contains(query));
    }
    Ok(Json(place.clone().into()))
}

pub(super) async fn place_audio(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<AudioParams>,
) -> ApiResult<Json<AudioResponse>> {
    let place = active_place(&state, id).await?;
    let text = place.narration_text(&params.mode);
    let audio_base64 = narrate(&state, text, &params.lang).await?;

    Ok(Json(AudioResponse {
        audio_base64,
        content_type: "audio/mpeg".to_string(),
        text_content: None,
    }))
}

/// Spoken welcome for a place, with its text.
pub(super) async fn place_intro(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<LangParams>,
) -> ApiResult<Json<AudioResponse>> {
    let place = active_place(&state, id).await?;
    let intro = state.guide.welcome(&place.name, &params.lang).await;
    let audio_base64 = narrate(&state, &intro, &params.lang).await?;

    Ok(Json(AudioResponse {
        audio_base64,
        content_type: "audio/mpeg".to_string(),
        text_content: Some(intro),
    }))
}

pub(super) async fn list_hotels(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Hotel>>> {
    Ok(Json(state.db.list_hotels(true).await?))
}

pub(super) async fn list_restaurants(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Restaurant>>> {
    Ok(Json(state.db.list_restaurants(true).await?))
}

pub(super) async fn list_shops(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Shop>>> {
    Ok(Json(state.db.list_shops(true).await?))
}

pub(super) async fn list_config(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ConfigEntry>>> {
    Ok(Json(state.db.list_config().await?))
}

pub(super) async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let response = state
        .guide
        .chat(&request.query, &request.context, &request.lang)
        .await;

    Json(ChatResponse {
        response,
        audio_available: true,
    })
}

pub(super) async fn translate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TranslationRequest>,
) -> Json<TranslationResponse> {
    let translated = state
        .guide
        .translate(&request.text, &request.source_lang, &request.target_lang)
        .await;

    Json(TranslationResponse {
        original: request.text,
        translated,
    })
}

/// Read arbitrary text aloud (chat answers, translations).
pub(super) async fn speak(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TranslationRequest>,
) -> ApiResult<Json<AudioResponse>> {
    let audio_base64 = narrate(&state, &request.text, &request.target_lang).await?;

    Ok(Json(AudioResponse {
        audio_base64,
        content_type: "audio/mpeg".to_string(),
        text_content: None,
    }))
}

pub(super) async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanRequest>,
) -> ApiResult<Json<PlanResponse>> {
    if request.days > MAX_PLAN_DAYS {
        return Err(ApiError::BadRequest(format!(
            "Plans cover at most {} days",
            MAX_PLAN_DAYS
        )));
    }
    Ok(Json(state.guide.plan(&request)))
}

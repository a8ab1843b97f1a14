//! HTTP surface: public visitor endpoints and the admin panel API.

mod admin;
mod auth;
mod login;
mod public;

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::ai::GuideService;
use crate::auth::TokenSigner;
use crate::db::Database;
use crate::locate::NearestResolver;

pub use auth::AdminUser;
pub use login::{LoginForm, TokenResponse};

pub const API_PREFIX: &str = "/api/v1";

/// Application state shared across handlers
pub struct AppState {
    pub db: Database,
    pub guide: GuideService,
    pub tokens: TokenSigner,
    pub resolver: NearestResolver,
}

impl AppState {
    pub fn new(db: Database, guide: GuideService, tokens: TokenSigner) -> Self {
        Self {
            db,
            guide,
            tokens,
            resolver: NearestResolver::new(),
        }
    }
}

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/places", get(public::list_places))
        .route("/places/by-location", get(public::place_by_location))
        .route("/places/{id}", get(public::get_place))
        .route("/places/{id}/audio", get(public::place_audio))
        .route("/places/{id}/intro", get(public::place_intro))
        .route("/hotels", get(public::list_hotels))
        .route("/restaurants", get(public::list_restaurants))
        .route("/shops", get(public::list_shops))
        .route("/config", get(public::list_config))
        .route("/chat", post(public::chat))
        .route("/translate", post(public::translate))
        .route("/audio/speak", post(public::speak))
        .route("/create-plan", post(public::create_plan))
        .route("/login/access-token", post(login::access_token))
        .nest("/admin", admin::routes());

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest(API_PREFIX, api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Welcome to Ichan Kala AI Guide API" }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: bool,
    ai: bool,
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let healthy = state.db.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        database: healthy,
        ai: state.guide.has_generator(),
    })
}

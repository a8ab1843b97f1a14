//! Hiva API server
//!
//! Serves the visitor app and the admin panel over HTTP.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use hiva::ai::GuideService;
use hiva::api::{self, AppState};
use hiva::auth::TokenSigner;
use hiva::config::Settings;
use hiva::db::Database;
use hiva::import::seed_admin;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Settings::parse().resolve()?;

    info!("Hiva API Server");

    let db = Database::connect(&config.database_url).await?;
    seed_admin(&db, &config.admin_email, &config.admin_password).await?;

    let counts = db.counts().await?;
    info!(
        "Catalogue: {} places, {} hotels, {} restaurants, {} shops",
        counts.places, counts.hotels, counts.restaurants, counts.shops
    );

    let guide = GuideService::with_default_providers(
        config.gemini_api_key.as_deref(),
        &config.gemini_model,
    )?;
    let tokens = TokenSigner::new(config.secret_key.clone(), config.access_token_expire_minutes)
        .context("Invalid token settings")?;

    let state = Arc::new(AppState::new(db, guide, tokens));
    let app = api::router(state);

    info!("Starting server on {}", config.listen);

    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    axum::serve(listener, app).await?;

    Ok(())
}

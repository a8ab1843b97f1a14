//! SQLite persistence for places, venues, settings and users.

mod places;
mod settings;
mod users;
mod venues;

use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

pub use users::NewUser;

/// Shared handle over the connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

/// Row counts for the admin dashboard
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableCounts {
    pub places: i64,
    pub hotels: i64,
    pub restaurants: i64,
    pub shops: i64,
    pub users: i64,
}

impl Database {
    /// Open (creating if missing) the database and ensure the schema exists.
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Opening database at {}...", url);
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Private in-memory database, used by tests and dry runs.
    pub async fn in_memory() -> Result<Self> {
        // A single connection keeps every query on the same memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check that the database answers a trivial query
    pub async fn health_check(&self) -> Result<bool> {
        let (one,): (i64,) = sqlx::query_as("SELECT 1").fetch_one(&self.pool).await?;
        Ok(one == 1)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                hashed_password TEXT NOT NULL,
                full_name TEXT,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                is_premium BOOLEAN NOT NULL DEFAULT 0,
                is_admin BOOLEAN NOT NULL DEFAULT 0
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS places (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                short_desc TEXT,
                long_desc TEXT,
                story_text TEXT,
                child_text TEXT,
                description TEXT,
                photo_url TEXT,
                audio_url TEXT,
                latitude REAL,
                longitude REAL,
                type TEXT NOT NULL DEFAULT 'historical',
                boundary_points TEXT,
                parent_id INTEGER REFERENCES places(id),
                is_active BOOLEAN NOT NULL DEFAULT 1
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_places_name ON places(name)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_places_parent ON places(parent_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS hotels (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                contact_info TEXT,
                commission_rate REAL NOT NULL DEFAULT 0.0,
                photo_url TEXT,
                is_active BOOLEAN NOT NULL DEFAULT 0
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS restaurants (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                category TEXT,
                price_level TEXT,
                photo_url TEXT,
                is_recommended BOOLEAN NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT 0
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS shops (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                is_handmade BOOLEAN NOT NULL DEFAULT 0,
                is_verified BOOLEAN NOT NULL DEFAULT 0,
                commission_rate REAL NOT NULL DEFAULT 0.0,
                admin_notes TEXT,
                photo_url TEXT,
                is_active BOOLEAN NOT NULL DEFAULT 0
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS global_config (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                description TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Row counts across the catalog tables
    pub async fn counts(&self) -> Result<TableCounts> {
        let mut counts = TableCounts::default();
        for (table, slot) in [
            ("places", &mut counts.places),
            ("hotels", &mut counts.hotels),
            ("restaurants", &mut counts.restaurants),
            ("shops", &mut counts.shops),
            ("users", &mut counts.users),
        ] {
            let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(&self.pool)
                .await?;
            *slot = n;
        }
        Ok(counts)
    }
}

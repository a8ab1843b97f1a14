//! Server settings from flags, environment variables and an optional TOML file.
//!
//! Precedence: command-line flag, then environment variable, then the file
//! named by `--config`/`HIVA_CONFIG`, then the built-in default.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use tracing::warn;

use crate::auth::MAX_TOKEN_MINUTES;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://hiva.db";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-lite-preview-02-05";
pub const DEFAULT_TOKEN_MINUTES: i64 = 60 * 24 * 7;
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@ichankala.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "serve", about = "Ichan Kala tour guide API server")]
pub struct Settings {
    /// Listen address
    #[arg(short, long, env = "HIVA_LISTEN")]
    pub listen: Option<String>,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Key used to sign access tokens
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Access token lifetime in minutes
    #[arg(long, env = "ACCESS_TOKEN_EXPIRE_MINUTES")]
    pub access_token_expire_minutes: Option<i64>,

    /// Gemini API key; chat and welcome speeches use canned text without it
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL")]
    pub gemini_model: Option<String>,

    /// Admin account created at startup if missing
    #[arg(long, env = "HIVA_ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    #[arg(long, env = "HIVA_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Optional TOML settings file
    #[arg(short, long, env = "HIVA_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Same keys as [`Settings`], as read from the TOML file.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub listen: Option<String>,
    pub database_url: Option<String>,
    pub secret_key: Option<String>,
    pub access_token_expire_minutes: Option<i64>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl FileSettings {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let settings: FileSettings =
            toml::from_str(&content).context("Failed to parse config file")?;
        Ok(settings)
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen: String,
    pub database_url: String,
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Settings {
    /// Read the config file (if any) and fill in defaults.
    pub fn resolve(self) -> Result<AppConfig> {
        let file = match self.config {
            Some(ref path) => FileSettings::load_from_file(path)
                .with_context(|| format!("Loading {}", path.display()))?,
            None => FileSettings::default(),
        };
        self.merge(file)
    }

    fn merge(self, file: FileSettings) -> Result<AppConfig> {
        let access_token_expire_minutes = self
            .access_token_expire_minutes
            .or(file.access_token_expire_minutes)
            .unwrap_or(DEFAULT_TOKEN_MINUTES);
        if !(1..=MAX_TOKEN_MINUTES).contains(&access_token_expire_minutes) {
            bail!(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be between 1 and {}, got {}",
                MAX_TOKEN_MINUTES,
                access_token_expire_minutes
            );
        }

        let secret_key = match self.secret_key.or(file.secret_key) {
            Some(key) if !key.is_empty() => key,
            _ => {
                warn!(
                    "SECRET_KEY not set; using a random key, tokens will not survive a restart"
                );
                random_secret()
            }
        };

        Ok(AppConfig {
            listen: self
                .listen
                .or(file.listen)
                .unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
            database_url: self
                .database_url
                .or(file.database_url)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            secret_key,
            access_token_expire_minutes,
            gemini_api_key: self
                .gemini_api_key
                .or(file.gemini_api_key)
                .filter(|k| !k.trim().is_empty()),
            gemini_model: self
                .gemini_model
                .or(file.gemini_model)
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            admin_email: self
                .admin_email
                .or(file.admin_email)
                .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
            admin_password: self
                .admin_password
                .or(file.admin_password)
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
        })
    }
}

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

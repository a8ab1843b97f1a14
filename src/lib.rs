//! Hiva - backend for the Ichan Kala (Khiva) audio tour guide
//!
//! This library holds the shared pieces for the `serve` and `seed` binaries:
//! the nearest-place resolver, persistence, auth, AI providers and the HTTP API.

pub mod ai;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod locate;
pub mod models;

pub use locate::{find_nearest, haversine_meters, GeoPoint, NearestResolver, NoMatch};
pub use models::Place;

//! Hotels, restaurants and shops promoted to visitors.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub contact_info: Option<String>,
    pub commission_rate: f64,
    pub photo_url: Option<String>,
    pub is_active: bool,
}

/// Create/replace payload for a hotel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelInput {
    pub name: String,
    pub contact_info: Option<String>,
    #[serde(default)]
    pub commission_rate: f64,
    pub photo_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    /// local, cafe, fast_food
    pub category: Option<String>,
    /// $, $$, $$$
    pub price_level: Option<String>,
    pub photo_url: Option<String>,
    pub is_recommended: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantInput {
    pub name: String,
    pub category: Option<String>,
    pub price_level: Option<String>,
    #[serde(default)]
    pub is_recommended: bool,
    pub photo_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub is_handmade: bool,
    pub is_verified: bool,
    pub commission_rate: f64,
    pub admin_notes: Option<String>,
    pub photo_url: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopInput {
    pub name: String,
    #[serde(default)]
    pub is_handmade: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub commission_rate: f64,
    pub admin_notes: Option<String>,
    pub photo_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

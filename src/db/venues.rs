use anyhow::Result;

use super::Database;
use crate::models::{Hotel, HotelInput, Restaurant, RestaurantInput, Shop, ShopInput};

impl Database {
    // --- Hotels ---

    pub async fn list_hotels(&self, active_only: bool) -> Result<Vec<Hotel>> {
        let sql = if active_only {
            "SELECT * FROM hotels WHERE is_active = 1 ORDER BY id"
        } else {
            "SELECT * FROM hotels ORDER BY id"
        };
        Ok(sqlx::query_as::<_, Hotel>(sql).fetch_all(&self.pool).await?)
    }

    pub async fn create_hotel(&self, input: HotelInput) -> Result<Hotel> {
        let hotel = sqlx::query_as::<_, Hotel>(
            "INSERT INTO hotels (name, contact_info, commission_rate, photo_url, is_active)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&input.name)
        .bind(&input.contact_info)
        .bind(input.commission_rate)
        .bind(&input.photo_url)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(hotel)
    }

    pub async fn update_hotel(&self, id: i64, input: HotelInput) -> Result<Option<Hotel>> {
        let hotel = sqlx::query_as::<_, Hotel>(
            "UPDATE hotels
             SET name = ?, contact_info = ?, commission_rate = ?, photo_url = ?, is_active = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&input.name)
        .bind(&input.contact_info)
        .bind(input.commission_rate)
        .bind(&input.photo_url)
        .bind(input.is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(hotel)
    }

    pub async fn delete_hotel(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM hotels WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // --- Restaurants ---

    pub async fn list_restaurants(&self, active_only: bool) -> Result<Vec<Restaurant>> {
        let sql = if active_only {
            "SELECT * FROM restaurants WHERE is_active = 1 ORDER BY id"
        } else {
            "SELECT * FROM restaurants ORDER BY id"
        };
        Ok(sqlx::query_as::<_, Restaurant>(sql)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn create_restaurant(&self, input: RestaurantInput) -> Result<Restaurant> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            "INSERT INTO restaurants
                (name, category, price_level, photo_url, is_recommended, is_active)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.price_level)
        .bind(&input.photo_url)
        .bind(input.is_recommended)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(restaurant)
    }

    pub async fn update_restaurant(
        &self,
        id: i64,
        input: RestaurantInput,
    ) -> Result<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            "UPDATE restaurants
             SET name = ?, category = ?, price_level = ?, photo_url = ?,
                 is_recommended = ?, is_active = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.price_level)
        .bind(&input.photo_url)
        .bind(input.is_recommended)
        .bind(input.is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(restaurant)
    }

    pub async fn delete_restaurant(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM restaurants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // --- Shops ---

    pub async fn list_shops(&self, active_only: bool) -> Result<Vec<Shop>> {
        let sql = if active_only {
            "SELECT * FROM shops WHERE is_active = 1 ORDER BY id"
        } else {
            "SELECT * FROM shops ORDER BY id"
        };
        Ok(sqlx::query_as::<_, Shop>(sql).fetch_all(&self.pool).await?)
    }

    pub async fn create_shop(&self, input: ShopInput) -> Result<Shop> {
        let shop = sqlx::query_as::<_, Shop>(
            "INSERT INTO shops
                (name, is_handmade, is_verified, commission_rate, admin_notes, photo_url, is_active)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&input.name)
        .bind(input.is_handmade)
        .bind(input.is_verified)
        .bind(input.commission_rate)
        .bind(&input.admin_notes)
        .bind(&input.photo_url)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(shop)
    }

    pub async fn update_shop(&self, id: i64, input: ShopInput) -> Result<Option<Shop>> {
        let shop = sqlx::query_as::<_, Shop>(
            "UPDATE shops
             SET name = ?, is_handmade = ?, is_verified = ?, commission_rate = ?,
                 admin_notes = ?, photo_url = ?, is_active = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&input.name)
        .bind(input.is_handmade)
        .bind(input.is_verified)
        .bind(input.commission_rate)
        .bind(&input.admin_notes)
        .bind(&input.photo_url)
        .bind(input.is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(shop)
    }

    pub async fn delete_shop(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM shops WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

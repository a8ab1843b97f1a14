use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::Database;
use crate::locate::BoundaryPoint;
use crate::models::{Place, PlaceCreate, PlaceUpdate};

const PLACE_COLUMNS: &str = "id, name, short_desc, long_desc, story_text, child_text, \
     description, photo_url, audio_url, latitude, longitude, type, boundary_points, \
     parent_id, is_active";

fn place_from_row(row: &SqliteRow) -> Result<Place> {
    let boundary_json: Option<String> = row.try_get("boundary_points")?;
    let boundary_points = match boundary_json.as_deref() {
        None | Some("") | Some("null") => None,
        Some(json) => Some(
            serde_json::from_str::<Vec<BoundaryPoint>>(json)
                .context("Corrupt boundary_points column")?,
        ),
    };

    Ok(Place {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        short_desc: row.try_get("short_desc")?,
        long_desc: row.try_get("long_desc")?,
        story_text: row.try_get("story_text")?,
        child_text: row.try_get("child_text")?,
        description: row.try_get("description")?,
        photo_url: row.try_get("photo_url")?,
        audio_url: row.try_get("audio_url")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        kind: row.try_get("type")?,
        boundary_points,
        parent_id: row.try_get("parent_id")?,
        is_active: row.try_get("is_active")?,
    })
}

fn boundary_to_json(points: &Option<Vec<BoundaryPoint>>) -> Result<Option<String>> {
    points
        .as_ref()
        .map(|p| serde_json::to_string(p).context("Failed to encode boundary_points"))
        .transpose()
}

impl Database {
    /// Active places shown in the main list (micro-locations excluded)
    pub async fn list_top_level_places(&self) -> Result<Vec<Place>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM places WHERE is_active = 1 AND parent_id IS NULL ORDER BY id",
            PLACE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(place_from_row).collect()
    }

    /// Every active place, in id order; the candidate set for location matching.
    pub async fn list_active_places(&self) -> Result<Vec<Place>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM places WHERE is_active = 1 ORDER BY id",
            PLACE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(place_from_row).collect()
    }

    pub async fn get_active_place(&self, id: i64) -> Result<Option<Place>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM places WHERE id = ? AND is_active = 1",
            PLACE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(place_from_row).transpose()
    }

    pub async fn get_place(&self, id: i64) -> Result<Option<Place>> {
        let row = sqlx::query(&format!("SELECT {} FROM places WHERE id = ?", PLACE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(place_from_row).transpose()
    }

    pub async fn find_place_by_name(&self, name: &str) -> Result<Option<Place>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM places WHERE name = ? ORDER BY id LIMIT 1",
            PLACE_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(place_from_row).transpose()
    }

    /// Admin listing, active or not
    pub async fn list_places_admin(
        &self,
        skip: i64,
        limit: i64,
        include_children: bool,
    ) -> Result<Vec<Place>> {
        let filter = if include_children {
            ""
        } else {
            "WHERE parent_id IS NULL"
        };
        let rows = sqlx::query(&format!(
            "SELECT {} FROM places {} ORDER BY id LIMIT ? OFFSET ?",
            PLACE_COLUMNS, filter
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(place_from_row).collect()
    }

    pub async fn create_place(&self, input: PlaceCreate) -> Result<Place> {
        let boundary = boundary_to_json(&input.boundary_points)?;
        let result = sqlx::query(
            "INSERT INTO places (
                name, short_desc, long_desc, latitude, longitude, is_active,
                type, photo_url, boundary_points, parent_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.short_desc)
        .bind(&input.long_desc)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.is_active)
        .bind(&input.kind)
        .bind(&input.photo_url)
        .bind(boundary)
        .bind(input.parent_id)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_place(id)
            .await?
            .context("Inserted place vanished")
    }

    /// Apply a partial update; `None` when the place does not exist.
    pub async fn update_place(&self, id: i64, update: PlaceUpdate) -> Result<Option<Place>> {
        let mut place = match self.get_place(id).await? {
            Some(p) => p,
            None => return Ok(None),
        };
        update.apply(&mut place);
        self.save_place(&place).await?;
        Ok(Some(place))
    }

    /// Write back every column of an existing place
    pub async fn save_place(&self, place: &Place) -> Result<()> {
        let boundary = boundary_to_json(&place.boundary_points)?;
        sqlx::query(
            "UPDATE places SET
                name = ?, short_desc = ?, long_desc = ?, story_text = ?, child_text = ?,
                description = ?, photo_url = ?, audio_url = ?, latitude = ?, longitude = ?,
                type = ?, boundary_points = ?, parent_id = ?, is_active = ?
             WHERE id = ?",
        )
        .bind(&place.name)
        .bind(&place.short_desc)
        .bind(&place.long_desc)
        .bind(&place.story_text)
        .bind(&place.child_text)
        .bind(&place.description)
        .bind(&place.photo_url)
        .bind(&place.audio_url)
        .bind(place.latitude)
        .bind(place.longitude)
        .bind(&place.kind)
        .bind(boundary)
        .bind(place.parent_id)
        .bind(place.is_active)
        .bind(place.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert a bare place record (import path); returns the new id.
    pub async fn insert_place(&self, place: &Place) -> Result<i64> {
        let boundary = boundary_to_json(&place.boundary_points)?;
        let result = sqlx::query(
            "INSERT INTO places (
                name, short_desc, long_desc, story_text, child_text, description,
                photo_url, audio_url, latitude, longitude, type, boundary_points,
                parent_id, is_active
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&place.name)
        .bind(&place.short_desc)
        .bind(&place.long_desc)
        .bind(&place.story_text)
        .bind(&place.child_text)
        .bind(&place.description)
        .bind(&place.photo_url)
        .bind(&place.audio_url)
        .bind(place.latitude)
        .bind(place.longitude)
        .bind(&place.kind)
        .bind(boundary)
        .bind(place.parent_id)
        .bind(place.is_active)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Delete a place together with every place nested beneath it.
    ///
    /// Descendants go first, then the place itself, in one transaction.
    /// Returns the number of rows removed.
    pub async fn delete_place_cascade(&self, id: i64) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let children = sqlx::query(
            "WITH RECURSIVE subtree(id) AS (
                SELECT id FROM places WHERE parent_id = ?1
                UNION
                SELECT p.id FROM places p JOIN subtree s ON p.parent_id = s.id
            )
            DELETE FROM places WHERE id IN (SELECT id FROM subtree) AND id != ?1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let own = sqlx::query("DELETE FROM places WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        debug!("Deleted place {} ({} row, {} nested)", id, own, children);
        Ok(children + own)
    }
}

use anyhow::Result;

use super::Database;
use crate::models::ConfigEntry;

impl Database {
    pub async fn list_config(&self) -> Result<Vec<ConfigEntry>> {
        Ok(
            sqlx::query_as::<_, ConfigEntry>(
                "SELECT key, value, description FROM global_config ORDER BY key",
            )
            .fetch_all(&self.pool)
            .await?,
        )
    }

    /// Insert the key or overwrite its value; the description is kept.
    pub async fn upsert_config(&self, key: &str, value: &str) -> Result<ConfigEntry> {
        let entry = sqlx::query_as::<_, ConfigEntry>(
            "INSERT INTO global_config (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value
             RETURNING key, value, description",
        )
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let db = Database::in_memory().await.unwrap();
        db.upsert_config("show_pricing", "false").await.unwrap();
        let entry = db.upsert_config("show_pricing", "true").await.unwrap();
        assert_eq!(entry.value, "true");

        let all = db.list_config().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].key, "show_pricing");
    }
}

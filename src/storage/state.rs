use anyhow::Result;

use super::db::Database;

impl Database {
    // ========================================================================
    // Key-Value State Operations
    // ========================================================================

    /// Get a single state value by key.
    ///
    /// Keys use dotted convention: `favorites.ids`, `favorites.data`.
    pub async fn get_state(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM app_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Set a state value (UPSERT).
    pub async fn set_state(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO app_state (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a state value. Absent keys are a no-op.
    pub async fn delete_state(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM app_state WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

//! Image record operations

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::Result;

/// Stored image record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ImageRecord {
    pub id: i64,
    pub display_name: String,
    pub internal_filename: String,
    pub full_text: Option<String>,
    pub ocr_words: Option<String>,
    pub created_at: String,
}

/// Gallery listing entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ImageSummary {
    pub id: i64,
    pub display_name: String,
    pub internal_filename: String,
}

/// Image repository
pub struct ImageRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ImageRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a specific record
    pub async fn get(&self, id: i64) -> Result<Option<ImageRecord>> {
        let record = sqlx::query_as::<_, ImageRecord>(
            r#"
            SELECT id, display_name, internal_filename, full_text, ocr_words, created_at
            FROM images
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Insert a fully processed record
    pub async fn insert(
        &self,
        display_name: &str,
        internal_filename: &str,
        full_text: &str,
        ocr_words: &str,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO images (display_name, internal_filename, full_text, ocr_words)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(display_name)
        .bind(internal_filename)
        .bind(full_text)
        .bind(ocr_words)
        .execute(self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Reserve a record id before processing.
    ///
    /// The placeholder gets a unique throwaway storage key so the UNIQUE
    /// constraint holds until `finalize` writes the real one.
    pub async fn insert_placeholder(&self, display_name: &str) -> Result<i64> {
        let placeholder_key = format!("pending-{}", uuid::Uuid::new_v4());

        let result = sqlx::query(
            r#"
            INSERT INTO images (display_name, internal_filename, full_text, ocr_words)
            VALUES (?, ?, '', '')
            "#,
        )
        .bind(display_name)
        .bind(&placeholder_key)
        .execute(self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Finalize a reserved record with its processed data
    pub async fn finalize(
        &self,
        id: i64,
        internal_filename: &str,
        full_text: &str,
        ocr_words: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE images
            SET internal_filename = ?, full_text = ?, ocr_words = ?
            WHERE id = ?
            "#,
        )
        .bind(internal_filename)
        .bind(full_text)
        .bind(ocr_words)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Gallery listing, newest first
    pub async fn list(&self) -> Result<Vec<ImageSummary>> {
        let summaries = sqlx::query_as::<_, ImageSummary>(
            r#"
            SELECT id, display_name, internal_filename
            FROM images
            ORDER BY id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(summaries)
    }

    /// Full corpus snapshot for search
    pub async fn all(&self) -> Result<Vec<ImageRecord>> {
        let records = sqlx::query_as::<_, ImageRecord>(
            r#"
            SELECT id, display_name, internal_filename, full_text, ocr_words, created_at
            FROM images
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }

    /// Whether any record uses this display name
    pub async fn display_name_exists(&self, display_name: &str) -> Result<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM images WHERE display_name = ? LIMIT 1")
                .bind(display_name)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.is_some())
    }

    /// Delete a record
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM images WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

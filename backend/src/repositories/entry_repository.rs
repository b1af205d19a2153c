//! Database repository for yearbook entries.

use crate::database::models::Entry;
use anyhow::Result;
use sqlx::SqlitePool;

pub struct EntryRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> EntryRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// One entry per user, enforced by the unique index on user_id.
    pub async fn create_entry(
        &self,
        id: &str,
        user_id: &str,
        photo_url: &str,
        quote: Option<&str>,
        favourite_memory: Option<&str>,
        advice: Option<&str>,
    ) -> Result<Entry> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (id, user_id, photo_url, quote, favourite_memory, advice)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(photo_url)
        .bind(quote)
        .bind(favourite_memory)
        .bind(advice)
        .fetch_one(self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn get_entry_by_user_id(&self, user_id: &str) -> Result<Option<Entry>> {
        let entry = sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(entry)
    }

    /// Any update resets moderation approval.
    pub async fn update_entry(
        &self,
        id: &str,
        photo_url: &str,
        quote: Option<&str>,
        favourite_memory: Option<&str>,
        advice: Option<&str>,
    ) -> Result<Option<Entry>> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            UPDATE entries
            SET photo_url = ?, quote = ?, favourite_memory = ?, advice = ?,
                is_approved = 0, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(photo_url)
        .bind(quote)
        .bind(favourite_memory)
        .bind(advice)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn list_approved_by_batch(&self, batch_id: &str) -> Result<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            r#"
            SELECT e.* FROM entries e
            JOIN users u ON e.user_id = u.id
            WHERE u.batch_id = ? AND e.is_approved = 1
            ORDER BY u.enrollment_number
            "#,
        )
        .bind(batch_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn list_unapproved(&self) -> Result<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries WHERE is_approved = 0 ORDER BY created_at",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn set_approved(&self, id: &str, approved: bool) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE entries SET is_approved = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(approved)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_entry(&self, id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

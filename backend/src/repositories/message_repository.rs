//! Database repository for direct and anonymous messages.

use crate::database::models::Message;
use anyhow::Result;
use sqlx::SqlitePool;

pub struct MessageRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> MessageRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_message(
        &self,
        id: &str,
        sender_user_id: &str,
        recipient_user_id: &str,
        body: &str,
        is_anonymous: bool,
    ) -> Result<Message> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, sender_user_id, recipient_user_id, body, is_anonymous)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(sender_user_id)
        .bind(recipient_user_id)
        .bind(body)
        .bind(is_anonymous)
        .fetch_one(self.pool)
        .await?;

        Ok(message)
    }

    pub async fn list_inbox(&self, recipient_user_id: &str) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE recipient_user_id = ? ORDER BY created_at DESC",
        )
        .bind(recipient_user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(messages)
    }

    pub async fn list_sent(&self, sender_user_id: &str) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE sender_user_id = ? ORDER BY created_at DESC",
        )
        .bind(sender_user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(messages)
    }
}

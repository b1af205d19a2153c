//! Direct and anonymous messaging between batch-mates.
//!
//! The sender is always recorded; anonymity is applied at read time by
//! stripping the sender from recipient-facing views.

use crate::database::models::{Message, PublicUser, SendMessageRequest};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::message_repository::MessageRepository;
use crate::repositories::user_repository::UserRepository;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

/// Recipient-facing view; `sender_user_id` is None for anonymous messages.
#[derive(Debug, Serialize)]
pub struct InboxMessage {
    pub id: String,
    pub sender_user_id: Option<String>,
    pub body: String,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for InboxMessage {
    fn from(message: Message) -> Self {
        let sender_user_id = if message.is_anonymous {
            None
        } else {
            Some(message.sender_user_id)
        };
        InboxMessage {
            id: message.id,
            sender_user_id,
            body: message.body,
            is_anonymous: message.is_anonymous,
            created_at: message.created_at,
        }
    }
}

pub struct MessageService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> MessageService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn send_message(
        &self,
        sender: &PublicUser,
        request: SendMessageRequest,
    ) -> ServiceResult<Message> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::from_validation(errors));
        }

        let recipient = UserRepository::new(self.pool)
            .get_user_by_id(&request.recipient_user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &request.recipient_user_id))?;

        if recipient.batch_id != sender.batch_id {
            return Err(ServiceError::forbidden(
                "messages can only be sent to batch-mates",
            ));
        }

        let message = MessageRepository::new(self.pool)
            .create_message(
                &Uuid::now_v7().to_string(),
                &sender.id,
                &recipient.id,
                &request.body,
                request.is_anonymous,
            )
            .await?;

        Ok(message)
    }

    pub async fn list_inbox(&self, user: &PublicUser) -> ServiceResult<Vec<InboxMessage>> {
        let messages = MessageRepository::new(self.pool).list_inbox(&user.id).await?;
        Ok(messages.into_iter().map(InboxMessage::from).collect())
    }

    /// Sender's own outbox keeps full message rows; your own anonymity is
    /// not hidden from yourself.
    pub async fn list_sent(&self, user: &PublicUser) -> ServiceResult<Vec<Message>> {
        let messages = MessageRepository::new(self.pool).list_sent(&user.id).await?;
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::CreateUserRecord;
    use crate::database::test_support::test_pool;
    use crate::repositories::batch_repository::BatchRepository;
    use crate::repositories::college_repository::CollegeRepository;

    async fn seed_user(pool: &SqlitePool, id: &str, batch_id: &str, en: &str) -> PublicUser {
        UserRepository::new(pool)
            .create_user(CreateUserRecord {
                id: id.to_string(),
                name: "Ada".to_string(),
                email: format!("{id}@x.com"),
                password_hash: "hash".to_string(),
                enrollment_number: en.to_string(),
                batch_id: batch_id.to_string(),
            })
            .await
            .unwrap()
            .into()
    }

    async fn seed_batches(pool: &SqlitePool) {
        CollegeRepository::new(pool)
            .create_college("col-1", "Test College")
            .await
            .unwrap();
        let repo = BatchRepository::new(pool);
        repo.create_batch("batch-1", "col-1", "2021-2025", "CODE1")
            .await
            .unwrap();
        repo.create_batch("batch-2", "col-1", "2022-2026", "CODE2")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn anonymous_sender_is_stripped_from_the_inbox() {
        let pool = test_pool().await;
        seed_batches(&pool).await;
        let ada = seed_user(&pool, "u-1", "batch-1", "EN-001").await;
        let bob = seed_user(&pool, "u-2", "batch-1", "EN-002").await;
        let service = MessageService::new(&pool);

        service
            .send_message(
                &ada,
                SendMessageRequest {
                    recipient_user_id: bob.id.clone(),
                    body: "guess who".to_string(),
                    is_anonymous: true,
                },
            )
            .await
            .unwrap();
        service
            .send_message(
                &ada,
                SendMessageRequest {
                    recipient_user_id: bob.id.clone(),
                    body: "it's me".to_string(),
                    is_anonymous: false,
                },
            )
            .await
            .unwrap();

        let inbox = service.list_inbox(&bob).await.unwrap();
        assert_eq!(inbox.len(), 2);
        let anon = inbox.iter().find(|m| m.is_anonymous).unwrap();
        assert_eq!(anon.sender_user_id, None);
        let signed = inbox.iter().find(|m| !m.is_anonymous).unwrap();
        assert_eq!(signed.sender_user_id.as_deref(), Some("u-1"));

        // The sender still sees their own anonymous message in full.
        let sent = service.list_sent(&ada).await.unwrap();
        assert!(sent.iter().all(|m| m.sender_user_id == "u-1"));
    }

    #[tokio::test]
    async fn cross_batch_messages_are_forbidden() {
        let pool = test_pool().await;
        seed_batches(&pool).await;
        let ada = seed_user(&pool, "u-1", "batch-1", "EN-001").await;
        let eve = seed_user(&pool, "u-3", "batch-2", "EN-001").await;
        let service = MessageService::new(&pool);

        let denied = service
            .send_message(
                &ada,
                SendMessageRequest {
                    recipient_user_id: eve.id.clone(),
                    body: "hello".to_string(),
                    is_anonymous: false,
                },
            )
            .await;
        assert!(matches!(denied, Err(ServiceError::Forbidden { .. })));
    }
}

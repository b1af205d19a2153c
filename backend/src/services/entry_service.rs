//! Yearbook entry business logic.
//!
//! One entry per user; any edit drops the entry back into the moderation
//! queue. Students browse only approved entries of their own batch.

use crate::database::models::{CreateEntryRequest, Entry, PublicUser, UpdateEntryRequest};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::entry_repository::EntryRepository;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct EntryService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> EntryService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_entry(
        &self,
        user: &PublicUser,
        request: CreateEntryRequest,
    ) -> ServiceResult<Entry> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::from_validation(errors));
        }

        EntryRepository::new(self.pool)
            .create_entry(
                &Uuid::now_v7().to_string(),
                &user.id,
                &request.photo_url,
                request.quote.as_deref(),
                request.favourite_memory.as_deref(),
                request.advice.as_deref(),
            )
            .await
            .map_err(|e| ServiceError::from_insert(e, "Entry", &user.id))
    }

    /// Partial update of the caller's own entry; untouched fields keep their
    /// current values.
    pub async fn update_entry(
        &self,
        user: &PublicUser,
        request: UpdateEntryRequest,
    ) -> ServiceResult<Entry> {
        let repo = EntryRepository::new(self.pool);
        let existing = repo
            .get_entry_by_user_id(&user.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Entry", &user.id))?;

        let photo_url = request.photo_url.unwrap_or(existing.photo_url);
        let quote = request.quote.or(existing.quote);
        let favourite_memory = request.favourite_memory.or(existing.favourite_memory);
        let advice = request.advice.or(existing.advice);

        let updated = repo
            .update_entry(
                &existing.id,
                &photo_url,
                quote.as_deref(),
                favourite_memory.as_deref(),
                advice.as_deref(),
            )
            .await?
            .ok_or_else(|| ServiceError::not_found("Entry", &existing.id))?;

        Ok(updated)
    }

    pub async fn get_own_entry(&self, user: &PublicUser) -> ServiceResult<Entry> {
        EntryRepository::new(self.pool)
            .get_entry_by_user_id(&user.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Entry", &user.id))
    }

    /// Approved entries of the caller's own batch.
    pub async fn list_batch_entries(&self, user: &PublicUser) -> ServiceResult<Vec<Entry>> {
        let entries = EntryRepository::new(self.pool)
            .list_approved_by_batch(&user.batch_id)
            .await?;
        Ok(entries)
    }

    // Moderation operations, admin-gated at the routing layer.

    pub async fn list_unapproved(&self) -> ServiceResult<Vec<Entry>> {
        let entries = EntryRepository::new(self.pool).list_unapproved().await?;
        Ok(entries)
    }

    pub async fn approve_entry(&self, entry_id: &str) -> ServiceResult<()> {
        let updated = EntryRepository::new(self.pool)
            .set_approved(entry_id, true)
            .await?;
        if updated == 0 {
            return Err(ServiceError::not_found("Entry", entry_id));
        }
        Ok(())
    }

    pub async fn delete_entry(&self, entry_id: &str) -> ServiceResult<()> {
        let deleted = EntryRepository::new(self.pool).delete_entry(entry_id).await?;
        if deleted == 0 {
            return Err(ServiceError::not_found("Entry", entry_id));
        }
        Ok(())
    }
}

//! Batch business logic: creation, join codes, enrollment rosters.
//!
//! Rosters arrive as JSON arrays of enrollment numbers; spreadsheet parsing
//! happens upstream of this API.

use crate::database::models::{AddEnrollmentsRequest, Batch, CreateBatchRequest};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::batch_repository::BatchRepository;
use crate::repositories::college_repository::CollegeRepository;
use crate::utils::generate_random_string::generate_random_string;
use sqlx::SqlitePool;
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

const JOIN_CODE_LENGTH: usize = 8;

/// First enrollment number repeated within a single request, if any.
fn duplicate_number(numbers: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    numbers
        .iter()
        .find(|number| !seen.insert(number.as_str()))
        .map(String::as_str)
}

pub struct BatchService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> BatchService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_batch(&self, request: CreateBatchRequest) -> ServiceResult<Batch> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::from_validation(errors));
        }

        if let Some(dup) = duplicate_number(&request.enrollment_numbers) {
            return Err(ServiceError::conflict("Enrollment", dup));
        }

        CollegeRepository::new(self.pool)
            .get_college_by_id(&request.college_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("College", &request.college_id))?;

        // Batch and roster land atomically; a roster failure persists nothing.
        let batch = BatchRepository::new(self.pool)
            .create_batch_with_roster(
                &Uuid::now_v7().to_string(),
                &request.college_id,
                &request.name,
                &generate_random_string(JOIN_CODE_LENGTH),
                &request.enrollment_numbers,
            )
            .await
            .map_err(|e| ServiceError::from_insert(e, "Batch", &request.name))?;

        Ok(batch)
    }

    pub async fn add_enrollments(
        &self,
        batch_id: &str,
        request: AddEnrollmentsRequest,
    ) -> ServiceResult<Vec<String>> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::from_validation(errors));
        }

        if let Some(dup) = duplicate_number(&request.enrollment_numbers) {
            return Err(ServiceError::conflict("Enrollment", dup));
        }

        let repo = BatchRepository::new(self.pool);
        repo.get_batch_by_id(batch_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Batch", batch_id))?;

        for number in &request.enrollment_numbers {
            if repo.enrollment_on_roster(batch_id, number).await? {
                return Err(ServiceError::conflict("Enrollment", number));
            }
        }

        // All-or-nothing: a duplicate that raced past the check above rolls
        // back the whole addition.
        repo.add_enrollments(batch_id, &request.enrollment_numbers)
            .await
            .map_err(|e| {
                ServiceError::from_insert(e, "Enrollment", request.enrollment_numbers.join(", "))
            })?;

        let roster = repo.list_roster(batch_id).await?;
        Ok(roster)
    }

    pub async fn get_batch_required(&self, id: &str) -> ServiceResult<Batch> {
        BatchRepository::new(self.pool)
            .get_batch_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Batch", id))
    }

    pub async fn list_batches_by_college(&self, college_id: &str) -> ServiceResult<Vec<Batch>> {
        let batches = BatchRepository::new(self.pool)
            .list_batches_by_college(college_id)
            .await?;
        Ok(batches)
    }

    pub async fn list_roster(&self, batch_id: &str) -> ServiceResult<Vec<String>> {
        self.get_batch_required(batch_id).await?;
        let roster = BatchRepository::new(self.pool).list_roster(batch_id).await?;
        Ok(roster)
    }

    /// Rotates the join code, cutting off registrations using the old one.
    pub async fn regenerate_join_code(&self, batch_id: &str) -> ServiceResult<Batch> {
        let repo = BatchRepository::new(self.pool);
        repo.get_batch_by_id(batch_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Batch", batch_id))?;

        repo.set_join_code(batch_id, &generate_random_string(JOIN_CODE_LENGTH))
            .await?;
        self.get_batch_required(batch_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::test_pool;

    async fn seed_college(pool: &SqlitePool) {
        CollegeRepository::new(pool)
            .create_college("col-1", "Test College")
            .await
            .unwrap();
    }

    fn create_request(numbers: &[&str]) -> CreateBatchRequest {
        CreateBatchRequest {
            college_id: "col-1".to_string(),
            name: "2021-2025".to_string(),
            enrollment_numbers: numbers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn batch_creation_populates_roster_and_join_code() {
        let pool = test_pool().await;
        seed_college(&pool).await;
        let service = BatchService::new(&pool);

        let batch = service
            .create_batch(create_request(&["EN-001", "EN-002"]))
            .await
            .unwrap();
        assert_eq!(batch.join_code.len(), 8);

        let roster = service.list_roster(&batch.id).await.unwrap();
        assert_eq!(roster, vec!["EN-001", "EN-002"]);
    }

    #[tokio::test]
    async fn duplicate_enrollment_in_batch_conflicts() {
        let pool = test_pool().await;
        seed_college(&pool).await;
        let service = BatchService::new(&pool);

        let batch = service.create_batch(create_request(&["EN-001"])).await.unwrap();
        let dup = service
            .add_enrollments(
                &batch.id,
                AddEnrollmentsRequest {
                    enrollment_numbers: vec!["EN-001".to_string()],
                },
            )
            .await;
        assert!(matches!(dup, Err(ServiceError::Conflict { .. })));
    }

    #[tokio::test]
    async fn regenerated_join_code_replaces_the_old_one() {
        let pool = test_pool().await;
        seed_college(&pool).await;
        let service = BatchService::new(&pool);

        let batch = service.create_batch(create_request(&["EN-001"])).await.unwrap();
        let rotated = service.regenerate_join_code(&batch.id).await.unwrap();
        assert_ne!(batch.join_code, rotated.join_code);
    }

    #[tokio::test]
    async fn failed_batch_creation_persists_nothing() {
        let pool = test_pool().await;
        seed_college(&pool).await;
        let service = BatchService::new(&pool);

        let result = service
            .create_batch(create_request(&["EN-001", "EN-002", "EN-001"]))
            .await;
        assert!(matches!(result, Err(ServiceError::Conflict { .. })));

        // Neither the batch row nor a partial roster survives the failure.
        let batches = service.list_batches_by_college("col-1").await.unwrap();
        assert!(batches.is_empty());
    }

    #[tokio::test]
    async fn failed_enrollment_addition_is_all_or_nothing() {
        let pool = test_pool().await;
        seed_college(&pool).await;
        let service = BatchService::new(&pool);

        let batch = service.create_batch(create_request(&["EN-001"])).await.unwrap();
        let result = service
            .add_enrollments(
                &batch.id,
                AddEnrollmentsRequest {
                    enrollment_numbers: vec!["EN-002".to_string(), "EN-001".to_string()],
                },
            )
            .await;
        assert!(matches!(result, Err(ServiceError::Conflict { .. })));

        let roster = service.list_roster(&batch.id).await.unwrap();
        assert_eq!(roster, vec!["EN-001"]);
    }

    #[tokio::test]
    async fn unknown_college_is_not_found() {
        let pool = test_pool().await;
        let service = BatchService::new(&pool);
        let missing = service.create_batch(create_request(&["EN-001"])).await;
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
    }
}

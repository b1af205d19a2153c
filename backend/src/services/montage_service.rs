//! Montage job submission.
//!
//! The core only enqueues work through the `MontageQueue` capability; the
//! rendering worker lives outside this process and is out of scope here.

use crate::database::models::{MontageJob, MontageStatus, PublicUser, SubmitMontageRequest};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::montage_repository::MontageRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

/// Opaque submit-job capability. Keeps the service independent of how jobs
/// are actually queued.
#[async_trait]
pub trait MontageQueue: Send + Sync {
    async fn submit(&self, user_id: &str, photo_urls: &[String]) -> ServiceResult<MontageJob>;
}

/// Queue implementation backed by the montage_jobs table.
pub struct SqliteMontageQueue<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SqliteMontageQueue<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MontageQueue for SqliteMontageQueue<'_> {
    async fn submit(&self, user_id: &str, photo_urls: &[String]) -> ServiceResult<MontageJob> {
        let photo_urls_json =
            serde_json::to_string(photo_urls).map_err(|e| ServiceError::Internal {
                source: anyhow::anyhow!("photo url serialization failed: {e}"),
            })?;

        let job = MontageRepository::new(self.pool)
            .create_job(&Uuid::now_v7().to_string(), user_id, &photo_urls_json)
            .await?;

        Ok(job)
    }
}

/// Client-facing job view with the photo list decoded.
#[derive(Debug, Serialize)]
pub struct MontageJobView {
    pub id: String,
    pub photo_urls: Vec<String>,
    pub status: MontageStatus,
    pub result_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MontageJob> for MontageJobView {
    type Error = ServiceError;

    fn try_from(job: MontageJob) -> Result<Self, Self::Error> {
        let photo_urls =
            serde_json::from_str(&job.photo_urls).map_err(|e| ServiceError::Internal {
                source: anyhow::anyhow!("stored photo urls are not valid JSON: {e}"),
            })?;
        Ok(MontageJobView {
            id: job.id,
            photo_urls,
            status: job.status,
            result_url: job.result_url,
            created_at: job.created_at,
        })
    }
}

pub struct MontageService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MontageService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn submit_montage(
        &self,
        user: &PublicUser,
        request: SubmitMontageRequest,
    ) -> ServiceResult<MontageJobView> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::from_validation(errors));
        }

        let queue = SqliteMontageQueue::new(self.pool);
        let job = queue.submit(&user.id, &request.photo_urls).await?;
        job.try_into()
    }

    /// Jobs are private to their owner.
    pub async fn get_job(&self, user: &PublicUser, job_id: &str) -> ServiceResult<MontageJobView> {
        let job = MontageRepository::new(self.pool)
            .get_job_by_id(job_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Montage job", job_id))?;

        if job.user_id != user.id {
            return Err(ServiceError::forbidden("not your montage job"));
        }

        job.try_into()
    }

    pub async fn list_jobs(&self, user: &PublicUser) -> ServiceResult<Vec<MontageJobView>> {
        let jobs = MontageRepository::new(self.pool)
            .list_jobs_by_user(&user.id)
            .await?;
        jobs.into_iter().map(MontageJobView::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::CreateUserRecord;
    use crate::database::test_support::test_pool;
    use crate::repositories::batch_repository::BatchRepository;
    use crate::repositories::college_repository::CollegeRepository;
    use crate::repositories::user_repository::UserRepository;

    async fn seed_user(pool: &SqlitePool, id: &str, en: &str) -> PublicUser {
        if CollegeRepository::new(pool)
            .get_college_by_id("col-1")
            .await
            .unwrap()
            .is_none()
        {
            CollegeRepository::new(pool)
                .create_college("col-1", "Test College")
                .await
                .unwrap();
            BatchRepository::new(pool)
                .create_batch("batch-1", "col-1", "2021-2025", "CODE")
                .await
                .unwrap();
        }
        UserRepository::new(pool)
            .create_user(CreateUserRecord {
                id: id.to_string(),
                name: "Ada".to_string(),
                email: format!("{id}@x.com"),
                password_hash: "hash".to_string(),
                enrollment_number: en.to_string(),
                batch_id: "batch-1".to_string(),
            })
            .await
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn submitted_job_is_queued_with_decoded_photo_list() {
        let pool = test_pool().await;
        let ada = seed_user(&pool, "u-1", "EN-001").await;
        let service = MontageService::new(&pool);

        let job = service
            .submit_montage(
                &ada,
                SubmitMontageRequest {
                    photo_urls: vec!["https://cdn.example/1.jpg".to_string()],
                },
            )
            .await
            .unwrap();

        assert_eq!(job.status, MontageStatus::Queued);
        assert_eq!(job.photo_urls, vec!["https://cdn.example/1.jpg"]);

        let fetched = service.get_job(&ada, &job.id).await.unwrap();
        assert_eq!(fetched.id, job.id);
    }

    #[tokio::test]
    async fn jobs_are_private_to_their_owner() {
        let pool = test_pool().await;
        let ada = seed_user(&pool, "u-1", "EN-001").await;
        let bob = seed_user(&pool, "u-2", "EN-002").await;
        let service = MontageService::new(&pool);

        let job = service
            .submit_montage(
                &ada,
                SubmitMontageRequest {
                    photo_urls: vec!["https://cdn.example/1.jpg".to_string()],
                },
            )
            .await
            .unwrap();

        let denied = service.get_job(&bob, &job.id).await;
        assert!(matches!(denied, Err(ServiceError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn completed_job_exposes_result_url() {
        let pool = test_pool().await;
        let ada = seed_user(&pool, "u-1", "EN-001").await;
        let service = MontageService::new(&pool);

        let job = service
            .submit_montage(
                &ada,
                SubmitMontageRequest {
                    photo_urls: vec!["https://cdn.example/1.jpg".to_string()],
                },
            )
            .await
            .unwrap();

        // The rendering worker reports completion through the repository.
        MontageRepository::new(&pool)
            .set_status(
                &job.id,
                MontageStatus::Done,
                Some("https://cdn.example/montage.mp4"),
            )
            .await
            .unwrap();

        let fetched = service.get_job(&ada, &job.id).await.unwrap();
        assert_eq!(fetched.status, MontageStatus::Done);
        assert_eq!(
            fetched.result_url.as_deref(),
            Some("https://cdn.example/montage.mp4")
        );
    }
}

//! Handler functions for photo montage job submission and tracking.

use crate::api::common::{ApiResponse, require_user, service_error_to_http};
use crate::auth::models::AuthPrincipal;
use crate::database::models::SubmitMontageRequest;
use crate::services::montage_service::{MontageJobView, MontageService};
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

#[axum::debug_handler]
pub async fn submit_montage(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(payload): Json<SubmitMontageRequest>,
) -> Result<ResponseJson<ApiResponse<MontageJobView>>, (StatusCode, String)> {
    let user = require_user(&principal)?;
    let service = MontageService::new(&pool);

    match service.submit_montage(user, payload).await {
        Ok(job) => Ok(ResponseJson(ApiResponse::success(
            job,
            "Montage job queued",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_montage_job(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<MontageJobView>>, (StatusCode, String)> {
    let user = require_user(&principal)?;
    let service = MontageService::new(&pool);

    match service.get_job(user, &id).await {
        Ok(job) => Ok(ResponseJson(ApiResponse::ok(job))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_montage_jobs(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<ResponseJson<ApiResponse<Vec<MontageJobView>>>, (StatusCode, String)> {
    let user = require_user(&principal)?;
    let service = MontageService::new(&pool);

    match service.list_jobs(user).await {
        Ok(jobs) => Ok(ResponseJson(ApiResponse::ok(jobs))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

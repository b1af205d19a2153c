//! Handler functions for batch and roster management API endpoints.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::database::models::{AddEnrollmentsRequest, Batch, CreateBatchRequest, PublicUser};
use crate::services::batch_service::BatchService;
use crate::services::user_service::UserService;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

#[axum::debug_handler]
pub async fn create_batch(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateBatchRequest>,
) -> Result<ResponseJson<ApiResponse<Batch>>, (StatusCode, String)> {
    let service = BatchService::new(&pool);

    match service.create_batch(payload).await {
        Ok(batch) => Ok(ResponseJson(ApiResponse::success(
            batch,
            "Batch created successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_batch(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Batch>>, (StatusCode, String)> {
    let service = BatchService::new(&pool);

    match service.get_batch_required(&id).await {
        Ok(batch) => Ok(ResponseJson(ApiResponse::ok(batch))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_batches_by_college(
    Extension(pool): Extension<SqlitePool>,
    Path(college_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Vec<Batch>>>, (StatusCode, String)> {
    let service = BatchService::new(&pool);

    match service.list_batches_by_college(&college_id).await {
        Ok(batches) => Ok(ResponseJson(ApiResponse::ok(batches))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_roster(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Vec<String>>>, (StatusCode, String)> {
    let service = BatchService::new(&pool);

    match service.list_roster(&id).await {
        Ok(roster) => Ok(ResponseJson(ApiResponse::ok(roster))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn add_enrollments(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<AddEnrollmentsRequest>,
) -> Result<ResponseJson<ApiResponse<Vec<String>>>, (StatusCode, String)> {
    let service = BatchService::new(&pool);

    match service.add_enrollments(&id, payload).await {
        Ok(roster) => Ok(ResponseJson(ApiResponse::success(
            roster,
            "Enrollments added successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_members(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Vec<PublicUser>>>, (StatusCode, String)> {
    let service = UserService::new(&pool);

    match service.list_batch_members(&id).await {
        Ok(members) => Ok(ResponseJson(ApiResponse::ok(members))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn verify_member(
    Extension(pool): Extension<SqlitePool>,
    Path(user_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<PublicUser>>, (StatusCode, String)> {
    let service = UserService::new(&pool);

    match service.verify_user(&user_id).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(
            user,
            "Member verified",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn regenerate_join_code(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Batch>>, (StatusCode, String)> {
    let service = BatchService::new(&pool);

    match service.regenerate_join_code(&id).await {
        Ok(batch) => Ok(ResponseJson(ApiResponse::success(
            batch,
            "Join code regenerated",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

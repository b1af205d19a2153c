//! Handler functions for college management API endpoints.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::database::models::{College, CreateCollegeRequest};
use crate::services::college_service::CollegeService;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

#[axum::debug_handler]
pub async fn create_college(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateCollegeRequest>,
) -> Result<ResponseJson<ApiResponse<College>>, (StatusCode, String)> {
    let service = CollegeService::new(&pool);

    match service.create_college(payload).await {
        Ok(college) => Ok(ResponseJson(ApiResponse::success(
            college,
            "College created successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_colleges(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<ApiResponse<Vec<College>>>, (StatusCode, String)> {
    let service = CollegeService::new(&pool);

    match service.list_colleges().await {
        Ok(colleges) => Ok(ResponseJson(ApiResponse::ok(colleges))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_college(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<College>>, (StatusCode, String)> {
    let service = CollegeService::new(&pool);

    match service.get_college_required(&id).await {
        Ok(college) => Ok(ResponseJson(ApiResponse::ok(college))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn delete_college(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = CollegeService::new(&pool);

    match service.delete_college(&id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            (),
            "College deleted successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

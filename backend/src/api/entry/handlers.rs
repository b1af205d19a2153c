//! Handler functions for yearbook entry CRUD and moderation.

use crate::api::common::{ApiResponse, require_user, service_error_to_http};
use crate::auth::models::AuthPrincipal;
use crate::database::models::{CreateEntryRequest, Entry, UpdateEntryRequest};
use crate::services::entry_service::EntryService;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

#[axum::debug_handler]
pub async fn create_entry(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<ResponseJson<ApiResponse<Entry>>, (StatusCode, String)> {
    let user = require_user(&principal)?;
    let service = EntryService::new(&pool);

    match service.create_entry(user, payload).await {
        Ok(entry) => Ok(ResponseJson(ApiResponse::success(
            entry,
            "Entry created successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn update_entry(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(payload): Json<UpdateEntryRequest>,
) -> Result<ResponseJson<ApiResponse<Entry>>, (StatusCode, String)> {
    let user = require_user(&principal)?;
    let service = EntryService::new(&pool);

    match service.update_entry(user, payload).await {
        Ok(entry) => Ok(ResponseJson(ApiResponse::success(
            entry,
            "Entry updated; it will be re-reviewed before publishing",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_own_entry(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<ResponseJson<ApiResponse<Entry>>, (StatusCode, String)> {
    let user = require_user(&principal)?;
    let service = EntryService::new(&pool);

    match service.get_own_entry(user).await {
        Ok(entry) => Ok(ResponseJson(ApiResponse::ok(entry))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_batch_entries(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<ResponseJson<ApiResponse<Vec<Entry>>>, (StatusCode, String)> {
    let user = require_user(&principal)?;
    let service = EntryService::new(&pool);

    match service.list_batch_entries(user).await {
        Ok(entries) => Ok(ResponseJson(ApiResponse::ok(entries))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_pending_entries(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<ApiResponse<Vec<Entry>>>, (StatusCode, String)> {
    let service = EntryService::new(&pool);

    match service.list_unapproved().await {
        Ok(entries) => Ok(ResponseJson(ApiResponse::ok(entries))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn approve_entry(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = EntryService::new(&pool);

    match service.approve_entry(&id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            (),
            "Entry approved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn delete_entry(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = EntryService::new(&pool);

    match service.delete_entry(&id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            (),
            "Entry deleted successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

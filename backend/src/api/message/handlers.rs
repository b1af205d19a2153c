//! Handler functions for signed and anonymous messages between batchmates.

use crate::api::common::{ApiResponse, require_user, service_error_to_http};
use crate::auth::models::AuthPrincipal;
use crate::database::models::{Message, SendMessageRequest};
use crate::services::message_service::{InboxMessage, MessageService};
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

#[axum::debug_handler]
pub async fn send_message(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<ResponseJson<ApiResponse<Message>>, (StatusCode, String)> {
    let user = require_user(&principal)?;
    let service = MessageService::new(&pool);

    match service.send_message(user, payload).await {
        Ok(message) => Ok(ResponseJson(ApiResponse::success(
            message,
            "Message sent successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_inbox(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<ResponseJson<ApiResponse<Vec<InboxMessage>>>, (StatusCode, String)> {
    let user = require_user(&principal)?;
    let service = MessageService::new(&pool);

    match service.list_inbox(user).await {
        Ok(messages) => Ok(ResponseJson(ApiResponse::ok(messages))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_sent(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<ResponseJson<ApiResponse<Vec<Message>>>, (StatusCode, String)> {
    let user = require_user(&principal)?;
    let service = MessageService::new(&pool);

    match service.list_sent(user).await {
        Ok(messages) => Ok(ResponseJson(ApiResponse::ok(messages))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

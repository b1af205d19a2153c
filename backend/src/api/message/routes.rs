//! Defines the HTTP routes for batchmate messages. All routes require a
//! signed-in student.

use super::handlers::{list_inbox, list_sent, send_message};
use crate::auth::middleware::require_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn message_router() -> Router {
    Router::new()
        .route("/", post(send_message))
        .route("/inbox", get(list_inbox))
        .route("/sent", get(list_sent))
        .layer(middleware::from_fn(require_auth))
}

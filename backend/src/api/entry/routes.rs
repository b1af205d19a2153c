//! Defines the HTTP routes for yearbook entries.
//!
//! Students manage their own entry and browse their batch's approved
//! entries; the moderation queue lives under `/moderation` and is
//! admin-only.

use super::handlers::{
    approve_entry, create_entry, delete_entry, get_own_entry, list_batch_entries,
    list_pending_entries, update_entry,
};
use crate::auth::middleware::{require_admin, require_auth};
use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

pub fn entry_router() -> Router {
    let student = Router::new()
        .route("/", post(create_entry))
        .route("/", put(update_entry))
        .route("/me", get(get_own_entry))
        .route("/batch", get(list_batch_entries));

    let moderation = Router::new()
        .route("/pending", get(list_pending_entries))
        .route("/{id}/approve", post(approve_entry))
        .route("/{id}", delete(delete_entry))
        .layer(middleware::from_fn(require_admin));

    student
        .nest("/moderation", moderation)
        .layer(middleware::from_fn(require_auth))
}

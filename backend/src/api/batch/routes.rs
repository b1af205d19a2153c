//! Defines the HTTP routes for batch and roster management.
//!
//! Every batch operation is admin-only; students never see join codes
//! or rosters directly.

use super::handlers::{
    add_enrollments, create_batch, get_batch, list_batches_by_college, list_members, list_roster,
    regenerate_join_code, verify_member,
};
use crate::auth::middleware::{require_admin, require_auth};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn batch_router() -> Router {
    Router::new()
        .route("/", post(create_batch))
        .route("/college/{college_id}", get(list_batches_by_college))
        .route("/{id}", get(get_batch))
        .route("/{id}/roster", get(list_roster))
        .route("/{id}/enrollments", post(add_enrollments))
        .route("/{id}/members", get(list_members))
        .route("/members/{user_id}/verify", post(verify_member))
        .route("/{id}/regenerate-code", post(regenerate_join_code))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn(require_auth))
}

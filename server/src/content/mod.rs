//! Organization Content
//!
//! Posts and events gated by privacy descriptors.

pub mod error;
pub mod handlers;
pub mod types;

use axum::routing::{get, patch};
use axum::Router;

use crate::api::AppState;

/// Create content routes.
///
/// Nested under `/api/orgs/{org_id}` in the main router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route("/posts/{id}", get(handlers::get_post))
        .route("/posts/{id}/privacy", patch(handlers::update_post_privacy))
        .route(
            "/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route("/events/{id}", get(handlers::get_event))
        .route("/events/{id}/privacy", patch(handlers::update_event_privacy))
}

//! Organization Access Endpoints
//!
//! Policy evaluation, permission checks, and the caller's standing in an organization.

pub mod error;
pub mod handlers;
pub mod types;

use axum::routing::{get, post};
use axum::Router;

use crate::api::AppState;

/// Create organization access routes.
///
/// Nested under `/api/orgs/{org_id}` in the main router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/access/evaluate", post(handlers::evaluate_access))
        .route("/permissions/{key}", get(handlers::check_permission))
        .route("/me", get(handlers::get_my_membership))
        .route("/roles", get(handlers::list_roles))
}

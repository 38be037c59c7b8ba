//! Organization Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::permissions::PermissionError;

#[derive(Debug, thiserror::Error)]
pub enum OrganizationError {
    #[error("Organization not found")]
    NotFound,

    #[error("Not a member of this organization")]
    NotMember,

    #[error("{0}")]
    Permission(#[from] PermissionError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for OrganizationError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                serde_json::json!({"error": "organization_not_found", "message": "Organization not found"}),
            ),
            Self::NotMember => (
                StatusCode::NOT_FOUND,
                serde_json::json!({"error": "not_member", "message": "Not a member of this organization"}),
            ),
            Self::Permission(e) => permission_error_body(e),
            Self::Database(err) => {
                tracing::error!("Database error in organizations: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({"error": "database_error", "message": "Database error"}),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Status and body for a policy failure.
///
/// Shared by every module that surfaces `PermissionError`.
pub fn permission_error_body(err: &PermissionError) -> (StatusCode, serde_json::Value) {
    match err {
        PermissionError::MissingPermission(key) => (
            StatusCode::FORBIDDEN,
            serde_json::json!({
                "error": "missing_permission",
                "required": key,
                "message": err.to_string()
            }),
        ),
        PermissionError::NotMember => (
            StatusCode::FORBIDDEN,
            serde_json::json!({"error": "not_member", "message": err.to_string()}),
        ),
        PermissionError::LookupFailed(source) => {
            tracing::error!(error = %source, "Access lookup failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({
                    "error": "lookup_failed",
                    "message": "Access could not be determined, try again"
                }),
            )
        }
    }
}

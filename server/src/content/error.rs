//! Content Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::organizations::error::permission_error_body;
use crate::permissions::PermissionError;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Missing, or hidden from the caller.
    #[error("Not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    Permission(#[from] PermissionError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                serde_json::json!({"error": "not_found", "message": "Not found"}),
            ),
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": "validation_failed", "message": errors.to_string()}),
            ),
            Self::Permission(e) => permission_error_body(e),
            Self::Database(err) => {
                tracing::error!("Database error in content: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({"error": "database_error", "message": "Database error"}),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

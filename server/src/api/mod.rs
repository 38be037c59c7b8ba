//! API Router and Application State
//!
//! Central routing configuration and shared state.

use std::sync::Arc;

use axum::{
    http::HeaderValue, middleware::from_fn_with_state, routing::get, Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth, config::Config, content, organizations};
use crate::permissions::{pg_policy, PgAccessPolicy};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Server configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Access policy for the current request.
    #[must_use]
    pub fn policy(&self) -> PgAccessPolicy {
        pg_policy(&self.db)
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Organization-scoped routes; handlers choose between `AuthUser` and `Option<AuthUser>`
    let org_routes = Router::new()
        .merge(organizations::router())
        .merge(content::router());

    let api_routes = Router::new()
        .route(
            "/api/permissions",
            get(organizations::handlers::list_permission_catalog),
        )
        .nest("/api/orgs/{org_id}", org_routes)
        .layer(from_fn_with_state(state.clone(), auth::optional_auth));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .merge(api_routes)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        // State
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match &config.cors_allowed_origins {
        Some(origins) => AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok())
                .collect::<Vec<_>>(),
        ),
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

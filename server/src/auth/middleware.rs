//! Authentication Middleware

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;

use super::error::AuthError;
use super::jwt::validate_access_token;

/// Authenticated caller injected into request extensions.
///
/// Identity is owned by the external auth provider, so only the user ID is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    /// User ID (token subject).
    pub id: Uuid,
}

/// Middleware that authenticates the caller when credentials are present.
///
/// Requests without an Authorization header pass through anonymously; a
/// header that is present but malformed, expired, or badly signed is rejected.
/// Handlers decide whether they need a caller by extracting `AuthUser` or
/// `Option<AuthUser>`.
///
/// # Usage
///
/// ```ignore
/// Router::new()
///     .route("/posts", get(list_posts))
///     .layer(axum::middleware::from_fn_with_state(state, optional_auth))
/// ```
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(auth_header) = request.headers().get(AUTHORIZATION) else {
        return Ok(next.run(request).await);
    };

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AuthError::InvalidAuthHeader)?;

    let claims = validate_access_token(token, &state.config.jwt_public_key)?;
    let auth_user = AuthUser {
        id: claims.user_id()?,
    };

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extractor for endpoints that require a caller.
///
/// ```ignore
/// async fn protected_handler(auth_user: AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", auth_user.id)
/// }
/// ```
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .copied()
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// Extractor for endpoints that also serve anonymous callers.
impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().copied())
    }
}

//! Content HTTP Handlers
//!
//! Reads filter by the caller's access context; writes require a management permission.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use sqlx::types::Json as SqlJson;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::permissions::{catalog, parse_privacy, MemberAccessContext};

use super::error::ContentError;
use super::types::{
    CreateEventRequest, CreatePostRequest, EventResponse, EventRow, ListQuery, PostResponse,
    PostRow, UpdatePrivacyRequest,
};

const POST_COLUMNS: &str =
    "id, organization_id, author_id, title, body, privacy, created_at, updated_at";
const EVENT_COLUMNS: &str = "id, organization_id, created_by, title, description, location, \
     starts_at, ends_at, privacy, created_at";

// ============================================================================
// Posts
// ============================================================================

/// List posts visible to the caller, newest first.
///
/// GET /api/orgs/{org_id}/posts
///
/// Scans in batches of `limit` until `limit` visible posts are collected or
/// the organization has no more. Pass the last returned id as `after` for the
/// next page.
#[tracing::instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    auth_user: Option<AuthUser>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PostResponse>>, ContentError> {
    let ctx = state
        .policy()
        .member_context(auth_user.map(|u| u.id), org_id)
        .await?;
    let limit = query.limit(state.config.max_items_per_page);
    let page_size = usize::try_from(limit).unwrap_or(usize::MAX);

    let mut position =
        cursor_position(&state.db, &ctx, "posts", "created_at", org_id, query.after).await?;
    let mut posts = Vec::new();

    loop {
        let (created_at, id) = position.unzip();
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE organization_id = $1 \
             AND ($2::timestamptz IS NULL OR (created_at, id) < ($2, $3::uuid)) \
             ORDER BY created_at DESC, id DESC LIMIT $4"
        ))
        .bind(org_id)
        .bind(created_at)
        .bind(id)
        .bind(limit)
        .fetch_all(&state.db)
        .await?;

        let exhausted = rows.len() < page_size;
        position = rows.last().map(|row| (row.created_at, row.id));

        posts.extend(rows.into_iter().filter_map(|row| {
            let privacy = row.privacy();
            ctx.can_view(&privacy)
                .then(|| PostResponse::new(row, privacy))
        }));

        if exhausted || posts.len() >= page_size {
            break;
        }
    }

    posts.truncate(page_size);
    Ok(Json(posts))
}

/// Get a single post.
///
/// GET /api/orgs/{org_id}/posts/{id}
///
/// Hidden posts are reported as not found.
#[tracing::instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    auth_user: Option<AuthUser>,
    Path((org_id, post_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PostResponse>, ContentError> {
    let row = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE organization_id = $1 AND id = $2"
    ))
    .bind(org_id)
    .bind(post_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(ContentError::NotFound)?;

    let privacy = row.privacy();
    let allowed = state
        .policy()
        .evaluate(auth_user.map(|u| u.id), org_id, &privacy)
        .await?;
    if !allowed {
        return Err(ContentError::NotFound);
    }

    Ok(Json(PostResponse::new(row, privacy)))
}

/// Create a post.
///
/// POST /api/orgs/{org_id}/posts
///
/// Requires `manage_posts`.
#[tracing::instrument(skip(state, request))]
pub async fn create_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ContentError> {
    request.validate()?;

    state
        .policy()
        .require_permission(auth_user.id, org_id, catalog::MANAGE_POSTS)
        .await?;

    let row = sqlx::query_as::<_, PostRow>(&format!(
        "INSERT INTO posts (organization_id, author_id, title, body, privacy) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {POST_COLUMNS}"
    ))
    .bind(org_id)
    .bind(auth_user.id)
    .bind(request.title.trim())
    .bind(&request.body)
    .bind(SqlJson(&request.privacy))
    .fetch_one(&state.db)
    .await?;

    info!(post_id = %row.id, "Post created");

    Ok((StatusCode::CREATED, Json(PostResponse::new(row, request.privacy))))
}

/// Replace a post's privacy descriptor.
///
/// PATCH /api/orgs/{org_id}/posts/{id}/privacy
///
/// Requires `manage_posts`.
#[tracing::instrument(skip(state, request))]
pub async fn update_post_privacy(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((org_id, post_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdatePrivacyRequest>,
) -> Result<Json<PostResponse>, ContentError> {
    request.validate()?;

    state
        .policy()
        .require_permission(auth_user.id, org_id, catalog::MANAGE_POSTS)
        .await?;

    let row = sqlx::query_as::<_, PostRow>(&format!(
        "UPDATE posts SET privacy = $3, updated_at = NOW() \
         WHERE organization_id = $1 AND id = $2 RETURNING {POST_COLUMNS}"
    ))
    .bind(org_id)
    .bind(post_id)
    .bind(SqlJson(&request.privacy))
    .fetch_optional(&state.db)
    .await?
    .ok_or(ContentError::NotFound)?;

    info!(post_id = %row.id, "Post privacy updated");

    Ok(Json(PostResponse::new(row, request.privacy)))
}

// ============================================================================
// Events
// ============================================================================

/// List events visible to the caller, soonest first.
///
/// GET /api/orgs/{org_id}/events
///
/// Pages the same way as posts, ordered by `starts_at`.
#[tracing::instrument(skip(state))]
pub async fn list_events(
    State(state): State<AppState>,
    auth_user: Option<AuthUser>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<EventResponse>>, ContentError> {
    let ctx = state
        .policy()
        .member_context(auth_user.map(|u| u.id), org_id)
        .await?;
    let limit = query.limit(state.config.max_items_per_page);
    let page_size = usize::try_from(limit).unwrap_or(usize::MAX);

    let mut position =
        cursor_position(&state.db, &ctx, "events", "starts_at", org_id, query.after).await?;
    let mut events = Vec::new();

    loop {
        let (starts_at, id) = position.unzip();
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE organization_id = $1 \
             AND ($2::timestamptz IS NULL OR (starts_at, id) > ($2, $3::uuid)) \
             ORDER BY starts_at ASC, id ASC LIMIT $4"
        ))
        .bind(org_id)
        .bind(starts_at)
        .bind(id)
        .bind(limit)
        .fetch_all(&state.db)
        .await?;

        let exhausted = rows.len() < page_size;
        position = rows.last().map(|row| (row.starts_at, row.id));

        events.extend(rows.into_iter().filter_map(|row| {
            let privacy = row.privacy();
            ctx.can_view(&privacy)
                .then(|| EventResponse::new(row, privacy))
        }));

        if exhausted || events.len() >= page_size {
            break;
        }
    }

    events.truncate(page_size);
    Ok(Json(events))
}

/// Get a single event.
///
/// GET /api/orgs/{org_id}/events/{id}
#[tracing::instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    auth_user: Option<AuthUser>,
    Path((org_id, event_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EventResponse>, ContentError> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE organization_id = $1 AND id = $2"
    ))
    .bind(org_id)
    .bind(event_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(ContentError::NotFound)?;

    let privacy = row.privacy();
    let allowed = state
        .policy()
        .evaluate(auth_user.map(|u| u.id), org_id, &privacy)
        .await?;
    if !allowed {
        return Err(ContentError::NotFound);
    }

    Ok(Json(EventResponse::new(row, privacy)))
}

/// Create an event.
///
/// POST /api/orgs/{org_id}/events
///
/// Requires `manage_events`.
#[tracing::instrument(skip(state, request))]
pub async fn create_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ContentError> {
    request.validate()?;

    state
        .policy()
        .require_permission(auth_user.id, org_id, catalog::MANAGE_EVENTS)
        .await?;

    let row = sqlx::query_as::<_, EventRow>(&format!(
        "INSERT INTO events (organization_id, created_by, title, description, location, \
         starts_at, ends_at, privacy) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {EVENT_COLUMNS}"
    ))
    .bind(org_id)
    .bind(auth_user.id)
    .bind(request.title.trim())
    .bind(&request.description)
    .bind(&request.location)
    .bind(request.starts_at)
    .bind(request.ends_at)
    .bind(SqlJson(&request.privacy))
    .fetch_one(&state.db)
    .await?;

    info!(event_id = %row.id, "Event created");

    Ok((StatusCode::CREATED, Json(EventResponse::new(row, request.privacy))))
}

/// Replace an event's privacy descriptor.
///
/// PATCH /api/orgs/{org_id}/events/{id}/privacy
///
/// Requires `manage_events`.
#[tracing::instrument(skip(state, request))]
pub async fn update_event_privacy(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((org_id, event_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdatePrivacyRequest>,
) -> Result<Json<EventResponse>, ContentError> {
    request.validate()?;

    state
        .policy()
        .require_permission(auth_user.id, org_id, catalog::MANAGE_EVENTS)
        .await?;

    let row = sqlx::query_as::<_, EventRow>(&format!(
        "UPDATE events SET privacy = $3 \
         WHERE organization_id = $1 AND id = $2 RETURNING {EVENT_COLUMNS}"
    ))
    .bind(org_id)
    .bind(event_id)
    .bind(SqlJson(&request.privacy))
    .fetch_optional(&state.db)
    .await?
    .ok_or(ContentError::NotFound)?;

    info!(event_id = %row.id, "Event privacy updated");

    Ok(Json(EventResponse::new(row, request.privacy)))
}

// ============================================================================
// Paging
// ============================================================================

/// Resolve an `after` cursor to its `(order_column, id)` keyset position.
///
/// `table` and `order_column` are fixed identifiers from this module. A cursor
/// that is missing or hidden from the caller is reported as not found.
async fn cursor_position(
    pool: &PgPool,
    ctx: &MemberAccessContext,
    table: &str,
    order_column: &str,
    org_id: Uuid,
    after: Option<Uuid>,
) -> Result<Option<(DateTime<Utc>, Uuid)>, ContentError> {
    let Some(after) = after else {
        return Ok(None);
    };

    let (position, id, privacy) =
        sqlx::query_as::<_, (DateTime<Utc>, Uuid, Option<serde_json::Value>)>(&format!(
            "SELECT {order_column}, id, privacy FROM {table} \
             WHERE organization_id = $1 AND id = $2"
        ))
        .bind(org_id)
        .bind(after)
        .fetch_optional(pool)
        .await?
        .ok_or(ContentError::NotFound)?;

    if !ctx.can_view(&parse_privacy(privacy.as_ref())) {
        return Err(ContentError::NotFound);
    }

    Ok(Some((position, id)))
}

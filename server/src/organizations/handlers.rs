//! Organization Access HTTP Handlers

use axum::extract::{Path, State};
use axum::Json;
use ob_common::{AccessDecision, EvaluateAccessRequest, PermissionCheck};
use uuid::Uuid;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::permissions::{
    catalog, find_membership_tier, find_organization, find_role, list_permissions,
    list_roles_with_permissions, parse_privacy, Permission,
};

use super::error::OrganizationError;
use super::types::{MembershipResponse, RoleResponse};

/// Evaluate a privacy descriptor for the caller.
///
/// POST /api/orgs/{org_id}/access/evaluate
///
/// Anonymous callers are evaluated as non-members.
#[tracing::instrument(skip(state, request))]
pub async fn evaluate_access(
    State(state): State<AppState>,
    auth_user: Option<AuthUser>,
    Path(org_id): Path<Uuid>,
    Json(request): Json<EvaluateAccessRequest>,
) -> Result<Json<AccessDecision>, OrganizationError> {
    let privacy = parse_privacy(request.privacy.as_ref());

    let allowed = state
        .policy()
        .evaluate(auth_user.map(|u| u.id), org_id, &privacy)
        .await?;

    Ok(Json(AccessDecision { allowed }))
}

/// Check whether the caller's role grants a permission key.
///
/// GET /api/orgs/{org_id}/permissions/{key}
#[tracing::instrument(skip(state))]
pub async fn check_permission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((org_id, key)): Path<(Uuid, String)>,
) -> Result<Json<PermissionCheck>, OrganizationError> {
    let allowed = state
        .policy()
        .has_permission(auth_user.id, org_id, &key)
        .await?;

    Ok(Json(PermissionCheck {
        permission: key,
        allowed,
    }))
}

/// Get the caller's membership, role, tier, and permissions.
///
/// GET /api/orgs/{org_id}/me
#[tracing::instrument(skip(state))]
pub async fn get_my_membership(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(org_id): Path<Uuid>,
) -> Result<Json<MembershipResponse>, OrganizationError> {
    let organization = find_organization(&state.db, org_id)
        .await?
        .ok_or(OrganizationError::NotFound)?;

    let ctx = state.policy().member_context(Some(auth_user.id), org_id).await?;
    let member = ctx.member.ok_or(OrganizationError::NotMember)?;

    let role = match member.role_id {
        Some(role_id) => find_role(&state.db, org_id, role_id).await?,
        None => None,
    };
    let membership_tier = match member.membership_tier_id {
        Some(tier_id) => find_membership_tier(&state.db, org_id, tier_id).await?,
        None => None,
    };

    let mut permissions: Vec<String> = ctx.permissions.into_iter().collect();
    permissions.sort();

    Ok(Json(MembershipResponse {
        organization,
        role,
        membership_tier,
        joined_at: member.joined_at,
        ends_at: member.ends_at,
        permissions,
    }))
}

/// List roles with their permission grants.
///
/// GET /api/orgs/{org_id}/roles
///
/// Requires `manage_roles`.
#[tracing::instrument(skip(state))]
pub async fn list_roles(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(org_id): Path<Uuid>,
) -> Result<Json<Vec<RoleResponse>>, OrganizationError> {
    state
        .policy()
        .require_permission(auth_user.id, org_id, catalog::MANAGE_ROLES)
        .await?;

    let roles = list_roles_with_permissions(&state.db, org_id).await?;

    Ok(Json(
        roles
            .into_iter()
            .map(|(role, permissions)| RoleResponse::new(role, permissions))
            .collect(),
    ))
}

/// List the global permission catalog.
///
/// GET /api/permissions
#[tracing::instrument(skip(state))]
pub async fn list_permission_catalog(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Permission>>, OrganizationError> {
    let permissions = list_permissions(&state.db).await?;
    Ok(Json(permissions))
}

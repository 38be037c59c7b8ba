//! Database queries for the permission system.
//!
//! Provides the Postgres-backed directory plus lookups for:
//! - Organizations
//! - Roles and their permission grants
//! - Membership tiers
//! - The global permission catalog

use std::collections::{HashMap, HashSet};

use sqlx::PgPool;
use uuid::Uuid;

use super::directory::{DirectoryError, MembershipDirectory, PermissionCatalog};
use super::models::{MembershipTier, Organization, OrganizationMember, Permission, Role};

// ============================================================================
// Directory
// ============================================================================

/// Membership directory and permission catalog backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl MembershipDirectory for PgDirectory {
    #[tracing::instrument(skip(self))]
    async fn lookup(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<OrganizationMember>, DirectoryError> {
        let member = sqlx::query_as::<_, OrganizationMember>(
            r"
            SELECT organization_id, user_id, role_id, membership_tier_id, joined_at, ends_at
            FROM organization_members
            WHERE organization_id = $1 AND user_id = $2
              AND (ends_at IS NULL OR ends_at > NOW())
            ",
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }
}

impl PermissionCatalog for PgDirectory {
    #[tracing::instrument(skip(self))]
    async fn permissions_for_role(&self, role_id: Uuid) -> Result<HashSet<String>, DirectoryError> {
        let keys: Vec<String> =
            sqlx::query_scalar("SELECT permission_key FROM role_permissions WHERE role_id = $1")
                .bind(role_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(keys.into_iter().collect())
    }
}

// ============================================================================
// Organization Queries
// ============================================================================

/// Get an organization by ID.
pub async fn find_organization(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<Organization>> {
    sqlx::query_as::<_, Organization>(
        "SELECT id, slug, name, description, created_at FROM organizations WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

// ============================================================================
// Role Queries
// ============================================================================

/// Get a role by ID within an organization.
pub async fn find_role(
    pool: &PgPool,
    organization_id: Uuid,
    role_id: Uuid,
) -> sqlx::Result<Option<Role>> {
    sqlx::query_as::<_, Role>(
        r"
        SELECT id, organization_id, name, color, deletable, editable, created_at
        FROM roles
        WHERE id = $1 AND organization_id = $2
        ",
    )
    .bind(role_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await
}

/// List an organization's roles, each with its sorted permission keys.
pub async fn list_roles_with_permissions(
    pool: &PgPool,
    organization_id: Uuid,
) -> sqlx::Result<Vec<(Role, Vec<String>)>> {
    let roles = sqlx::query_as::<_, Role>(
        r"
        SELECT id, organization_id, name, color, deletable, editable, created_at
        FROM roles
        WHERE organization_id = $1
        ORDER BY created_at ASC, name ASC
        ",
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await?;

    let grants: Vec<(Uuid, String)> = sqlx::query_as(
        r"
        SELECT rp.role_id, rp.permission_key
        FROM role_permissions rp
        INNER JOIN roles r ON r.id = rp.role_id
        WHERE r.organization_id = $1
        ORDER BY rp.permission_key ASC
        ",
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await?;

    let mut by_role: HashMap<Uuid, Vec<String>> = HashMap::new();
    for (role_id, key) in grants {
        by_role.entry(role_id).or_default().push(key);
    }

    Ok(roles
        .into_iter()
        .map(|role| {
            let keys = by_role.remove(&role.id).unwrap_or_default();
            (role, keys)
        })
        .collect())
}

// ============================================================================
// Membership Tier Queries
// ============================================================================

/// Get a membership tier by ID within an organization.
pub async fn find_membership_tier(
    pool: &PgPool,
    organization_id: Uuid,
    tier_id: Uuid,
) -> sqlx::Result<Option<MembershipTier>> {
    sqlx::query_as::<_, MembershipTier>(
        r"
        SELECT id, organization_id, name, fee, features, created_at
        FROM membership_tiers
        WHERE id = $1 AND organization_id = $2
        ",
    )
    .bind(tier_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await
}

// ============================================================================
// Permission Catalog Queries
// ============================================================================

/// List the global permission catalog.
pub async fn list_permissions(pool: &PgPool) -> sqlx::Result<Vec<Permission>> {
    sqlx::query_as::<_, Permission>(
        r"
        SELECT key, category, name, description
        FROM permissions
        ORDER BY category ASC, key ASC
        ",
    )
    .fetch_all(pool)
    .await
}

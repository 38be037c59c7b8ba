//! Permission helpers for API handlers.
//!
//! Provides a pre-resolved member context and the Postgres-backed policy
//! constructor used per request.

use std::collections::HashSet;

use ob_common::PrivacyDescriptor;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use super::models::OrganizationMember;
use super::policy::{is_visible_to, AccessPolicy, PermissionError};
use super::queries::PgDirectory;

/// Policy backed by the service's own tables.
pub type PgAccessPolicy = AccessPolicy<PgDirectory, PgDirectory>;

/// Build a policy for one request around a shared pool.
#[must_use]
pub fn pg_policy(pool: &PgPool) -> PgAccessPolicy {
    AccessPolicy::new(PgDirectory::new(pool.clone()), PgDirectory::new(pool.clone()))
}

/// Parse a stored or submitted privacy descriptor.
///
/// Missing values are public; values that do not match the wire shape become
/// [`PrivacyDescriptor::Unrecognized`] and therefore deny access.
#[must_use]
pub fn parse_privacy(value: Option<&serde_json::Value>) -> PrivacyDescriptor {
    PrivacyDescriptor::parse_stored(value).unwrap_or_else(|e| {
        warn!(error = %e, "Malformed privacy descriptor, treating as unrecognized");
        PrivacyDescriptor::Unrecognized
    })
}

/// Pre-computed access context for a caller in one organization.
///
/// Answers visibility and permission questions without further lookups.
#[derive(Debug, Clone)]
pub struct MemberAccessContext {
    pub organization_id: Uuid,

    /// Active membership, `None` for anonymous users and non-members.
    pub member: Option<OrganizationMember>,

    /// Permission keys granted to the member's role.
    pub permissions: HashSet<String>,
}

impl MemberAccessContext {
    #[must_use]
    pub const fn is_member(&self) -> bool {
        self.member.is_some()
    }

    /// Whether the caller may view an item with `privacy`.
    #[must_use]
    pub fn can_view(&self, privacy: &PrivacyDescriptor) -> bool {
        is_visible_to(privacy, self.member.as_ref())
    }

    #[must_use]
    pub fn has_permission(&self, permission_key: &str) -> bool {
        self.permissions.contains(permission_key)
    }

    /// Require that the caller is a member whose role grants `permission_key`.
    pub fn require_permission(&self, permission_key: &str) -> Result<(), PermissionError> {
        if !self.is_member() {
            return Err(PermissionError::NotMember);
        }
        if !self.has_permission(permission_key) {
            return Err(PermissionError::MissingPermission(permission_key.to_string()));
        }
        Ok(())
    }
}

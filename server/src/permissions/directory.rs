//! Read-only collaborators consulted by the access policy.
//!
//! A directory answers "who is this user in this organization" and "what may
//! this role do". Implementations own their I/O; the policy never mutates them.

use std::collections::HashSet;
use std::future::Future;

use uuid::Uuid;

use super::models::OrganizationMember;

/// Failure to reach the backing store.
///
/// Distinct from "not found", which directories report as `None` or an empty set.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// Membership lookups (user ↔ organization ↔ role ↔ tier).
pub trait MembershipDirectory: Send + Sync {
    /// Fetch the user's membership in `organization_id`, if any.
    ///
    /// Implementations may pre-filter ended memberships; the policy checks
    /// activity again either way.
    fn lookup(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> impl Future<Output = Result<Option<OrganizationMember>, DirectoryError>> + Send;
}

/// Role → permission-key grants.
pub trait PermissionCatalog: Send + Sync {
    /// Permission keys granted to `role_id`. Unknown roles have no grants.
    fn permissions_for_role(
        &self,
        role_id: Uuid,
    ) -> impl Future<Output = Result<HashSet<String>, DirectoryError>> + Send;
}

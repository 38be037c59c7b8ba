//! Access policy.
//!
//! Decides whether a user may view a content item given its privacy
//! descriptor, and whether a user's role carries a permission key.
//!
//! Resolution order for `evaluate`:
//! 1. Public content is visible to everyone, anonymous users included
//! 2. Unrecognized or unconstrained descriptors are visible to no one
//! 3. Users without an active membership see nothing private
//! 4. The role axis and the tier axis must both pass

use std::collections::HashSet;

use chrono::Utc;
use ob_common::{PrivacyDescriptor, PrivateRule};
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::directory::{DirectoryError, MembershipDirectory, PermissionCatalog};
use super::helpers::MemberAccessContext;
use super::models::OrganizationMember;

/// Permission check errors.
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    /// Member's role lacks the permission key.
    #[error("Missing permission: {0}")]
    MissingPermission(String),

    /// User has no active membership in the organization.
    #[error("User is not a member of this organization")]
    NotMember,

    /// A directory could not be reached.
    #[error("Access lookup failed: {0}")]
    LookupFailed(#[source] DirectoryError),
}

/// Whether `privacy` admits `member`.
///
/// `member` must already be known to be active; `None` means the user has no
/// standing in the organization.
pub fn is_visible_to(privacy: &PrivacyDescriptor, member: Option<&OrganizationMember>) -> bool {
    match privacy {
        PrivacyDescriptor::Public => true,
        PrivacyDescriptor::Unrecognized => false,
        PrivacyDescriptor::Private(rule) => member.is_some_and(|m| rule_admits(rule, m)),
    }
}

fn rule_admits(rule: &PrivateRule, member: &OrganizationMember) -> bool {
    // An empty set without its override flag matches nobody on that axis
    let role_allowed = rule.allow_all_roles
        || member
            .role_id
            .is_some_and(|role_id| rule.roles.contains(&role_id));
    let tier_allowed = rule.allow_all_memberships
        || member
            .membership_tier_id
            .is_some_and(|tier_id| rule.membership_tiers.contains(&tier_id));

    role_allowed && tier_allowed
}

/// Access policy over a membership directory and a permission catalog.
///
/// Holds no state of its own; build one per request around the directories
/// for that request.
#[derive(Debug, Clone)]
pub struct AccessPolicy<M, C> {
    members: M,
    catalog: C,
}

impl<M, C> AccessPolicy<M, C>
where
    M: MembershipDirectory,
    C: PermissionCatalog,
{
    pub const fn new(members: M, catalog: C) -> Self {
        Self { members, catalog }
    }

    /// Decide whether `acting_user` may view an item with `privacy` in `organization_id`.
    ///
    /// Absence of a membership is a denial, not an error. Only directory I/O
    /// failures return `Err`.
    #[tracing::instrument(skip(self, privacy))]
    pub async fn evaluate(
        &self,
        acting_user: Option<Uuid>,
        organization_id: Uuid,
        privacy: &PrivacyDescriptor,
    ) -> Result<bool, PermissionError> {
        match privacy {
            PrivacyDescriptor::Public => return Ok(true),
            PrivacyDescriptor::Unrecognized => {
                warn!("Unrecognized privacy descriptor, denying access");
                return Ok(false);
            }
            PrivacyDescriptor::Private(rule) if rule.is_unconstrained() => {
                warn!("Private descriptor admits no roles or tiers, denying access");
                return Ok(false);
            }
            PrivacyDescriptor::Private(_) => {}
        }

        let Some(user_id) = acting_user else {
            return Ok(false);
        };

        let member = self.active_membership(user_id, organization_id).await?;
        let allowed = is_visible_to(privacy, member.as_ref());
        debug!(allowed, is_member = member.is_some(), "Evaluated privacy descriptor");

        Ok(allowed)
    }

    /// Check whether the user's role in `organization_id` grants `permission_key`.
    ///
    /// Resolves the membership and the role's grants on every call.
    #[tracing::instrument(skip(self))]
    pub async fn has_permission(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        permission_key: &str,
    ) -> Result<bool, PermissionError> {
        let role_id = self
            .active_membership(user_id, organization_id)
            .await?
            .and_then(|member| member.role_id);

        let Some(role_id) = role_id else {
            return Ok(false);
        };

        let grants = self.role_grants(role_id).await?;
        Ok(grants.contains(permission_key))
    }

    /// Resolve the caller's membership and role grants once.
    ///
    /// Anonymous callers and non-members get an empty context that can still
    /// answer visibility questions for public content.
    #[tracing::instrument(skip(self))]
    pub async fn member_context(
        &self,
        acting_user: Option<Uuid>,
        organization_id: Uuid,
    ) -> Result<MemberAccessContext, PermissionError> {
        let member = match acting_user {
            Some(user_id) => self.active_membership(user_id, organization_id).await?,
            None => None,
        };

        let permissions = match member.as_ref().and_then(|m| m.role_id) {
            Some(role_id) => self.role_grants(role_id).await?,
            None => HashSet::new(),
        };

        Ok(MemberAccessContext {
            organization_id,
            member,
            permissions,
        })
    }

    /// Load the member context and require a permission key.
    ///
    /// Fails with `NotMember` when the user has no active membership and with
    /// `MissingPermission` when the role lacks the key.
    pub async fn require_permission(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        permission_key: &str,
    ) -> Result<MemberAccessContext, PermissionError> {
        let ctx = self.member_context(Some(user_id), organization_id).await?;
        ctx.require_permission(permission_key)?;
        Ok(ctx)
    }

    async fn active_membership(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<OrganizationMember>, PermissionError> {
        let member = self
            .members
            .lookup(user_id, organization_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Membership lookup failed");
                PermissionError::LookupFailed(e)
            })?;

        Ok(member.filter(|m| m.is_active_at(Utc::now())))
    }

    async fn role_grants(&self, role_id: Uuid) -> Result<HashSet<String>, PermissionError> {
        self.catalog
            .permissions_for_role(role_id)
            .await
            .map_err(|e| {
                error!(error = %e, %role_id, "Permission catalog lookup failed");
                PermissionError::LookupFailed(e)
            })
    }
}

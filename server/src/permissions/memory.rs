//! In-process directory.
//!
//! Holds members and role grants in plain maps. Used by tests and local
//! tooling where a database is not available.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::directory::{DirectoryError, MembershipDirectory, PermissionCatalog};
use super::models::OrganizationMember;

#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    members: HashMap<(Uuid, Uuid), OrganizationMember>,
    grants: HashMap<Uuid, HashSet<String>>,
    unavailable: bool,
    grants_unavailable: bool,
}

impl InMemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an open-ended membership.
    #[must_use]
    pub fn with_member(
        self,
        organization_id: Uuid,
        user_id: Uuid,
        role_id: Option<Uuid>,
        membership_tier_id: Option<Uuid>,
    ) -> Self {
        self.with_membership(OrganizationMember {
            organization_id,
            user_id,
            role_id,
            membership_tier_id,
            joined_at: Utc::now(),
            ends_at: None,
        })
    }

    /// Add a membership that ends (or ended) at `ends_at`.
    #[must_use]
    pub fn with_ended_member(
        self,
        organization_id: Uuid,
        user_id: Uuid,
        role_id: Option<Uuid>,
        ends_at: DateTime<Utc>,
    ) -> Self {
        self.with_membership(OrganizationMember {
            organization_id,
            user_id,
            role_id,
            membership_tier_id: None,
            joined_at: ends_at - chrono::Duration::days(365),
            ends_at: Some(ends_at),
        })
    }

    #[must_use]
    pub fn with_membership(mut self, member: OrganizationMember) -> Self {
        self.members
            .insert((member.organization_id, member.user_id), member);
        self
    }

    /// Grant permission keys to a role. Repeated calls accumulate.
    #[must_use]
    pub fn with_grants<I, K>(mut self, role_id: Uuid, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.grants
            .entry(role_id)
            .or_default()
            .extend(keys.into_iter().map(Into::into));
        self
    }

    /// Make every lookup fail as if the store were unreachable.
    #[must_use]
    pub const fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Fail only role-grant lookups; membership lookups keep working.
    #[must_use]
    pub const fn grants_unavailable(mut self) -> Self {
        self.grants_unavailable = true;
        self
    }

    fn check_available(&self) -> Result<(), DirectoryError> {
        if self.unavailable {
            Err(DirectoryError::Unavailable("in-memory directory offline".into()))
        } else {
            Ok(())
        }
    }
}

impl MembershipDirectory for InMemoryDirectory {
    async fn lookup(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<OrganizationMember>, DirectoryError> {
        self.check_available()?;
        Ok(self.members.get(&(organization_id, user_id)).cloned())
    }
}

impl PermissionCatalog for InMemoryDirectory {
    async fn permissions_for_role(&self, role_id: Uuid) -> Result<HashSet<String>, DirectoryError> {
        self.check_available()?;
        if self.grants_unavailable {
            return Err(DirectoryError::Unavailable("role grants offline".into()));
        }
        Ok(self.grants.get(&role_id).cloned().unwrap_or_default())
    }
}

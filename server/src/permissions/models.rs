//! Database models for the permission system.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Tenant owning roles, tiers, members, and content.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Organization role.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub deletable: bool,
    pub editable: bool,
    pub created_at: DateTime<Utc>,
}

/// Global permission catalog entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Permission {
    pub key: String,
    pub category: String,
    pub name: String,
    pub description: Option<String>,
}

/// Paid or free membership tier within an organization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MembershipTier {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    /// Fee in minor currency units.
    pub fee: i64,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A user's standing in an organization.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct OrganizationMember {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role_id: Option<Uuid>,
    pub membership_tier_id: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl OrganizationMember {
    /// Whether the membership has not ended at `now`.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.ends_at.is_none_or(|ends_at| ends_at > now)
    }
}

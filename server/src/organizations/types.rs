//! Organization Request/Response Types

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::permissions::{MembershipTier, Organization, Role};

/// Role with its granted permission keys.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub deletable: bool,
    pub editable: bool,
    pub permissions: Vec<String>,
}

impl RoleResponse {
    pub fn new(role: Role, permissions: Vec<String>) -> Self {
        Self {
            id: role.id,
            name: role.name,
            color: role.color,
            deletable: role.deletable,
            editable: role.editable,
            permissions,
        }
    }
}

/// The caller's standing in an organization.
#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub organization: Organization,
    pub role: Option<Role>,
    pub membership_tier: Option<MembershipTier>,
    pub joined_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    /// Sorted permission keys granted by the role.
    pub permissions: Vec<String>,
}

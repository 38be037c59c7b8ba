//! Well-known permission keys.
//!
//! Keys are rows in the global `permissions` table; these constants name the
//! ones the server itself checks.

/// Open the organization dashboard.
pub const VIEW_DASHBOARD: &str = "view_dashboard";
/// Create posts and change their visibility.
pub const MANAGE_POSTS: &str = "manage_posts";
/// Create events and change their visibility.
pub const MANAGE_EVENTS: &str = "manage_events";
/// View and edit roles and their grants.
pub const MANAGE_ROLES: &str = "manage_roles";
/// Assign roles and remove members.
pub const MANAGE_MEMBERS: &str = "manage_members";
/// Create and edit membership tiers.
pub const MANAGE_MEMBERSHIPS: &str = "manage_memberships";

/// Every key seeded by the initial migration.
pub const ALL: &[&str] = &[
    VIEW_DASHBOARD,
    MANAGE_POSTS,
    MANAGE_EVENTS,
    MANAGE_ROLES,
    MANAGE_MEMBERS,
    MANAGE_MEMBERSHIPS,
];

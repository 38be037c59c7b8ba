//! Access control for organizations.
//!
//! Two checks share one policy:
//! - Content visibility: privacy descriptors gate posts and events by role and membership tier
//! - Permission keys: roles grant keys from the global catalog

pub mod catalog;
pub mod directory;
pub mod helpers;
pub mod memory;
pub mod models;
pub mod policy;
pub mod queries;

pub use directory::{DirectoryError, MembershipDirectory, PermissionCatalog};
pub use helpers::{parse_privacy, pg_policy, MemberAccessContext, PgAccessPolicy};
pub use memory::InMemoryDirectory;
pub use models::*;
pub use policy::{is_visible_to, AccessPolicy, PermissionError};
pub use queries::*;

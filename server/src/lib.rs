//! Organization Access Server
//!
//! Role- and membership-tier-based visibility for organization content,
//! plus permission checks against a global catalog.

pub mod api;
pub mod auth;
pub mod config;
pub mod content;
pub mod db;
pub mod organizations;
pub mod permissions;

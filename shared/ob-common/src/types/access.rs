//! Access Check Types

use serde::{Deserialize, Serialize};

/// Request body for evaluating a privacy descriptor.
///
/// The descriptor is taken as raw JSON so that malformed rules degrade to a
/// denial instead of a rejected request. An absent descriptor is public.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EvaluateAccessRequest {
    #[serde(default)]
    pub privacy: Option<serde_json::Value>,
}

/// Result of a visibility evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessDecision {
    pub allowed: bool,
}

/// Result of a permission-key check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PermissionCheck {
    /// The permission key that was checked.
    pub permission: String,
    pub allowed: bool,
}

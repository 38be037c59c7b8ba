//! Content Request/Response Types

use chrono::{DateTime, Utc};
use ob_common::PrivacyDescriptor;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::permissions::parse_privacy;

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(Debug, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub privacy: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostRow {
    /// Parsed privacy descriptor; malformed values deny.
    pub fn privacy(&self) -> PrivacyDescriptor {
        parse_privacy(self.privacy.as_ref())
    }
}

#[derive(Debug, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub privacy: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl EventRow {
    pub fn privacy(&self) -> PrivacyDescriptor {
        parse_privacy(self.privacy.as_ref())
    }
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub privacy: PrivacyDescriptor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostResponse {
    pub fn new(row: PostRow, privacy: PrivacyDescriptor) -> Self {
        Self {
            id: row.id,
            organization_id: row.organization_id,
            author_id: row.author_id,
            title: row.title,
            body: row.body,
            privacy,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub privacy: PrivacyDescriptor,
    pub created_at: DateTime<Utc>,
}

impl EventResponse {
    pub fn new(row: EventRow, privacy: PrivacyDescriptor) -> Self {
        Self {
            id: row.id,
            organization_id: row.organization_id,
            created_by: row.created_by,
            title: row.title,
            description: row.description,
            location: row.location,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            privacy,
            created_at: row.created_at,
        }
    }
}

// ============================================================================
// API Request Types
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[validate(length(max = 20000))]
    #[serde(default)]
    pub body: String,
    /// Defaults to public.
    #[validate(custom(function = "validate_privacy"))]
    #[serde(default)]
    pub privacy: PrivacyDescriptor,
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_event_window"))]
pub struct CreateEventRequest {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[validate(length(max = 20000))]
    #[serde(default)]
    pub description: String,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    #[validate(custom(function = "validate_privacy"))]
    #[serde(default)]
    pub privacy: PrivacyDescriptor,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePrivacyRequest {
    #[validate(custom(function = "validate_privacy"))]
    pub privacy: PrivacyDescriptor,
}

const MAX_TITLE_LENGTH: usize = 200;

/// Titles are stored trimmed, so the bounds apply after trimming.
fn validate_title(title: &str) -> Result<(), ValidationError> {
    let length = title.trim().chars().count();
    if length == 0 {
        return Err(ValidationError::new("title_required"));
    }
    if length > MAX_TITLE_LENGTH {
        return Err(ValidationError::new("title_too_long"));
    }
    Ok(())
}

/// Reject descriptors that could never admit anyone.
fn validate_privacy(privacy: &PrivacyDescriptor) -> Result<(), ValidationError> {
    match privacy {
        PrivacyDescriptor::Public => Ok(()),
        PrivacyDescriptor::Private(rule) if rule.is_unconstrained() => {
            Err(ValidationError::new("privacy_unconstrained"))
        }
        PrivacyDescriptor::Private(_) => Ok(()),
        PrivacyDescriptor::Unrecognized => Err(ValidationError::new("privacy_unrecognized")),
    }
}

fn validate_event_window(request: &CreateEventRequest) -> Result<(), ValidationError> {
    match request.ends_at {
        Some(ends_at) if ends_at < request.starts_at => {
            Err(ValidationError::new("ends_before_start"))
        }
        _ => Ok(()),
    }
}

/// Query parameters for list endpoints.
///
/// `after` is the id of the last item on the previous page; results continue
/// past it in list order.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub after: Option<Uuid>,
}

impl ListQuery {
    /// Clamp the requested page size to `1..=max`.
    pub fn limit(&self, max: i64) -> i64 {
        self.limit.unwrap_or(max).clamp(1, max)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use ob_common::PrivateRule;

    use super::*;

    fn event(ends_at: Option<DateTime<Utc>>, starts_at: DateTime<Utc>) -> CreateEventRequest {
        CreateEventRequest {
            title: "Annual meeting".into(),
            description: String::new(),
            location: None,
            starts_at,
            ends_at,
            privacy: PrivacyDescriptor::Public,
        }
    }

    #[test]
    fn test_post_defaults_to_public() {
        let request: CreatePostRequest =
            serde_json::from_value(serde_json::json!({"title": "Hello"})).unwrap();
        assert_eq!(request.privacy, PrivacyDescriptor::Public);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_post_title_required() {
        let request: CreatePostRequest =
            serde_json::from_value(serde_json::json!({"title": ""})).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_blank_title_rejected() {
        let request: CreatePostRequest =
            serde_json::from_value(serde_json::json!({"title": "   "})).unwrap();
        assert!(request.validate().is_err());

        let mut request = event(None, Utc::now());
        request.title = "\t \n".into();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_title_length_counts_trimmed_chars() {
        let padded = format!("  {}  ", "é".repeat(200));
        let request: CreatePostRequest =
            serde_json::from_value(serde_json::json!({"title": padded})).unwrap();
        assert!(request.validate().is_ok());

        let request: CreatePostRequest =
            serde_json::from_value(serde_json::json!({"title": "a".repeat(201)})).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_unrecognized_privacy_rejected_on_write() {
        let request: UpdatePrivacyRequest =
            serde_json::from_value(serde_json::json!({"privacy": {"type": "secret"}})).unwrap();
        assert_eq!(request.privacy, PrivacyDescriptor::Unrecognized);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_unconstrained_private_rejected_on_write() {
        let request = UpdatePrivacyRequest {
            privacy: PrivacyDescriptor::Private(PrivateRule::default()),
        };
        assert!(request.validate().is_err());

        let request = UpdatePrivacyRequest {
            privacy: PrivacyDescriptor::members_only(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_event_window() {
        let now = Utc::now();
        assert!(event(None, now).validate().is_ok());
        assert!(event(Some(now), now).validate().is_ok());
        assert!(event(Some(now - Duration::hours(1)), now).validate().is_err());
    }

    #[test]
    fn test_stored_null_privacy_is_public() {
        let now = Utc::now();
        let row = PostRow {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "t".into(),
            body: String::new(),
            privacy: None,
            created_at: now,
            updated_at: now,
        };
        assert!(row.privacy().is_public());
    }

    #[test]
    fn test_list_limit_clamped() {
        assert_eq!(ListQuery { limit: None, after: None }.limit(50), 50);
        assert_eq!(ListQuery { limit: Some(500), after: None }.limit(50), 50);
        assert_eq!(ListQuery { limit: Some(0), after: None }.limit(50), 1);
        assert_eq!(ListQuery { limit: Some(10), after: None }.limit(50), 10);
    }
}

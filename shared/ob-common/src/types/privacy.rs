//! Privacy Descriptor Types
//!
//! The access rule attached to a post or event.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Visibility rule for a content item.
///
/// Serialized as an internally tagged object:
///
/// ```json
/// { "type": "public" }
/// { "type": "private", "roles": ["..."], "membership_tiers": [], "allow_all_memberships": true }
/// ```
///
/// Any `type` other than `public` or `private` deserializes to [`Self::Unrecognized`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PrivacyDescriptor {
    /// Visible to everyone, including anonymous users.
    #[default]
    Public,
    /// Visible to active members matching the rule.
    Private(PrivateRule),
    /// Unknown descriptor type. Never grants access.
    #[serde(other)]
    Unrecognized,
}

/// Role and membership-tier constraints of a private descriptor.
///
/// Both axes must pass. An axis passes when its `allow_all_*` flag is set or
/// the member's id is in the corresponding set; an empty set without the flag
/// matches nobody.
///
/// Entries that are not UUIDs can never name a role or tier, so they are
/// dropped on parse and only affect their own axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateRule {
    /// Role ids allowed to view.
    #[serde(default, deserialize_with = "lenient_ids")]
    pub roles: BTreeSet<Uuid>,
    /// Membership tier ids allowed to view.
    #[serde(default, deserialize_with = "lenient_ids")]
    pub membership_tiers: BTreeSet<Uuid>,
    /// Waive the role axis.
    #[serde(default)]
    pub allow_all_roles: bool,
    /// Waive the membership-tier axis.
    #[serde(default)]
    pub allow_all_memberships: bool,
}

impl PrivacyDescriptor {
    /// Parse a stored descriptor column.
    ///
    /// A missing value (absent or JSON `null`) is [`Self::Public`]. Values that
    /// are present but do not match the wire shape return the serde error so the
    /// caller can decide how to degrade.
    pub fn parse_stored(value: Option<&serde_json::Value>) -> Result<Self, serde_json::Error> {
        match value {
            None | Some(serde_json::Value::Null) => Ok(Self::Public),
            Some(value) => Self::deserialize(value),
        }
    }

    /// Descriptor that admits any active member.
    #[must_use]
    pub fn members_only() -> Self {
        Self::Private(PrivateRule {
            allow_all_roles: true,
            allow_all_memberships: true,
            ..PrivateRule::default()
        })
    }

    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }
}

impl PrivateRule {
    /// Whether the descriptor names no role, no tier, and sets no override.
    ///
    /// Such a rule admits nobody.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.roles.is_empty()
            && self.membership_tiers.is_empty()
            && !self.allow_all_roles
            && !self.allow_all_memberships
    }
}

/// Deserialize an id set where `null` means empty and non-UUID entries are skipped.
///
/// A value that is not an array (or `null`) is still a shape error.
fn lenient_ids<'de, D>(deserializer: D) -> Result<BTreeSet<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;

    Ok(entries
        .unwrap_or_default()
        .iter()
        .filter_map(serde_json::Value::as_str)
        .filter_map(|id| id.parse().ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_public_ignores_other_fields() {
        let parsed: PrivacyDescriptor =
            serde_json::from_value(json!({"type": "public", "roles": ["not-a-uuid"]})).unwrap();
        assert_eq!(parsed, PrivacyDescriptor::Public);
    }

    #[test]
    fn test_private_defaults_missing_fields() {
        let role = Uuid::new_v4();
        let parsed: PrivacyDescriptor =
            serde_json::from_value(json!({"type": "private", "roles": [role]})).unwrap();

        let PrivacyDescriptor::Private(rule) = parsed else {
            panic!("expected private descriptor");
        };
        assert!(rule.roles.contains(&role));
        assert!(rule.membership_tiers.is_empty());
        assert!(!rule.allow_all_roles);
        assert!(!rule.allow_all_memberships);
    }

    #[test]
    fn test_private_null_sets_are_empty() {
        let parsed: PrivacyDescriptor = serde_json::from_value(
            json!({"type": "private", "roles": null, "membership_tiers": null, "allow_all_roles": true}),
        )
        .unwrap();

        let PrivacyDescriptor::Private(rule) = parsed else {
            panic!("expected private descriptor");
        };
        assert!(rule.roles.is_empty());
        assert!(rule.allow_all_roles);
    }

    #[test]
    fn test_non_uuid_ids_keep_overrides() {
        let parsed = PrivacyDescriptor::parse_stored(Some(&json!({
            "type": "private",
            "roles": ["R1"],
            "membership_tiers": ["T1", 7],
            "allow_all_roles": true,
            "allow_all_memberships": true
        })))
        .unwrap();

        let PrivacyDescriptor::Private(rule) = parsed else {
            panic!("expected private descriptor");
        };
        assert!(rule.roles.is_empty());
        assert!(rule.membership_tiers.is_empty());
        assert!(rule.allow_all_roles);
        assert!(rule.allow_all_memberships);
    }

    #[test]
    fn test_non_uuid_ids_dropped_beside_valid_ones() {
        let role = Uuid::new_v4();
        let parsed: PrivacyDescriptor =
            serde_json::from_value(json!({"type": "private", "roles": ["R1", role]})).unwrap();

        let PrivacyDescriptor::Private(rule) = parsed else {
            panic!("expected private descriptor");
        };
        assert_eq!(rule.roles, BTreeSet::from([role]));
    }

    #[test]
    fn test_unknown_type_is_unrecognized() {
        let parsed: PrivacyDescriptor =
            serde_json::from_value(json!({"type": "friends_only"})).unwrap();
        assert_eq!(parsed, PrivacyDescriptor::Unrecognized);
    }

    #[test]
    fn test_parse_stored_missing_is_public() {
        assert_eq!(
            PrivacyDescriptor::parse_stored(None).unwrap(),
            PrivacyDescriptor::Public
        );
        assert_eq!(
            PrivacyDescriptor::parse_stored(Some(&serde_json::Value::Null)).unwrap(),
            PrivacyDescriptor::Public
        );
    }

    #[test]
    fn test_parse_stored_rejects_bad_shape() {
        let value = json!({"type": "private", "roles": "everyone"});
        assert!(PrivacyDescriptor::parse_stored(Some(&value)).is_err());

        let untagged = json!({"roles": []});
        assert!(PrivacyDescriptor::parse_stored(Some(&untagged)).is_err());
    }

    #[test]
    fn test_unconstrained_rule() {
        assert!(PrivateRule::default().is_unconstrained());
        assert!(!PrivateRule {
            allow_all_memberships: true,
            ..PrivateRule::default()
        }
        .is_unconstrained());
    }

    #[test]
    fn test_members_only_serializes_with_tag() {
        let value = serde_json::to_value(PrivacyDescriptor::members_only()).unwrap();
        assert_eq!(value["type"], "private");
        assert_eq!(value["allow_all_roles"], true);
        assert_eq!(value["allow_all_memberships"], true);
    }
}

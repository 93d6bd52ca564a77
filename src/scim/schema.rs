//! # SCIM Wire Schema
//!
//! JSON shapes exchanged with SCIM clients. Inbound payloads model every
//! attribute as optional so that "absent" and "empty" stay distinguishable;
//! the validator decides what is actually required.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::Email;

/// Core User schema URN every create/update payload must carry
pub const CORE_USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

/// URN carried by list responses
pub const LIST_RESPONSE_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";

/// Resource type label reported in `meta`
pub const USER_RESOURCE_TYPE: &str = "User";

// ==================
// Inbound
// ==================

/// Inbound SCIM User payload (create, update and webhook bodies).
///
/// Caller-supplied `id` and `meta` are not modelled and are dropped during
/// deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<NamePayload>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<EmailPayload>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Nested `name` structure; only family and given names are retained
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
}

/// Inbound email entry; `value` may be missing and is checked by the validator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

// ==================
// Outbound
// ==================

/// SCIM User resource as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimUserResponse {
    pub schemas: Vec<String>,
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub user_name: String,
    pub name: ScimName,
    pub emails: Vec<Email>,
    pub active: bool,
    pub meta: ScimMeta,
}

/// Outbound name block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
}

/// Resource metadata with ISO-8601 timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimMeta {
    pub resource_type: String,
    pub created: String,
    pub last_modified: String,
}

/// SCIM ListResponse envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimListResponse {
    pub schemas: Vec<String>,
    pub total_results: usize,
    #[serde(rename = "Resources")]
    pub resources: Vec<ScimUserResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_distinguishes_absent_from_false() {
        let absent: UserPayload = serde_json::from_value(json!({"userName": "a"})).unwrap();
        let inactive: UserPayload =
            serde_json::from_value(json!({"userName": "a", "active": false})).unwrap();

        assert_eq!(absent.active, None);
        assert_eq!(inactive.active, Some(false));
    }

    #[test]
    fn test_payload_ignores_caller_id_and_meta() {
        let payload: UserPayload = serde_json::from_value(json!({
            "id": "caller-chosen",
            "userName": "alice",
            "meta": {"resourceType": "User"}
        }))
        .unwrap();

        assert_eq!(payload.user_name.as_deref(), Some("alice"));
    }

    #[test]
    fn test_email_entry_without_value() {
        let payload: UserPayload =
            serde_json::from_value(json!({"emails": [{"type": "work"}]})).unwrap();
        let emails = payload.emails.unwrap();

        assert_eq!(emails[0].value, None);
        assert_eq!(emails[0].email_type.as_deref(), Some("work"));
    }

    #[test]
    fn test_list_response_field_names() {
        let list = ScimListResponse {
            schemas: vec![LIST_RESPONSE_SCHEMA.to_string()],
            total_results: 0,
            resources: vec![],
        };

        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["totalResults"], 0);
        assert!(value["Resources"].is_array());
    }
}

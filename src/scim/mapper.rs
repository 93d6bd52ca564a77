//! # Resource Mapper
//!
//! Moves data between the wire payload and the canonical record.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use super::record::{self, Email, UserRecord};
use super::schema::{
    EmailPayload, ScimListResponse, ScimMeta, ScimName, ScimUserResponse, UserPayload,
    CORE_USER_SCHEMA, LIST_RESPONSE_SCHEMA, USER_RESOURCE_TYPE,
};

/// Build a fresh record from a validated creation payload
pub fn to_canonical(payload: &UserPayload) -> UserRecord {
    let now = record::now();
    let name = payload.name.as_ref();

    UserRecord {
        id: Uuid::new_v4(),
        user_name: payload.user_name.clone().unwrap_or_default(),
        external_id: payload.external_id.clone(),
        family_name: name.and_then(|n| n.family_name.clone()),
        given_name: name.and_then(|n| n.given_name.clone()),
        emails: payload
            .emails
            .as_deref()
            .map(stored_emails)
            .unwrap_or_default(),
        active: payload.active.unwrap_or(true),
        created_at: now,
        updated_at: now,
    }
}

/// Apply a partial update on top of `existing`.
///
/// Strings overwrite only when supplied and non-empty. A supplied `emails`
/// array replaces the stored list even when empty. `active` overwrites
/// whenever present, including `false`. `id` and `created_at` are kept.
pub fn merge_update(existing: &UserRecord, payload: &UserPayload) -> UserRecord {
    let mut merged = existing.clone();

    overwrite(&mut merged.user_name, &payload.user_name);
    overwrite_optional(&mut merged.external_id, &payload.external_id);

    if let Some(name) = &payload.name {
        overwrite_optional(&mut merged.family_name, &name.family_name);
        overwrite_optional(&mut merged.given_name, &name.given_name);
    }

    if let Some(emails) = &payload.emails {
        merged.emails = stored_emails(emails);
    }

    if let Some(active) = payload.active {
        merged.active = active;
    }

    merged.updated_at = record::next_timestamp(existing.updated_at);
    merged
}

/// Entries without an address are dropped
fn stored_emails(emails: &[EmailPayload]) -> Vec<Email> {
    emails.iter().filter_map(Email::from_payload).collect()
}

fn supplied(value: &Option<String>) -> Option<&String> {
    value.as_ref().filter(|v| !v.is_empty())
}

fn overwrite(target: &mut String, value: &Option<String>) {
    if let Some(v) = supplied(value) {
        target.clone_from(v);
    }
}

fn overwrite_optional(target: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = supplied(value) {
        *target = Some(v.clone());
    }
}

/// Project a record into its SCIM wire representation
pub fn to_wire(record: &UserRecord) -> ScimUserResponse {
    ScimUserResponse {
        schemas: vec![CORE_USER_SCHEMA.to_string()],
        id: record.id,
        external_id: record.external_id.clone(),
        user_name: record.user_name.clone(),
        name: ScimName {
            family_name: record.family_name.clone(),
            given_name: record.given_name.clone(),
        },
        emails: record.emails.clone(),
        active: record.active,
        meta: ScimMeta {
            resource_type: USER_RESOURCE_TYPE.to_string(),
            created: iso8601(&record.created_at),
            last_modified: iso8601(&record.updated_at),
        },
    }
}

/// Wrap records in a SCIM ListResponse
pub fn to_list_response(records: &[UserRecord]) -> ScimListResponse {
    ScimListResponse {
        schemas: vec![LIST_RESPONSE_SCHEMA.to_string()],
        total_results: records.len(),
        resources: records.iter().map(to_wire).collect(),
    }
}

fn iso8601(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

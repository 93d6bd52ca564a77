//! # Canonical User Record
//!
//! The store-resident shape of a SCIM User.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schema::EmailPayload;

/// Canonical user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// System-assigned identifier, never reused
    pub id: Uuid,

    /// Unique among live records at creation time
    pub user_name: String,

    pub external_id: Option<String>,

    pub family_name: Option<String>,

    pub given_name: Option<String>,

    /// Ordered as supplied by the caller
    pub emails: Vec<Email>,

    pub active: bool,

    /// Set once at creation
    pub created_at: DateTime<Utc>,

    /// Refreshed on every successful mutation
    pub updated_at: DateTime<Utc>,
}

/// Email entry as stored and as returned on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub value: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

impl Email {
    /// Stored form of an inbound entry; `None` when it carries no address
    pub fn from_payload(payload: &EmailPayload) -> Option<Self> {
        let value = payload.value.as_ref().filter(|v| !v.is_empty())?;
        Some(Self {
            value: value.clone(),
            email_type: payload.email_type.clone(),
            primary: payload.primary,
        })
    }
}

/// Current time at the millisecond precision the wire format carries
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// A timestamp strictly after `previous`, normally the current time
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::milliseconds(1)
    }
}

//! # Resource Validator
//!
//! Decides whether an inbound User payload may be applied.
//!
//! Rules are checked in a fixed order and the first failure wins:
//!
//! 1. payload present
//! 2. `userName` present and non-empty
//! 3. `userName` matches `^[A-Za-z0-9._-]+$`
//! 4. every supplied email has a `value` of shape `local@domain.tld`
//! 5. `schemas` present and non-empty
//! 6. `schemas` contains the core User URN

use std::sync::OnceLock;

use regex::Regex;

use super::errors::{ValidationError, ValidationResult};
use super::schema::{UserPayload, CORE_USER_SCHEMA};

/// Allowed userName characters
pub const USER_NAME_PATTERN: &str = r"^[A-Za-z0-9._-]+$";

/// Basic `local@domain.tld` shape
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static USER_NAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn user_name_re() -> &'static Regex {
    USER_NAME_RE.get_or_init(|| Regex::new(USER_NAME_PATTERN).expect("userName pattern compiles"))
}

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

/// Validate a payload. `None` stands for an empty or `null` body.
pub fn validate(payload: Option<&UserPayload>) -> ValidationResult<()> {
    let payload = payload.ok_or(ValidationError::EmptyBody)?;

    let user_name = match payload.user_name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ValidationError::UserNameRequired),
    };
    if !is_valid_user_name(user_name) {
        return Err(ValidationError::UserNameFormat);
    }

    if let Some(emails) = &payload.emails {
        for email in emails {
            let value = match email.value.as_deref() {
                Some(value) if !value.is_empty() => value,
                _ => return Err(ValidationError::EmailValueRequired),
            };
            if !is_valid_email(value) {
                return Err(ValidationError::EmailFormat(value.to_string()));
            }
        }
    }

    let schemas = match &payload.schemas {
        Some(schemas) if !schemas.is_empty() => schemas,
        _ => return Err(ValidationError::SchemasRequired),
    };
    if !schemas.iter().any(|urn| urn == CORE_USER_SCHEMA) {
        return Err(ValidationError::CoreSchemaMissing);
    }

    Ok(())
}

/// Whether `user_name` is made only of letters, digits, `.`, `_` and `-`
pub fn is_valid_user_name(user_name: &str) -> bool {
    user_name_re().is_match(user_name)
}

pub fn is_valid_email(value: &str) -> bool {
    email_re().is_match(value)
}

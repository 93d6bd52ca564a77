//! # User Lifecycle
//!
//! Coordinates create/read/update/delete of User records against a store,
//! using the validator and mapper. Every outcome is reported to the
//! structured logger.

use std::sync::Arc;

use uuid::Uuid;

use super::errors::{LifecycleError, LifecycleResult, ValidationError};
use super::mapper;
use super::record::UserRecord;
use super::schema::UserPayload;
use super::store::UserStore;
use super::validator;
use crate::observability::{log_event_with_fields, Event};

/// Whether an update payload passes through the validator first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Validated,
    Unvalidated,
}

/// Lifecycle coordinator over an injected store
pub struct UserLifecycle<S: UserStore + ?Sized> {
    store: Arc<S>,
}

impl<S: UserStore + ?Sized> UserLifecycle<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate, check `userName` uniqueness, then insert a new record.
    pub fn create(&self, payload: Option<&UserPayload>) -> LifecycleResult<UserRecord> {
        let payload = self.validated("create", payload)?;
        let user_name = payload.user_name.as_deref().unwrap_or_default();

        if self.store.find_by_user_name(user_name)?.is_some() {
            return Err(self.conflict(user_name));
        }

        let record = mapper::to_canonical(payload);

        // A concurrent create may have claimed the name since the lookup.
        if !self.store.insert_unique(record.clone())? {
            return Err(self.conflict(user_name));
        }

        log_event_with_fields(
            Event::UserCreated,
            &[
                ("id", &record.id.to_string()),
                ("user_name", &record.user_name),
            ],
        );
        Ok(record)
    }

    pub fn list(&self) -> LifecycleResult<Vec<UserRecord>> {
        let records = self.store.list()?;
        log_event_with_fields(Event::UsersListed, &[("total", &records.len().to_string())]);
        Ok(records)
    }

    pub fn get(&self, id: &str) -> LifecycleResult<UserRecord> {
        let record = self.find("get", id)?;
        log_event_with_fields(Event::UserRetrieved, &[("id", id)]);
        Ok(record)
    }

    /// Merge `payload` into the record with `id`.
    ///
    /// The record must exist before the payload is looked at. `userName`
    /// collisions with other records are not checked here.
    pub fn update(
        &self,
        id: &str,
        payload: Option<&UserPayload>,
        mode: UpdateMode,
    ) -> LifecycleResult<UserRecord> {
        let existing = self.find("update", id)?;

        let empty = UserPayload::default();
        let payload = match mode {
            UpdateMode::Validated => self.validated("update", payload)?,
            UpdateMode::Unvalidated => payload.unwrap_or(&empty),
        };

        let updated = mapper::merge_update(&existing, payload);
        if !self.store.replace(existing.id, updated.clone())? {
            // Deleted between lookup and replace
            return Err(self.not_found("update", id));
        }

        log_event_with_fields(
            Event::UserUpdated,
            &[("id", id), ("user_name", &updated.user_name)],
        );
        Ok(updated)
    }

    /// Hard-remove the record with `id`
    pub fn delete(&self, id: &str) -> LifecycleResult<()> {
        let removed = match parse_id(id) {
            Some(uuid) => self.store.delete(uuid)?,
            None => false,
        };
        if !removed {
            return Err(self.not_found("delete", id));
        }

        log_event_with_fields(Event::UserDeleted, &[("id", id)]);
        Ok(())
    }

    fn find(&self, operation: &str, id: &str) -> LifecycleResult<UserRecord> {
        let found = match parse_id(id) {
            Some(uuid) => self.store.find_by_id(uuid)?,
            None => None,
        };
        found.ok_or_else(|| self.not_found(operation, id))
    }

    fn validated<'a>(
        &self,
        operation: &str,
        payload: Option<&'a UserPayload>,
    ) -> LifecycleResult<&'a UserPayload> {
        let checked = validator::validate(payload)
            .and_then(|()| payload.ok_or(ValidationError::EmptyBody));

        checked.map_err(|err| {
            log_event_with_fields(
                Event::UserValidationFailed,
                &[("operation", operation), ("reason", &err.to_string())],
            );
            LifecycleError::Validation(err)
        })
    }

    fn not_found(&self, operation: &str, id: &str) -> LifecycleError {
        log_event_with_fields(Event::UserNotFound, &[("id", id), ("operation", operation)]);
        LifecycleError::NotFound(id.to_string())
    }

    fn conflict(&self, user_name: &str) -> LifecycleError {
        log_event_with_fields(Event::UserConflict, &[("user_name", user_name)]);
        LifecycleError::Conflict(user_name.to_string())
    }
}

/// Ids that are not UUIDs cannot name any stored record
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

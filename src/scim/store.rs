//! # Identity Record Store
//!
//! Storage seam for canonical user records.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::record::UserRecord;

/// User record store
///
/// Plain `insert` and `replace` do not enforce `user_name` uniqueness; that
/// belongs to the lifecycle coordinator, which uses `insert_unique` for the
/// atomic check-then-insert on create.
pub trait UserStore: Send + Sync {
    /// Store a new record. Fails if the id is already present.
    fn insert(&self, record: UserRecord) -> StoreResult<()>;

    /// Store a new record unless a record with the same `user_name` exists.
    ///
    /// Returns `false` when the name is taken. Check and insert happen as
    /// one step.
    fn insert_unique(&self, record: UserRecord) -> StoreResult<bool>;

    fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>>;

    fn find_by_user_name(&self, user_name: &str) -> StoreResult<Option<UserRecord>>;

    /// Replace the record with `id`. Returns `false` if absent.
    fn replace(&self, id: Uuid, record: UserRecord) -> StoreResult<bool>;

    /// Remove the record with `id`. Returns `false` if absent.
    fn delete(&self, id: Uuid) -> StoreResult<bool>;

    /// All records in insertion order
    fn list(&self) -> StoreResult<Vec<UserRecord>>;
}

/// In-memory store backed by a vector
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<UserRecord>>> {
        self.users.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<UserRecord>>> {
        self.users.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl UserStore for InMemoryUserStore {
    fn insert(&self, record: UserRecord) -> StoreResult<()> {
        let mut users = self.write()?;

        if users.iter().any(|u| u.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }

        users.push(record);
        Ok(())
    }

    fn insert_unique(&self, record: UserRecord) -> StoreResult<bool> {
        let mut users = self.write()?;

        if users.iter().any(|u| u.user_name == record.user_name) {
            return Ok(false);
        }
        if users.iter().any(|u| u.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }

        users.push(record);
        Ok(true)
    }

    fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let users = self.read()?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    fn find_by_user_name(&self, user_name: &str) -> StoreResult<Option<UserRecord>> {
        let users = self.read()?;
        Ok(users.iter().find(|u| u.user_name == user_name).cloned())
    }

    fn replace(&self, id: Uuid, record: UserRecord) -> StoreResult<bool> {
        let mut users = self.write()?;

        match users.iter_mut().find(|u| u.id == id) {
            Some(existing) => {
                *existing = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut users = self.write()?;

        let len_before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < len_before)
    }

    fn list(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(self.read()?.clone())
    }
}

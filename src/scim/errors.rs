//! # SCIM Errors
//!
//! Error types for validation, storage and the user lifecycle.

use thiserror::Error;

/// Result type for payload validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// First rule an inbound User payload violated.
///
/// The `Display` text is the reason surfaced to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("empty body")]
    EmptyBody,

    #[error("userName required")]
    UserNameRequired,

    #[error("userName format")]
    UserNameFormat,

    #[error("email value required")]
    EmailValueRequired,

    /// Carries the offending address
    #[error("email format: {0}")]
    EmailFormat(String),

    #[error("schemas required")]
    SchemasRequired,

    #[error("schemas must include core User schema")]
    CoreSchemaMissing,
}

/// Identity record store failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Another thread panicked while holding the store lock
    #[error("store lock poisoned")]
    LockPoisoned,

    /// A record with the same id is already stored
    #[error("duplicate record id: {0}")]
    DuplicateId(uuid::Uuid),
}

/// Outcome of a lifecycle operation that did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    // ==================
    // Expected outcomes
    // ==================
    /// Payload rejected by the validator
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No record carries the requested id
    #[error("User with id \"{0}\" not found")]
    NotFound(String),

    /// Another record already owns the userName
    #[error("User with userName \"{0}\" already exists")]
    Conflict(String),

    // ==================
    // Faults
    // ==================
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

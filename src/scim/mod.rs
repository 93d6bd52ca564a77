//! # SCIM User Resources
//!
//! Validation, mapping, storage and lifecycle of SCIM 2.0 User resources.
//!
//! Data flows one way per request:
//!
//! ```text
//! wire payload -> validator -> mapper -> lifecycle -> store
//! ```
//!
//! and back through `mapper::to_wire` for responses.

pub mod errors;
pub mod lifecycle;
pub mod mapper;
pub mod record;
pub mod schema;
pub mod store;
pub mod validator;

pub use errors::{LifecycleError, LifecycleResult, StoreError, StoreResult, ValidationError};
pub use lifecycle::{UpdateMode, UserLifecycle};
pub use record::{Email, UserRecord};
pub use schema::{
    EmailPayload, NamePayload, ScimListResponse, ScimUserResponse, UserPayload, CORE_USER_SCHEMA,
    LIST_RESPONSE_SCHEMA,
};
pub use store::{InMemoryUserStore, UserStore};

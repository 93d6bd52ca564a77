//! scim-import - SCIM 2.0 user provisioning and webhook import service
//!
//! - `scim`: User resource validation, mapping, storage and lifecycle
//! - `http_server`: Axum REST surface, bearer gate, request logging
//! - `observability`: structured JSON logging
//! - `cli`: configuration loading and process entry

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod scim;

//! # HTTP Server Module
//!
//! SCIM 2.0 REST surface over the user lifecycle.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/` - Service descriptor
//! - `{base_path}/Users` - Create (POST) and list (GET)
//! - `{base_path}/Users/:id` - Get, update (PUT) and delete
//! - `{base_path}/webhook/users` - Webhook ingestion, same flow as create
//!
//! `base_path` defaults to `/scim/v2`. Routes under it sit behind the bearer
//! token gate when `require_auth` is set. Every response carries security
//! headers, and clients are held to a per-IP request budget.

pub mod auth;
pub mod config;
pub mod errors;
pub mod rate_limit;
pub mod request_log;
pub mod scim_routes;
pub mod security_headers;
pub mod server;
pub mod service_routes;

pub use auth::{AuthGate, AuthRejection};
pub use config::{ConfigError, HttpServerConfig, RateLimitConfig};
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use scim_routes::ScimState;
pub use server::HttpServer;

//! Service HTTP Routes
//!
//! Unauthenticated endpoints outside the SCIM mount: health check, service
//! descriptor and the catch-all 404.

use axum::{
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::errors::ApiError;
use crate::observability::{log_event_with_fields, Event};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Root endpoint response
#[derive(Debug, Clone, Serialize)]
pub struct ServiceDescriptor {
    pub message: String,
    pub version: String,
    pub endpoints: ServiceEndpoints,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceEndpoints {
    pub scim: String,
    pub webhook: String,
}

impl ServiceDescriptor {
    pub fn new(base_path: &str) -> Self {
        Self {
            message: "SCIM Import Service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoints: ServiceEndpoints {
                scim: base_path.to_string(),
                webhook: format!("{}/webhook/users", base_path),
            },
        }
    }
}

/// Health and descriptor routes
pub fn service_routes(base_path: &str) -> Router {
    let descriptor = ServiceDescriptor::new(base_path);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/",
            get(move || {
                let descriptor = descriptor.clone();
                async move { Json(descriptor) }
            }),
        )
        .method_not_allowed_fallback(not_found_handler)
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "UP".to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Fallback for unmatched routes
pub async fn not_found_handler(method: Method, uri: Uri) -> ApiError {
    log_event_with_fields(
        Event::RouteNotFound,
        &[("method", method.as_str()), ("path", uri.path())],
    );
    ApiError::RouteNotFound
}

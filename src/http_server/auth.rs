//! Bearer Token Gate
//!
//! Pass/fail check applied in front of the SCIM routes. Disabled unless
//! `require_auth` is set.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;
use thiserror::Error;

use super::config::HttpServerConfig;
use super::errors::ErrorResponse;
use crate::observability::{log_event_with_fields, Event};

/// Why the gate refused a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("Authorization header is missing")]
    MissingHeader,

    #[error("Invalid authorization format. Use Bearer token")]
    InvalidFormat,

    #[error("Invalid token")]
    InvalidToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::message(self.to_string())),
        )
            .into_response()
    }
}

/// Authentication gate settings
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    require_auth: bool,
    api_key: Option<String>,
}

impl AuthGate {
    pub fn new(require_auth: bool, api_key: Option<String>) -> Self {
        Self {
            require_auth,
            api_key,
        }
    }

    pub fn from_config(config: &HttpServerConfig) -> Self {
        Self::new(config.require_auth, config.api_key.clone())
    }

    /// Check an `Authorization` header value
    pub fn check(&self, authorization: Option<&str>) -> Result<(), AuthRejection> {
        if !self.require_auth {
            return Ok(());
        }

        let header = authorization.ok_or(AuthRejection::MissingHeader)?;

        let mut parts = header.split(' ');
        let token = match (parts.next(), parts.next(), parts.next()) {
            (Some("Bearer"), Some(token), None) => token,
            _ => return Err(AuthRejection::InvalidFormat),
        };

        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() && bool::from(token.as_bytes().ct_eq(key.as_bytes())) => {
                Ok(())
            }
            _ => Err(AuthRejection::InvalidToken),
        }
    }
}

/// Middleware enforcing the gate
pub async fn require_bearer(
    State(gate): State<Arc<AuthGate>>,
    request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match gate.check(authorization) {
        Ok(()) => next.run(request).await,
        Err(rejection) => {
            log_event_with_fields(
                Event::AuthRejected,
                &[
                    ("path", request.uri().path()),
                    ("reason", &rejection.to_string()),
                ],
            );
            rejection.into_response()
        }
    }
}

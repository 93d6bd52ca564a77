//! # HTTP Errors
//!
//! Maps lifecycle outcomes and boundary faults onto SCIM-style JSON error
//! bodies. Internal faults are logged in full and reported generically.

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event};
use crate::scim::{LifecycleError, UserPayload};

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

const INTERNAL_ERROR: &str = "Internal server error";
const INTERNAL_DETAIL: &str = "An unexpected error occurred while processing the request";

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Lifecycle(#[from] LifecycleError),

    /// Body could not be decoded as a User payload
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Body exceeds the buffering limit
    #[error("Request body too large")]
    PayloadTooLarge,

    /// No route matched
    #[error("Resource not found")]
    RouteNotFound,
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Lifecycle(err) => match err {
                LifecycleError::Validation(_) => StatusCode::BAD_REQUEST,
                LifecycleError::NotFound(_) => StatusCode::NOT_FOUND,
                LifecycleError::Conflict(_) => StatusCode::CONFLICT,
                LifecycleError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::MalformedBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    /// Body carrying only an error message
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: None,
            detail: None,
        }
    }

    fn with_status(error: &str, status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            status: Some(status.as_u16().to_string()),
            detail: Some(detail.into()),
        }
    }
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        let status = err.status_code();
        match err {
            ApiError::Lifecycle(LifecycleError::Validation(reason)) => {
                Self::message(reason.to_string())
            }
            ApiError::Lifecycle(LifecycleError::NotFound(_)) => {
                Self::with_status("User not found", status, err.to_string())
            }
            ApiError::Lifecycle(LifecycleError::Conflict(_)) => Self::with_status(
                "User with this userName already exists",
                status,
                err.to_string(),
            ),
            ApiError::RouteNotFound | ApiError::PayloadTooLarge => Self::message(err.to_string()),
            ApiError::Lifecycle(LifecycleError::Store(_)) | ApiError::MalformedBody(_) => {
                Self::with_status(INTERNAL_ERROR, status, INTERNAL_DETAIL)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log_event_with_fields(Event::InternalError, &[("error", &self.to_string())]);
        }
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}

/// Decode a request body into a User payload.
///
/// An empty body or JSON `null` yields `None`, and an array yields a payload
/// with no attributes. Both are left for the validator to reject. Other
/// non-object JSON values are malformed.
pub fn parse_payload(body: &Bytes) -> ApiResult<Option<UserPayload>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(body).map_err(malformed)?;
    match value {
        Value::Null => Ok(None),
        Value::Array(_) => Ok(Some(UserPayload::default())),
        Value::Object(_) => serde_json::from_value(value).map(Some).map_err(malformed),
        other => Err(ApiError::MalformedBody(format!(
            "expected a JSON object, found {}",
            other
        ))),
    }
}

fn malformed(err: serde_json::Error) -> ApiError {
    ApiError::MalformedBody(err.to_string())
}

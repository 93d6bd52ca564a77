//! Request Logging
//!
//! Logs each request on arrival (with a sanitized copy of its JSON body) and
//! on completion (with status and elapsed time). Bodies are buffered under
//! axum's default body limit; larger ones are answered with 413.

use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use super::errors::ApiError;
use crate::observability::{log_event_with_fields, Event};

const REDACTED: &str = "***REDACTED***";
const SENSITIVE_FIELDS: [&str; 2] = ["password", "token"];

/// Middleware logging every request and response
pub async fn log_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let (parts, body) = request.into_parts();
    let buffered = Bytes::from_request(Request::new(body), &()).await;
    let logged_body = match &buffered {
        Ok(bytes) => sanitize_body(bytes),
        Err(rejection) => format!("<body not read: {}>", rejection.status()),
    };

    log_event_with_fields(
        Event::RequestReceived,
        &[
            ("method", &method),
            ("path", &path),
            ("user_agent", &user_agent),
            ("body", &logged_body),
        ],
    );

    let response = match buffered {
        Ok(bytes) => next.run(Request::from_parts(parts, Body::from(bytes))).await,
        Err(rejection) => body_rejection(rejection).into_response(),
    };

    log_event_with_fields(
        Event::ResponseSent,
        &[
            ("method", &method),
            ("path", &path),
            ("status", response.status().as_str()),
            ("elapsed_ms", &started.elapsed().as_millis().to_string()),
        ],
    );

    response
}

fn body_rejection(rejection: BytesRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::MalformedBody(rejection.body_text())
    }
}

/// Body rendered for logging, with credential-like fields masked
pub fn sanitize_body(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(mut value) => {
            if let Value::Object(map) = &mut value {
                for field in SENSITIVE_FIELDS {
                    if let Some(v) = map.get_mut(field) {
                        *v = Value::String(REDACTED.to_string());
                    }
                }
            }
            value.to_string()
        }
        Err(_) => "<body could not be processed for logging>".to_string(),
    }
}

//! Per-client Rate Limiting
//!
//! Fixed-window request budget keyed by the peer IP address. Requests
//! whose peer address is unknown pass through unmetered.
//!
//! Every metered response carries:
//! - `RateLimit-Limit`: requests allowed per window
//! - `RateLimit-Remaining`: requests left in the current window
//! - `RateLimit-Reset`: seconds until the window resets
//!
//! Refused requests get 429 with `Retry-After`.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::config::RateLimitConfig;
use super::errors::ErrorResponse;
use crate::observability::{log_event_with_fields, Event};

const TOO_MANY_REQUESTS: &str = "Too many requests, please try again later.";

/// Client table size at which expired windows are swept
const SWEEP_THRESHOLD: usize = 10_000;

/// Outcome of metering one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed {
        remaining: u32,
        reset_after: Duration,
    },
    Limited {
        retry_after: Duration,
    },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window counter per client IP
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    /// Count one request from `ip` at `now`
    pub fn check(&self, ip: IpAddr, now: Instant) -> RateDecision {
        // Counters stay usable after a panic elsewhere
        let mut clients = self
            .clients
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if clients.len() >= SWEEP_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = clients.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        let reset_after = self
            .window
            .saturating_sub(now.duration_since(entry.started));
        if entry.count >= self.max_requests {
            return RateDecision::Limited {
                retry_after: reset_after,
            };
        }

        entry.count += 1;
        RateDecision::Allowed {
            remaining: self.max_requests - entry.count,
            reset_after,
        }
    }
}

/// Middleware enforcing the per-client budget
pub async fn limit_requests(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(ip) = peer_ip(&request) else {
        return next.run(request).await;
    };

    match limiter.check(ip, Instant::now()) {
        RateDecision::Allowed {
            remaining,
            reset_after,
        } => {
            let mut response = next.run(request).await;
            set_rate_headers(
                response.headers_mut(),
                limiter.max_requests,
                remaining,
                reset_after,
            );
            response
        }
        RateDecision::Limited { retry_after } => {
            log_event_with_fields(
                Event::RateLimited,
                &[("ip", &ip.to_string()), ("path", request.uri().path())],
            );

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse::message(TOO_MANY_REQUESTS)),
            )
                .into_response();
            let headers = response.headers_mut();
            set_rate_headers(headers, limiter.max_requests, 0, retry_after);
            headers.insert(header::RETRY_AFTER, HeaderValue::from(ceil_secs(retry_after)));
            response
        }
    }
}

fn peer_ip(request: &Request) -> Option<IpAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

fn set_rate_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset_after: Duration) {
    headers.insert("ratelimit-limit", HeaderValue::from(limit));
    headers.insert("ratelimit-remaining", HeaderValue::from(remaining));
    headers.insert("ratelimit-reset", HeaderValue::from(ceil_secs(reset_after)));
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([10, 0, 0, last])
    }

    #[test]
    fn test_budget_is_per_client() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();

        assert!(matches!(
            limiter.check(ip(1), now),
            RateDecision::Allowed { remaining: 1, .. }
        ));
        assert!(matches!(
            limiter.check(ip(1), now),
            RateDecision::Allowed { remaining: 0, .. }
        ));
        assert!(matches!(
            limiter.check(ip(1), now),
            RateDecision::Limited { .. }
        ));
        assert!(matches!(
            limiter.check(ip(2), now),
            RateDecision::Allowed { remaining: 1, .. }
        ));
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        limiter.check(ip(1), start);
        assert_eq!(
            limiter.check(ip(1), start + Duration::from_secs(20)),
            RateDecision::Limited {
                retry_after: Duration::from_secs(40)
            }
        );
        assert!(matches!(
            limiter.check(ip(1), start + Duration::from_secs(60)),
            RateDecision::Allowed { remaining: 0, .. }
        ));
    }

    #[test]
    fn test_refused_requests_are_not_counted() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        limiter.check(ip(1), start);
        for _ in 0..5 {
            limiter.check(ip(1), start);
        }
        assert!(matches!(
            limiter.check(ip(1), start + Duration::from_secs(60)),
            RateDecision::Allowed { .. }
        ));
    }

    #[test]
    fn test_ceil_secs() {
        assert_eq!(ceil_secs(Duration::from_millis(1)), 1);
        assert_eq!(ceil_secs(Duration::from_secs(900)), 900);
        assert_eq!(ceil_secs(Duration::ZERO), 0);
    }
}

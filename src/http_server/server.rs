//! # HTTP Server
//!
//! Combines the SCIM routes, the service routes and the middleware stack
//! into one Axum server.
//!
//! Middleware, outermost first: security headers, per-client rate limit,
//! request log, CORS, then the bearer gate on the SCIM routes only.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::auth::{require_bearer, AuthGate};
use super::config::HttpServerConfig;
use super::rate_limit::{limit_requests, RateLimiter};
use super::request_log::log_requests;
use super::scim_routes::{scim_routes, ScimState};
use super::security_headers::with_security_headers;
use super::service_routes::{not_found_handler, service_routes};
use crate::observability::{log_event_with_fields, Event};

/// HTTP server for the SCIM service
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with custom configuration and an empty
    /// in-memory store
    pub fn with_config(config: HttpServerConfig) -> Self {
        Self::with_state(config, Arc::new(ScimState::new()))
    }

    /// Create a server over existing SCIM state
    pub fn with_state(config: HttpServerConfig, state: Arc<ScimState>) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, state: Arc<ScimState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let gate = Arc::new(AuthGate::from_config(config));
        let scim = scim_routes(state).layer(middleware::from_fn_with_state(gate, require_bearer));

        let mut router = Router::new()
            // Health check and descriptor, never gated
            .merge(service_routes(&config.base_path))
            // SCIM resources behind the bearer gate
            .nest(&config.base_path, scim)
            .fallback(not_found_handler)
            .layer(cors)
            .layer(middleware::from_fn(log_requests));

        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
            router = router.layer(middleware::from_fn_with_state(limiter, limit_requests));
        }

        with_security_headers(router)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let limit = &self.config.rate_limit;
        let rate_limit = if limit.enabled {
            format!("{}/{}s", limit.max_requests, limit.window_secs)
        } else {
            "off".to_string()
        };
        log_event_with_fields(
            Event::ServerStarting,
            &[
                ("addr", &addr),
                ("base_path", &self.config.base_path),
                ("require_auth", &self.config.require_auth.to_string()),
                ("rate_limit", &rate_limit),
            ],
        );

        let listener = TcpListener::bind(&addr).await?;
        let local = listener.local_addr()?.to_string();
        log_event_with_fields(
            Event::Serving,
            &[
                ("addr", &local),
                (
                    "webhook",
                    &format!("{}/webhook/users", self.config.base_path),
                ),
            ],
        );

        // Peer addresses feed the rate limiter
        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app).await?;

        Ok(())
    }
}

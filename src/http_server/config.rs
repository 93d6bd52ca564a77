//! HTTP Server Configuration
//!
//! Bind address, CORS, authentication gate, rate limiting and SCIM mount
//! point.
//! Values come from a JSON file, then environment overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding `port`
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding `require_auth` ("true" enables)
pub const ENV_REQUIRE_AUTH: &str = "REQUIRE_AUTH";
/// Environment variable overriding `api_key`
pub const ENV_API_KEY: &str = "API_KEY";

const REDACTED: &str = "***REDACTED***";

/// Configuration problems detected before the server starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("require_auth is enabled but no api_key is configured")]
    MissingApiKey,

    #[error("port must be > 0")]
    ZeroPort,

    #[error("base_path must start with '/' and name a sub-path without trailing '/': {0:?}")]
    InvalidBasePath(String),

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("rate_limit needs max_requests > 0 and window_secs > 0 when enabled")]
    InvalidRateLimit,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (default: empty, meaning any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Require `Authorization: Bearer <api_key>` on SCIM routes
    #[serde(default)]
    pub require_auth: bool,

    /// Shared bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Where the SCIM routes are mounted (default: "/scim/v2")
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Per-client request budget
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Fixed-window request budget per client IP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Default: true
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,

    /// Requests allowed per window (default: 100)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds (default: 900)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

fn default_rate_limit_enabled() -> bool {
    true
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_secs() -> u64 {
    15 * 60
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_path() -> String {
    "/scim/v2".to_string()
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            require_auth: false,
            api_key: None,
            base_path: default_base_path(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Enable the bearer-token gate with the given key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.require_auth = true;
        self.api_key = Some(api_key.into());
        self
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Apply `PORT`, `REQUIRE_AUTH` and `API_KEY` from `lookup`.
    ///
    /// `lookup` is normally `std::env::var(..).ok()`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_PORT,
                value: port.clone(),
            })?;
        }
        if let Some(flag) = lookup(ENV_REQUIRE_AUTH) {
            self.require_auth = flag == "true";
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key).filter(|k| !k.is_empty());
        }
        Ok(())
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        let path = &self.base_path;
        if !path.starts_with('/') || path.len() < 2 || path.ends_with('/') {
            return Err(ConfigError::InvalidBasePath(self.base_path.clone()));
        }
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.is_empty());
        if self.require_auth && !has_key {
            return Err(ConfigError::MissingApiKey);
        }
        let limit = &self.rate_limit;
        if limit.enabled && (limit.max_requests == 0 || limit.window_secs == 0) {
            return Err(ConfigError::InvalidRateLimit);
        }
        Ok(())
    }

    /// Copy safe to print, with the API key masked
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| REDACTED.to_string()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = HttpServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.base_path, "/scim/v2");
        assert!(!config.require_auth);
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window_secs, 900);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = HttpServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: HttpServerConfig = serde_json::from_str(r#"{"port": 4000}"#).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.base_path, "/scim/v2");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = HttpServerConfig::default();
        config
            .apply_env(env(&[
                ("PORT", "8081"),
                ("REQUIRE_AUTH", "true"),
                ("API_KEY", "secret"),
            ]))
            .unwrap();

        assert_eq!(config.port, 8081);
        assert!(config.require_auth);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_require_auth_only_accepts_literal_true() {
        let mut config = HttpServerConfig::default();
        config.apply_env(env(&[("REQUIRE_AUTH", "yes")])).unwrap();
        assert!(!config.require_auth);
    }

    #[test]
    fn test_invalid_port_env() {
        let mut config = HttpServerConfig::default();
        let err = config.apply_env(env(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                name: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_validate_rejects_auth_without_key() {
        let config = HttpServerConfig {
            require_auth: true,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MissingApiKey));
        assert!(HttpServerConfig::default()
            .with_api_key("k")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_base_path_and_port() {
        let config = HttpServerConfig {
            base_path: "scim".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBasePath(_))
        ));
        for bad in ["/", "/scim/"] {
            let config = HttpServerConfig {
                base_path: bad.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{bad} accepted");
        }
        assert_eq!(
            HttpServerConfig::with_port(0).validate(),
            Err(ConfigError::ZeroPort)
        );
    }

    #[test]
    fn test_partial_rate_limit_json() {
        let config: HttpServerConfig =
            serde_json::from_str(r#"{"rate_limit": {"max_requests": 5}}"#).unwrap();
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window_secs, 900);
    }

    #[test]
    fn test_validate_rate_limit() {
        let mut config = HttpServerConfig::default();
        config.rate_limit.max_requests = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidRateLimit));

        config.rate_limit.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_redacted_masks_key() {
        let config = HttpServerConfig::default().with_api_key("secret");
        let shown = serde_json::to_string(&config.redacted()).unwrap();
        assert!(!shown.contains("secret"));
        assert!(shown.contains("REDACTED"));
    }
}

//! HTTP listener and CORS settings.
//!
//! The listener half covers the bind address and the actix worker pool; the
//! CORS half is consumed by the API crate's middleware builder. Environment
//! variables: `SERVER_HOST`, `SERVER_PORT`, `SERVER_WORKERS`,
//! `SERVER_KEEP_ALIVE`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_KEEP_ALIVE_SECS: u64 = 75;
const PREFLIGHT_CACHE_SECS: u64 = 86_400;

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Worker threads; zero lets actix size the pool from the CPU count
    pub workers: usize,

    /// Keep-alive timeout in seconds
    pub keep_alive: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: 0,
            keep_alive: DEFAULT_KEEP_ALIVE_SECS,
        }
    }
}

impl ServerConfig {
    /// Read listener settings from `SERVER_*` environment variables.
    ///
    /// Unset or unparseable values fall back to the defaults rather than
    /// aborting startup.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("SERVER_HOST").unwrap_or(defaults.host),
            port: env_parsed("SERVER_PORT").unwrap_or(defaults.port),
            workers: env_parsed("SERVER_WORKERS").unwrap_or(defaults.workers),
            keep_alive: env_parsed("SERVER_KEEP_ALIVE").unwrap_or(defaults.keep_alive),
        }
    }

    /// Address in `host:port` form for `HttpServer::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Keep-alive timeout as a [`Duration`].
    pub fn keep_alive_duration(&self) -> Duration {
        Duration::from_secs(self.keep_alive)
    }

    /// Explicit worker count, or `None` when actix should pick one.
    pub fn worker_count(&self) -> Option<usize> {
        (self.workers > 0).then_some(self.workers)
    }
}

/// Cross-origin resource sharing policy.
///
/// The default policy enables the middleware with an empty origin list,
/// which keeps the API same-origin until a deployment adds the portal and
/// field-app origins.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Whether the middleware is applied at all
    pub enabled: bool,

    /// Origins allowed to call the API; `"*"` opens it to any origin
    pub allowed_origins: Vec<String>,

    /// HTTP methods accepted on cross-origin requests
    pub allowed_methods: Vec<String>,

    /// Request headers accepted on cross-origin requests
    pub allowed_headers: Vec<String>,

    /// Whether cookies and authorization headers may cross origins
    pub allow_credentials: bool,

    /// Preflight response cache lifetime in seconds
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: Vec::new(),
            allowed_methods: string_list(&["GET", "POST", "OPTIONS"]),
            allowed_headers: string_list(&[
                "Content-Type",
                "Authorization",
                "Accept",
                "Accept-Language",
            ]),
            allow_credentials: false,
            max_age: PREFLIGHT_CACHE_SECS,
        }
    }
}

impl CorsConfig {
    /// Wide-open policy for local development: any origin, method and header.
    pub fn development() -> Self {
        Self {
            enabled: true,
            allowed_origins: string_list(&["*"]),
            allowed_methods: string_list(&["*"]),
            allowed_headers: string_list(&["*"]),
            allow_credentials: true,
            max_age: 3600,
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.parse().ok()
}

fn string_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.worker_count(), None);
        assert_eq!(config.keep_alive_duration(), Duration::from_secs(75));
    }

    #[test]
    fn test_worker_count_explicit() {
        let config = ServerConfig {
            workers: 4,
            ..Default::default()
        };
        assert_eq!(config.worker_count(), Some(4));
    }

    #[test]
    fn test_from_env_parsing() {
        // SERVER_* vars are only touched by this test.
        std::env::set_var("SERVER_PORT", "not-a-port");
        assert_eq!(ServerConfig::from_env().port, 8080);

        std::env::set_var("SERVER_HOST", "127.0.0.1");
        std::env::set_var("SERVER_PORT", "9090");
        std::env::set_var("SERVER_WORKERS", "2");
        let config = ServerConfig::from_env();
        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.worker_count(), Some(2));

        std::env::remove_var("SERVER_HOST");
        std::env::remove_var("SERVER_PORT");
        std::env::remove_var("SERVER_WORKERS");
    }

    #[test]
    fn test_cors_default_is_same_origin() {
        let config = CorsConfig::default();
        assert!(config.enabled);
        assert!(config.allowed_origins.is_empty());
        assert!(!config.allow_credentials);
        assert_eq!(config.max_age, 86_400);
    }

    #[test]
    fn test_cors_development_is_wide_open() {
        let config = CorsConfig::development();
        assert_eq!(config.allowed_origins, vec!["*"]);
        assert_eq!(config.allowed_methods, vec!["*"]);
        assert!(config.allow_credentials);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: CorsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(
            config.allowed_methods,
            CorsConfig::default().allowed_methods
        );

        let config: ServerConfig = serde_json::from_str(r#"{"port": 3000}"#).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }
}

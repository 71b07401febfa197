//! Management API configuration with validation.
//!
//! Defaults are production-usable; `from_env` overlays `MB_API_*` variables.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tracing::warn;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementConfig {
    /// HTTP listener
    pub http: HttpConfig,
    /// Route prefix
    pub api: ApiConfig,
    /// List endpoint defaults
    pub pagination: PaginationConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Shutdown behaviour
    pub shutdown: ShutdownConfig,
    /// Log filter used when `RUST_LOG` is unset
    pub logging: LoggingConfig,
}

impl ManagementConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.api.prefix;
        if !prefix.starts_with('/') || (prefix.len() > 1 && prefix.ends_with('/')) {
            return Err(ConfigError::InvalidPrefix(prefix.clone()));
        }

        if self.pagination.default_limit == 0 {
            return Err(ConfigError::InvalidLimit(
                "default_limit cannot be 0".into(),
            ));
        }

        if self.pagination.default_message_limit == 0 {
            return Err(ConfigError::InvalidLimit(
                "default_message_limit cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }

    /// Defaults overlaid with `MB_API_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`. Unparsable values are
    /// logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("MB_API_HOST") {
            match host.parse() {
                Ok(h) => config.http.host = h,
                Err(_) => warn!(value = %host, "ignoring invalid MB_API_HOST"),
            }
        }
        if let Some(port) = lookup("MB_API_PORT") {
            match port.parse() {
                Ok(p) => config.http.port = p,
                Err(_) => warn!(value = %port, "ignoring invalid MB_API_PORT"),
            }
        }
        if let Some(prefix) = lookup("MB_API_PREFIX") {
            config.api.prefix = prefix;
        }
        config.logging = LoggingConfig::from_lookup(&lookup);

        config
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 9443, 0 picks an ephemeral port)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 9443,
        }
    }
}

/// Route layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix every route is nested under
    pub prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: "/mb/api".into(),
        }
    }
}

/// Default page sizes for list endpoints
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Destinations and subscriptions
    pub default_limit: i64,
    /// Messages (smaller per item)
    pub default_message_limit: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            default_message_limit: 100,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    /// Preflight cache in seconds
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".into()],
            allowed_methods: vec![
                "GET".into(),
                "POST".into(),
                "PUT".into(),
                "DELETE".into(),
                "OPTIONS".into(),
            ],
            allowed_headers: vec!["*".into()],
            max_age: 3600,
        }
    }
}

/// Shutdown configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Time allowed for in-flight requests to drain
    pub grace_period_ms: u64,
}

impl ShutdownConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: 10_000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl LoggingConfig {
    /// Logging section alone, readable before the subscriber exists.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup("MB_API_LOG")
            .map(|level| Self { level })
            .unwrap_or_default()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid api prefix '{0}': must start with '/' and not end with '/'")]
    InvalidPrefix(String),

    #[error("invalid limit: {0}")]
    InvalidLimit(String),
}

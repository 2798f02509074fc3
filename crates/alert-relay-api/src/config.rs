//! Configuration types for the HTTP service

use crate::errors::ConfigError;
use alert_relay_core::PayloadLayout;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment variables overriding configuration values.
///
/// Keys are separated by `__`, e.g. `ALERT_RELAY__SERVER__PORT=9090` sets
/// `server.port`.
pub const CONFIG_ENV_PREFIX: &str = "ALERT_RELAY";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_FILE_ENV: &str = "ALERT_RELAY_CONFIG_FILE";

/// Service configuration
///
/// Every section carries serde defaults, so an empty configuration source
/// produces a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Inbound relay settings
    pub relay: RelayConfig,

    /// Outbound forwarding settings
    pub forwarding: ForwardingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Load the configuration from every source, later sources overriding
    /// earlier ones:
    ///
    /// 1. `/etc/alert-relay/service.yaml` (optional)
    /// 2. `./config/service.yaml` (optional)
    /// 3. `explicit_path` (required when given; format from its extension)
    /// 4. Environment variables prefixed with [`CONFIG_ENV_PREFIX`]
    ///
    /// Absent files fall back to the serde defaults. A file or variable that
    /// is present but malformed is an error.
    ///
    /// The result is not validated; call [`ServiceConfig::validate`].
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(
                config::File::with_name("/etc/alert-relay/service")
                    .required(false)
                    .format(config::FileFormat::Yaml),
            )
            .add_source(
                config::File::with_name("config/service")
                    .required(false)
                    .format(config::FileFormat::Yaml),
            );

        if let Some(path) = explicit_path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(config::Environment::with_prefix(CONFIG_ENV_PREFIX).separator("__"))
            .build()
            .and_then(|loaded| loaded.try_deserialize())
            .map_err(|e| ConfigError::Load {
                message: e.to_string(),
            })
    }

    /// Validate the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_size must be greater than 0".to_string(),
            });
        }

        if !self.relay.endpoint_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                message: format!(
                    "relay.endpoint_path '{}' must start with '/'",
                    self.relay.endpoint_path
                ),
            });
        }

        if self.relay.enable_layout_routes && self.relay.endpoint_path.starts_with("/webhook/") {
            return Err(ConfigError::Invalid {
                message: format!(
                    "relay.endpoint_path '{}' collides with the per-layout routes under /webhook/",
                    self.relay.endpoint_path
                ),
            });
        }

        if self.forwarding.timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                message: "forwarding.timeout_seconds must be greater than 0".to_string(),
            });
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::Invalid {
                message: format!("logging.level '{}' is not a valid level", other),
            }),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,

    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
            max_body_size: 1024 * 1024, // 1MB
            enable_cors: true,
        }
    }
}

/// Inbound relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Path of the relay endpoint that uses `default_layout`
    pub endpoint_path: String,

    /// Payload layout expected on `endpoint_path`
    pub default_layout: PayloadLayout,

    /// Also serve `/webhook/{layout}` for every layout
    pub enable_layout_routes: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint_path: "/webhook".to_string(),
            default_layout: PayloadLayout::CommonLabels,
            enable_layout_routes: true,
        }
    }
}

/// Outbound forwarding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Timeout for each forwarded request in seconds
    pub timeout_seconds: u64,

    /// User-Agent sent with forwarded requests
    pub user_agent: String,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: format!("alert-relay/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

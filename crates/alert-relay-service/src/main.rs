//! # Alert-Relay Service
//!
//! Binary entry point for the Alert-Relay HTTP service.
//!
//! This executable:
//! - Loads configuration from files and environment
//! - Initializes logging
//! - Creates the HTTP forwarder
//! - Starts the HTTP server from alert-relay-api

use alert_relay_api::{
    config::CONFIG_FILE_ENV, start_server, DefaultHealthChecker, HttpForwarder, LoggingConfig,
    ServiceConfig, ServiceError,
};
use anyhow::Context;
use std::{path::PathBuf, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -------------------------------------------------------------------------
    // Load configuration
    //
    // Sources (applied in order, later sources override earlier ones):
    //  1. /etc/alert-relay/service.yaml
    //  2. ./config/service.yaml
    //  3. Path given by ALERT_RELAY_CONFIG_FILE
    //  4. Environment variables prefixed ALERT_RELAY__ (double-underscore
    //     separator), e.g. ALERT_RELAY__SERVER__PORT=9090
    //
    // Logging depends on the loaded configuration, so a load failure is only
    // reported once logging is up with the defaults.
    // -------------------------------------------------------------------------
    let explicit_path = std::env::var(CONFIG_FILE_ENV)
        .ok()
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);

    let loaded = ServiceConfig::load(explicit_path.as_deref()).and_then(|config| {
        config.validate()?;
        Ok(config)
    });

    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    initialize_logging(&logging);

    let service_config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Service configuration is invalid; aborting");
            std::process::exit(3);
        }
    };

    if let Some(path) = &explicit_path {
        info!(path = %path.display(), "Loaded configuration from explicit path");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        default_layout = %service_config.relay.default_layout,
        layout_routes = service_config.relay.enable_layout_routes,
        "Starting Alert-Relay Service"
    );

    let forwarder = Arc::new(
        HttpForwarder::new(&service_config.forwarding)
            .context("Failed to create HTTP client for forwarding")?,
    );
    let health_checker = Arc::new(DefaultHealthChecker);

    if let Err(e) = start_server(service_config, forwarder, health_checker).await {
        error!("Failed to start server: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        std::process::exit(exit_code);
    }

    Ok(())
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn initialize_logging(logging: &LoggingConfig) {
    let level = logging.level.to_lowercase();
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "alert_relay_service={level},alert_relay_api={level},alert_relay_core={level},tower_http=debug"
        )
        .into()
    });

    let json_layer = logging
        .json_format
        .then(|| tracing_subscriber::fmt::layer().json());
    let text_layer = (!logging.json_format).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

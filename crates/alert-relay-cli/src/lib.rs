//! # Alert-Relay CLI
//!
//! Command-line interface for Alert-Relay.
//!
//! This module provides CLI commands for:
//! - Dry-running a payload through target extraction and rule resolution,
//!   printing what would be forwarded without sending anything
//! - Configuration validation

use alert_relay_api::{ConfigError, ServiceConfig};
use alert_relay_core::{FieldResolver, LayoutError, PayloadLayout, ResolveError, ResolvedParams};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

// ============================================================================
// CLI Structure
// ============================================================================

/// Alert-Relay CLI - Webhook relay for monitoring alerts
#[derive(Parser)]
#[command(name = "alert-relay")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Relay monitoring webhooks to per-alert destinations")]
#[command(
    long_about = "Alert-Relay resolves JSONPath field rules embedded in monitoring webhooks and forwards the result to the destination each alert names"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ALERT_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a payload and print the alerts it would forward
    Resolve {
        /// Payload layout (common-labels, message, alerts); defaults to
        /// `relay.default_layout` from the configuration
        #[arg(long)]
        layout: Option<PayloadLayout>,

        /// JSON payload file
        file: PathBuf,
    },

    /// Validate configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,

        /// Output format for configuration
        #[arg(short = 'f', long, default_value = "yaml")]
        format: ConfigFormat,
    },
}

/// Configuration format options
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// One alert as it would be forwarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedForward {
    /// Destination of the forwarded request
    #[serde(rename = "webhookUrl")]
    pub webhook_url: String,

    /// JSON body of the forwarded request
    pub body: ResolvedParams,
}

// ============================================================================
// Error Types
// ============================================================================

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Invalid payload '{path}': {message}")]
    InvalidPayload { path: String, message: String },

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Failed to write output: {message}")]
    Output { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Main CLI Entry Point
// ============================================================================

/// Parse the process arguments and run the selected command.
pub fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();

    initialize_logging(&cli);

    let stdout = std::io::stdout();
    execute(cli, &mut stdout.lock())
}

/// Run a parsed command, writing its output to `out`.
pub fn execute(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let config = load_configuration(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve { layout, file } => {
            let layout = layout.unwrap_or(config.relay.default_layout);
            execute_resolve_command(layout, &file, out)
        }
        Commands::Config { show, format } => execute_config_command(&config, show, format, out),
    }
}

/// Extract and resolve every relay target in `payload`.
///
/// Mirrors what the relay endpoint does before forwarding.
pub fn resolve_payload(
    layout: PayloadLayout,
    payload: &Value,
) -> Result<Vec<ResolvedForward>, CliError> {
    let resolver = FieldResolver::new(layout.resolution_mode());

    layout
        .extract_targets(payload)?
        .into_iter()
        .map(|target| {
            let body = resolver.resolve(&target.rules, payload)?;
            Ok(ResolvedForward {
                webhook_url: target.webhook_url,
                body,
            })
        })
        .collect()
}

// ============================================================================
// Command Implementations
// ============================================================================

/// Logs go to stderr so command output can be piped.
fn initialize_logging(cli: &Cli) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = if cli.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Load configuration from the standard sources plus an optional file
fn load_configuration(config_path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let config = ServiceConfig::load(config_path)?;
    config.validate()?;

    debug!(
        path = ?config_path,
        default_layout = %config.relay.default_layout,
        "Loaded configuration"
    );

    Ok(config)
}

/// Execute resolve command
fn execute_resolve_command(
    layout: PayloadLayout,
    file: &Path,
    out: &mut impl Write,
) -> Result<(), CliError> {
    info!(layout = %layout, file = %file.display(), "Resolving payload");

    let contents = std::fs::read(file)?;
    let invalid = |message: String| CliError::InvalidPayload {
        path: file.display().to_string(),
        message,
    };

    if contents.iter().all(u8::is_ascii_whitespace) {
        return Err(invalid("payload is empty".to_string()));
    }

    let payload: Value = serde_json::from_slice(&contents).map_err(|e| invalid(e.to_string()))?;
    if payload.is_null() {
        return Err(invalid("payload is empty".to_string()));
    }

    let forwards = resolve_payload(layout, &payload)?;

    serde_json::to_writer_pretty(&mut *out, &forwards).map_err(|e| CliError::Output {
        message: e.to_string(),
    })?;
    writeln!(out)?;

    Ok(())
}

/// Execute config command
fn execute_config_command(
    config: &ServiceConfig,
    show: bool,
    format: ConfigFormat,
    out: &mut impl Write,
) -> Result<(), CliError> {
    info!(show = show, format = ?format, "Processing config command");

    if !show {
        writeln!(out, "Configuration is valid")?;
        return Ok(());
    }

    let rendered = match format {
        ConfigFormat::Yaml => serde_yaml::to_string(config).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| e.to_string()),
    }
    .map_err(|message| CliError::Output { message })?;

    writeln!(out, "{}", rendered.trim_end())?;
    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

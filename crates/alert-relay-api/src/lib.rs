//! # Alert-Relay HTTP Service
//!
//! HTTP server that receives monitoring webhooks, resolves their field rules
//! against the payload and forwards the resolved bodies to the destinations
//! named in the payload.
//!
//! This service provides:
//! - The relay endpoint for the configured default payload layout
//! - Per-layout relay endpoints under `/webhook/{layout}`
//! - Health and readiness endpoints
//! - A Prometheus metrics endpoint

pub mod config;
pub mod errors;
pub mod forwarder;
pub mod health;
pub mod metrics;
pub mod relay;
pub mod responses;

pub use config::{ForwardingConfig, LoggingConfig, RelayConfig, ServerConfig, ServiceConfig};
pub use errors::{ConfigError, RelayError, ServiceError};
pub use forwarder::{AlertForwarder, ForwardError, ForwardRequest, HttpForwarder};
pub use health::{DefaultHealthChecker, HealthChecker, HealthStatus};
pub use metrics::RelayMetrics;
pub use responses::{HealthCheckResult, HealthResponse, MessageResponse, ReadinessResponse};

use alert_relay_core::PayloadLayout;
use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderMap, Method, StatusCode},
    middleware,
    response::{Json, Response},
    routing::{any, get},
    Router,
};
use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, instrument, warn};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: ServiceConfig,

    /// Delivers resolved alerts to their destinations
    pub forwarder: Arc<dyn AlertForwarder>,

    /// Health checker for system monitoring
    pub health_checker: Arc<dyn HealthChecker>,

    /// Metrics collector for observability
    pub metrics: Arc<RelayMetrics>,
}

impl AppState {
    pub fn new(
        config: ServiceConfig,
        forwarder: Arc<dyn AlertForwarder>,
        health_checker: Arc<dyn HealthChecker>,
        metrics: Arc<RelayMetrics>,
    ) -> Self {
        Self {
            config,
            forwarder,
            health_checker,
            metrics,
        }
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let mut relay_routes =
        Router::new().route(&state.config.relay.endpoint_path, any(handle_relay));

    if state.config.relay.enable_layout_routes {
        relay_routes = relay_routes.route("/webhook/{layout}", any(handle_layout_relay));
    }

    let health_routes = Router::new()
        .route("/health", get(handle_health_check))
        .route("/ready", get(handle_readiness_check));

    let observability_routes = Router::new().route("/metrics", get(metrics_endpoint));

    let mut router = Router::new()
        .merge(relay_routes)
        .merge(health_routes)
        .merge(observability_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(state.config.server.max_body_size))
                .layer(middleware::from_fn(request_logging_middleware))
                .into_inner(),
        );

    if state.config.server.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

/// Start HTTP server
pub async fn start_server(
    config: ServiceConfig,
    forwarder: Arc<dyn AlertForwarder>,
    health_checker: Arc<dyn HealthChecker>,
) -> Result<(), ServiceError> {
    let metrics = RelayMetrics::new().map_err(|e| {
        ServiceError::Configuration(ConfigError::Invalid {
            message: format!("Failed to initialize metrics: {}", e),
        })
    })?;

    let state = AppState::new(config.clone(), forwarder, health_checker, metrics);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: addr.clone(),
                message: e.to_string(),
            })?;

    info!(
        address = %addr,
        endpoint = %config.relay.endpoint_path,
        default_layout = %config.relay.default_layout,
        "Starting HTTP server"
    );

    let shutdown_timeout = std::time::Duration::from_secs(config.server.shutdown_timeout_seconds);

    let shutdown_signal = async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C signal handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
            },
            _ = terminate => {
                info!("Received SIGTERM, initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
            },
        }
    };

    // In-flight relays finish; new connections are refused once the signal fires.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("HTTP server shutdown complete");
    Ok(())
}

// ============================================================================
// Relay Handlers
// ============================================================================

/// Relay endpoint for the configured default layout.
///
/// Routed for every method so that non-`POST` requests get the relay's own
/// `405` body rather than an empty router response.
#[instrument(skip(state, headers, body))]
async fn handle_relay(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MessageResponse>, RelayError> {
    let layout = state.config.relay.default_layout;
    relay::relay_alert(&state, layout, &method, &headers, &body)
        .await
        .map(Json)
}

/// Relay endpoint with the layout named in the path.
#[instrument(skip(state, headers, body))]
async fn handle_layout_relay(
    State(state): State<AppState>,
    Path(name): Path<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MessageResponse>, RelayError> {
    let layout = name
        .parse::<PayloadLayout>()
        .map_err(|_| RelayError::UnknownLayout { name })?;

    relay::relay_alert(&state, layout, &method, &headers, &body)
        .await
        .map(Json)
}

// ============================================================================
// Health Check Handlers
// ============================================================================

/// Basic health check endpoint
#[instrument(skip(state))]
async fn handle_health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let status = state.health_checker.check_basic_health().await;

    let response = HealthResponse {
        status: if status.is_healthy {
            "healthy".to_string()
        } else {
            "unhealthy".to_string()
        },
        timestamp: Utc::now(),
        checks: status.checks,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if status.is_healthy {
        Ok(Json(response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Readiness check for Kubernetes
#[instrument(skip(state))]
async fn handle_readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, StatusCode> {
    let is_ready = state.health_checker.check_readiness().await;

    let response = ReadinessResponse {
        ready: is_ready,
        timestamp: Utc::now(),
    };

    if is_ready {
        Ok(Json(response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Prometheus metrics endpoint
#[instrument(skip_all)]
async fn metrics_endpoint(State(state): State<AppState>) -> Result<String, StatusCode> {
    state.metrics.encode().map_err(|e| {
        error!(error = %e, "Failed to encode metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware with correlation IDs
///
/// Reuses the caller's `x-correlation-id` when present, generates one
/// otherwise, and echoes it on the response.
#[instrument(skip(request, next), fields(
    method = %request.method(),
    uri = %request.uri(),
    correlation_id
))]
async fn request_logging_middleware(
    mut request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let correlation_id = request
        .headers()
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::Span::current().record("correlation_id", correlation_id.as_str());
    request.extensions_mut().insert(correlation_id.clone());

    info!(
        correlation_id = %correlation_id,
        method = %method,
        uri = %uri,
        "Request started"
    );

    let mut response = next.run(request).await;
    let duration = start.elapsed();

    if let Ok(header_value) = correlation_id.parse() {
        response
            .headers_mut()
            .insert("x-correlation-id", header_value);
    }

    let status = response.status();

    if status.is_server_error() {
        error!(
            correlation_id = %correlation_id,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        warn!(
            correlation_id = %correlation_id,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        info!(
            correlation_id = %correlation_id,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed successfully"
        );
    }

    response
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

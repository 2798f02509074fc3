//! Health and readiness checks.

use crate::responses::HealthCheckResult;
use std::collections::HashMap;

/// Aggregate result of a health check run
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub checks: HashMap<String, HealthCheckResult>,
}

/// Interface for service health checks
#[async_trait::async_trait]
pub trait HealthChecker: Send + Sync {
    /// Basic health check (fast)
    async fn check_basic_health(&self) -> HealthStatus;

    /// Check if service is ready to accept requests
    async fn check_readiness(&self) -> bool;
}

/// Health checker for the relay.
///
/// The relay has no stateful dependencies: destinations are supplied per
/// request, so the only check is that the service itself responds.
pub struct DefaultHealthChecker;

#[async_trait::async_trait]
impl HealthChecker for DefaultHealthChecker {
    async fn check_basic_health(&self) -> HealthStatus {
        let start = std::time::Instant::now();
        let mut checks = HashMap::new();

        checks.insert(
            "service".to_string(),
            HealthCheckResult {
                healthy: true,
                message: "Service is running".to_string(),
                duration_ms: start.elapsed().as_millis() as u64,
            },
        );

        HealthStatus {
            is_healthy: true,
            checks,
        }
    }

    async fn check_readiness(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;

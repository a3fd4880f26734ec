// ABOUTME: Backend health monitoring for operational visibility
// ABOUTME: Reports service status with backend round-trip latency
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Health check utilities
//!
//! Produces a structured health report the embedding application can
//! expose on its own probe endpoint: overall status, service identity and
//! uptime, and a component check for the key-value backend with its
//! round-trip latency.

use crate::backend::{Backend, KeyValueBackend};
use crate::constants::service_names;
use serde::{Deserialize, Serialize};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::error;

/// Overall health status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: HealthStatus,
    /// Service information
    pub service: ServiceInfo,
    /// Individual component checks
    pub checks: Vec<ComponentHealth>,
    /// Response timestamp (epoch seconds)
    pub timestamp: u64,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

/// Service information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name
    pub name: String,
    /// Service version
    pub version: String,
    /// Service uptime in seconds
    pub uptime_seconds: u64,
}

/// Individual component health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Status description
    pub message: String,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Health checker for the configuration store
pub struct HealthChecker {
    /// Service start time
    start_time: Instant,
    /// Backend to probe
    backend: Backend,
}

impl HealthChecker {
    /// Create a new health checker over the given backend
    #[must_use]
    pub fn new(backend: Backend) -> Self {
        Self {
            start_time: Instant::now(),
            backend,
        }
    }

    /// Probe the backend and assemble a health report
    pub async fn check(&self) -> HealthResponse {
        let start = Instant::now();

        let service = ServiceInfo {
            name: service_names::CONFIG_STORE.into(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        };

        let backend_check = self.check_backend().await;
        let overall_status = backend_check.status.clone();

        HealthResponse {
            status: overall_status,
            service,
            checks: vec![backend_check],
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            response_time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Ping the backend, measuring round-trip latency
    async fn check_backend(&self) -> ComponentHealth {
        let start = Instant::now();
        let name = self.backend.backend_info().to_owned();

        match self.backend.ping().await {
            Ok(()) => ComponentHealth {
                name,
                status: HealthStatus::Healthy,
                message: "Backend is reachable".into(),
                duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            },
            Err(e) => {
                error!("Backend health check failed: {}", e);
                ComponentHealth {
                    name,
                    status: HealthStatus::Unhealthy,
                    message: format!("Backend unreachable: {e}"),
                    duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    #[tokio::test]
    async fn test_memory_backend_reports_healthy() {
        let checker = HealthChecker::new(Backend::Memory(MemoryBackend::new()));
        let report = checker.check().await;

        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.service.name, "confstore");
        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].status, HealthStatus::Healthy);
    }
}

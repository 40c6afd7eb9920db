//! Prometheus metrics infrastructure for the TrueNavi service.
//!
//! This module provides:
//! - [`MetricsConfig`]: Configuration for the metrics system
//! - [`init_metrics`]: Initialize the Prometheus metrics recorder
//! - [`metrics_handler`]: Axum handler for `/metrics` endpoint
//! - Business metric helpers for route queries and graph writes
//!
//! # Example
//!
//! ```no_run
//! use truenavi_service_shared::metrics::{MetricsConfig, init_metrics, metrics_handler};
//! use axum::{Router, routing::get};
//!
//! // Initialize metrics at startup
//! let config = MetricsConfig::default();
//! init_metrics(&config).expect("failed to initialize metrics");
//!
//! // Add metrics endpoint to router
//! let app: Router = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled.
    pub enabled: bool,
    /// Path for the metrics endpoint (e.g., "/metrics").
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: "true" or "false" (default: true)
    /// - `METRICS_PATH`: Path for metrics endpoint (default: "/metrics")
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("METRICS_ENABLED").ok().as_deref(),
            std::env::var("METRICS_PATH").ok(),
        )
    }

    fn from_vars(enabled: Option<&str>, path: Option<String>) -> Self {
        Self {
            enabled: enabled.map(|v| v.to_lowercase() != "false").unwrap_or(true),
            path: path.unwrap_or_else(|| "/metrics".to_string()),
        }
    }
}

/// Initialize the Prometheus metrics recorder.
///
/// This must be called once at application startup before any metrics are recorded.
/// Subsequent calls will return an error.
///
/// # Errors
///
/// Returns an error if:
/// - Metrics are disabled in configuration
/// - The recorder has already been installed
/// - The Prometheus builder fails to install
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// Axum handler for the `/metrics` endpoint.
///
/// Returns Prometheus exposition format text.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone)]
pub enum MetricsError {
    /// Metrics are disabled in configuration.
    Disabled,
    /// The recorder has already been installed.
    AlreadyInitialized,
    /// The Prometheus builder failed to install.
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Record a successful route query.
///
/// Increments the `truenavi_routes_calculated_total` counter.
pub fn record_route_calculated(service: &str) {
    metrics::counter!(
        "truenavi_routes_calculated_total",
        "service" => service.to_string()
    )
    .increment(1);
}

/// Record a route query that produced no route.
///
/// Increments the `truenavi_routes_failed_total` counter.
///
/// # Arguments
///
/// * `reason` - The failure reason (e.g., "no_path", "data_source", "validation_error")
/// * `service` - The service name (e.g., "route")
pub fn record_route_failed(reason: &str, service: &str) {
    metrics::counter!(
        "truenavi_routes_failed_total",
        "reason" => reason.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

/// Record the shape of a successful route.
///
/// Records to the `truenavi_route_hops` and `truenavi_route_distance_meters`
/// histograms.
pub fn record_route_hops(hops: usize, distance_meters: f64) {
    metrics::histogram!("truenavi_route_hops").record(hops as f64);
    metrics::histogram!("truenavi_route_distance_meters").record(distance_meters);
}

/// Record a committed node or edge write.
///
/// Increments the `truenavi_graph_writes_total` counter.
///
/// # Arguments
///
/// * `entity` - "node" or "edge"
/// * `operation` - "create", "update" or "delete"
pub fn record_graph_write(entity: &str, operation: &str) {
    metrics::counter!(
        "truenavi_graph_writes_total",
        "entity" => entity.to_string(),
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Record the number of nodes returned by a radius search.
///
/// Records to the `truenavi_radius_results` histogram.
pub fn record_radius_results(count: usize) {
    metrics::histogram!("truenavi_radius_results").record(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_metrics_config_from_vars() {
        let config = MetricsConfig::from_vars(None, None);
        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");

        let config = MetricsConfig::from_vars(Some("FALSE"), Some("/prom".to_string()));
        assert!(!config.enabled);
        assert_eq!(config.path, "/prom");
    }

    #[test]
    fn test_init_metrics_disabled() {
        let config = MetricsConfig {
            enabled: false,
            path: "/metrics".to_string(),
        };
        assert!(matches!(init_metrics(&config), Err(MetricsError::Disabled)));
    }

    #[test]
    fn test_metrics_handler_returns_prometheus_format() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let output = rt.block_on(async { metrics_handler().await });

        assert!(
            output.contains('#') || output.is_empty(),
            "Metrics output should be Prometheus format or indicate not initialized"
        );
    }

    // Without an installed recorder these only need to run without panicking.
    #[test]
    fn test_business_metric_helpers() {
        record_route_calculated("route");
        record_route_failed("no_path", "route");
        record_route_failed("data_source", "route");
        record_route_hops(3, 1200.0);
        record_graph_write("node", "create");
        record_graph_write("edge", "delete");
        record_radius_results(4);
    }

    #[test]
    fn test_metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert_eq!(
            MetricsError::AlreadyInitialized.to_string(),
            "metrics recorder already initialized"
        );

        let failed = MetricsError::InstallFailed("test error".to_string());
        assert!(failed.to_string().contains("test error"));
    }
}

//! Health check handlers for liveness and readiness probes.
//!
//! Provides `/health/live` and `/health/ready` endpoints that return JSON
//! status responses.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use truenavi_lib::StoreStats;

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Stored node count (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<usize>,

    /// Stored edge count (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<usize>,

    /// Current graph version (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_version: Option<u64>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            nodes: None,
            edges: None,
            graph_version: None,
        }
    }

    /// Create a ready status from the store counters.
    pub fn ready(service: &str, version: &str, stats: StoreStats) -> Self {
        Self {
            nodes: Some(stats.nodes),
            edges: Some(stats.edges),
            graph_version: Some(stats.version),
            ..Self::alive(service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            ..Self::alive(service, version)
        }
    }
}

/// Liveness probe handler.
///
/// Returns 200 OK if the process is serving requests. Does not touch the store.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"truenavi-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Returns 200 OK when the store answers a query, 503 otherwise. An empty
/// graph is still ready: nodes and edges are created through the API.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match state.store().stats() {
        Ok(stats) => {
            let status = HealthStatus::ready(service, version, stats);
            (StatusCode::OK, Json(status)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            let status = HealthStatus::not_ready(service, version, "store unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
    }
}

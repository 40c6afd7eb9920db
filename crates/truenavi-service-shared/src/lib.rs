//! Shared infrastructure for the TrueNavi HTTP service.
//!
//! This crate provides the HTTP glue around `truenavi-lib`:
//!
//! - [`AppState`]: The opened navigation store and route entry point
//! - [`health`]: Liveness and readiness probe handlers
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`ServiceResponse`]: `{success, count, data}` envelope for successful responses
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request tracking and metrics middleware
//! - Request types with validation for each endpoint
//!
//! # Architecture
//!
//! Handlers stay thin; all graph logic resides in `truenavi-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate parameters                                      │
//! │  - Call truenavi-lib APIs                                   │
//! │  - Format response                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module builds in-memory state for handler tests. Enable
//! the `test-utils` feature to access it from dependent crates.

mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_graph_write, record_radius_results,
    record_route_calculated, record_route_failed, record_route_hops, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_CONFLICT, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_REQUEST, PROBLEM_REFERENTIAL_INTEGRITY, PROBLEM_ROUTE_NOT_FOUND,
    PROBLEM_UNKNOWN_EDGE, PROBLEM_UNKNOWN_NODE,
};
pub use request::{
    CreateEdgeRequest, CreateNodeRequest, RadiusQuery, RouteRequest, UpdateEdgeRequest,
    UpdateNodeRequest, Validate,
};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError};

//! TrueNavi navigation HTTP service.
//!
//! Exposes node and edge management plus shortest-route queries over a
//! SQLite-backed graph.
//!
//! # Endpoints
//!
//! - `GET|POST /api/v1/nodes` - List or create nodes
//! - `GET|PUT|DELETE /api/v1/nodes/{id}` - Read, update, or delete a node
//! - `GET /api/v1/nodes/radius/{lat}/{lng}/{distance}` - Nodes within `distance` km
//! - `GET|POST /api/v1/edges` - List or create edges
//! - `GET|PUT|DELETE /api/v1/edges/{id}` - Read, update, or delete an edge
//! - `GET /api/v1/edges/node/{node_id}` - Edges touching a node
//! - `POST /api/v1/route` - Shortest route between two nodes
//! - `GET /api/v1/routes/{from}/{to}` - Same query as a path
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe

pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use truenavi_service_shared::{AppState, MetricsLayer, health_live, health_ready, metrics_handler};

use crate::handlers::*;

/// Build the service router over `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/v1/nodes", get(list_nodes).post(create_node))
        .route(
            "/api/v1/nodes/{id}",
            get(get_node).put(update_node).delete(delete_node),
        )
        .route(
            "/api/v1/nodes/radius/{lat}/{lng}/{distance}",
            get(nodes_in_radius),
        )
        .route("/api/v1/edges", get(list_edges).post(create_edge))
        .route(
            "/api/v1/edges/{id}",
            get(get_edge).put(update_edge).delete(delete_edge),
        )
        .route("/api/v1/edges/node/{node_id}", get(node_edges))
        .route("/api/v1/route", post(route_handler))
        .route("/api/v1/routes/{from}/{to}", get(route_by_path))
        .route("/metrics", get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(MetricsLayer)
        .with_state(state)
}

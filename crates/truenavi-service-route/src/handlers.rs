//! axum handlers for nodes, edges, and route queries.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::Serialize;
use tracing::{error, info};

use truenavi_lib::{Edge, GraphSource, Node, RouteResult};
use truenavi_service_shared::{
    AppState, CreateEdgeRequest, CreateNodeRequest, ProblemDetails, RadiusQuery, RequestId,
    RouteRequest, ServiceResponse, UpdateEdgeRequest, UpdateNodeRequest, Validate, from_lib_error,
    record_graph_write, record_radius_results, record_route_calculated, record_route_failed,
    record_route_hops,
};

/// Metric label for this service.
const SERVICE: &str = "route";

type HandlerResult<T> = Result<ServiceResponse<T>, ProblemDetails>;

/// Route response returned to the caller.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// Sum of edge distances in meters.
    pub total_distance: f64,
    /// Number of edges traversed.
    pub hops: usize,
    /// Nodes from start to goal inclusive.
    pub path: Vec<Node>,
    /// Edges joining consecutive path nodes.
    pub edges: Vec<Edge>,
}

fn body<T>(
    payload: Result<Json<T>, JsonRejection>,
    request_id: &RequestId,
) -> Result<T, ProblemDetails> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| {
            ProblemDetails::bad_request(rejection.body_text(), request_id.as_str())
        })
}

/// Run a store or router call on the blocking thread pool.
///
/// Store calls lock a mutex and can sit in SQLite's busy timeout while another
/// process holds the write lock.
async fn blocking<R, F>(
    state: &AppState,
    request_id: &RequestId,
    task: F,
) -> Result<R, ProblemDetails>
where
    F: FnOnce(&AppState) -> R + Send + 'static,
    R: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || task(&state))
        .await
        .map_err(|e| {
            error!(error = %e, "blocking store task did not complete");
            ProblemDetails::internal_error(
                "The request could not be completed",
                request_id.as_str(),
            )
        })
}

pub async fn root() -> &'static str {
    "TrueNavi API is running..."
}

// -----------------------------------------------------------------------------
// Nodes
// -----------------------------------------------------------------------------

/// GET /api/v1/nodes
pub async fn list_nodes(
    State(state): State<AppState>,
    request_id: RequestId,
) -> HandlerResult<Vec<Node>> {
    let nodes = blocking(&state, &request_id, |state| state.store().all_nodes())
        .await?
        .map_err(|e| from_lib_error(&e, request_id.as_str()))?;
    Ok(ServiceResponse::list(nodes))
}

/// GET /api/v1/nodes/{id}
pub async fn get_node(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> HandlerResult<Node> {
    let lookup = {
        let id = id.clone();
        blocking(&state, &request_id, move |state| state.store().node_by_id(&id)).await?
    };
    match lookup {
        Ok(Some(node)) => Ok(ServiceResponse::new(node)),
        Ok(None) => Err(ProblemDetails::unknown_node(&id, request_id.as_str())),
        Err(e) => Err(from_lib_error(&e, request_id.as_str())),
    }
}

/// POST /api/v1/nodes
pub async fn create_node(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<CreateNodeRequest>, JsonRejection>,
) -> HandlerResult<Node> {
    let new_node = body(payload, &request_id)?
        .into_new_node(request_id.as_str())
        .map_err(|problem| *problem)?;

    let node = blocking(&state, &request_id, move |state| {
        state.store().create_node(new_node)
    })
    .await?
    .map_err(|e| from_lib_error(&e, request_id.as_str()))?;
    record_graph_write("node", "create");
    Ok(ServiceResponse::created(node))
}

/// PUT /api/v1/nodes/{id}
pub async fn update_node(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<String>,
    payload: Result<Json<UpdateNodeRequest>, JsonRejection>,
) -> HandlerResult<Node> {
    let update = body(payload, &request_id)?
        .into_update(request_id.as_str())
        .map_err(|problem| *problem)?;

    let node = blocking(&state, &request_id, move |state| {
        state.store().update_node(&id, update)
    })
    .await?
    .map_err(|e| from_lib_error(&e, request_id.as_str()))?;
    record_graph_write("node", "update");
    Ok(ServiceResponse::new(node))
}

/// DELETE /api/v1/nodes/{id}
///
/// Edges attached to the node are kept; routing skips them.
pub async fn delete_node(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> HandlerResult<Node> {
    let node = blocking(&state, &request_id, move |state| state.store().delete_node(&id))
        .await?
        .map_err(|e| from_lib_error(&e, request_id.as_str()))?;
    record_graph_write("node", "delete");
    Ok(ServiceResponse::new(node))
}

/// GET /api/v1/nodes/radius/{lat}/{lng}/{distance}
///
/// `distance` is in kilometers. Results are ordered nearest first.
pub async fn nodes_in_radius(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((lat, lng, distance)): Path<(String, String, String)>,
) -> HandlerResult<Vec<Node>> {
    let query = RadiusQuery::parse(&lat, &lng, &distance, request_id.as_str())
        .map_err(|problem| *problem)?;

    let nodes = blocking(&state, &request_id, move |state| {
        state.store().nodes_within(query.center, query.radius_meters)
    })
    .await?
    .map_err(|e| from_lib_error(&e, request_id.as_str()))?;
    record_radius_results(nodes.len());
    Ok(ServiceResponse::list(nodes))
}

// -----------------------------------------------------------------------------
// Edges
// -----------------------------------------------------------------------------

/// GET /api/v1/edges
pub async fn list_edges(
    State(state): State<AppState>,
    request_id: RequestId,
) -> HandlerResult<Vec<Edge>> {
    let edges = blocking(&state, &request_id, |state| state.store().all_edges())
        .await?
        .map_err(|e| from_lib_error(&e, request_id.as_str()))?;
    Ok(ServiceResponse::list(edges))
}

/// GET /api/v1/edges/{id}
pub async fn get_edge(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> HandlerResult<Edge> {
    let lookup = {
        let id = id.clone();
        blocking(&state, &request_id, move |state| state.store().edge_by_id(&id)).await?
    };
    match lookup {
        Ok(Some(edge)) => Ok(ServiceResponse::new(edge)),
        Ok(None) => Err(ProblemDetails::unknown_edge(&id, request_id.as_str())),
        Err(e) => Err(from_lib_error(&e, request_id.as_str())),
    }
}

/// GET /api/v1/edges/node/{node_id}
pub async fn node_edges(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(node_id): Path<String>,
) -> HandlerResult<Vec<Edge>> {
    let edges = blocking(&state, &request_id, move |state| {
        state.store().edges_for_node(&node_id)
    })
    .await?
    .map_err(|e| from_lib_error(&e, request_id.as_str()))?;
    Ok(ServiceResponse::list(edges))
}

/// POST /api/v1/edges
pub async fn create_edge(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<CreateEdgeRequest>, JsonRejection>,
) -> HandlerResult<Edge> {
    let new_edge = body(payload, &request_id)?
        .into_new_edge(request_id.as_str())
        .map_err(|problem| *problem)?;

    let edge = blocking(&state, &request_id, move |state| {
        state.store().create_edge(new_edge)
    })
    .await?
    .map_err(|e| from_lib_error(&e, request_id.as_str()))?;
    record_graph_write("edge", "create");
    Ok(ServiceResponse::created(edge))
}

/// PUT /api/v1/edges/{id}
pub async fn update_edge(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEdgeRequest>, JsonRejection>,
) -> HandlerResult<Edge> {
    let update = body(payload, &request_id)?
        .into_update(request_id.as_str())
        .map_err(|problem| *problem)?;

    let edge = blocking(&state, &request_id, move |state| {
        state.store().update_edge(&id, update)
    })
    .await?
    .map_err(|e| from_lib_error(&e, request_id.as_str()))?;
    record_graph_write("edge", "update");
    Ok(ServiceResponse::new(edge))
}

/// DELETE /api/v1/edges/{id}
pub async fn delete_edge(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> HandlerResult<Edge> {
    let edge = blocking(&state, &request_id, move |state| state.store().delete_edge(&id))
        .await?
        .map_err(|e| from_lib_error(&e, request_id.as_str()))?;
    record_graph_write("edge", "delete");
    Ok(ServiceResponse::new(edge))
}

// -----------------------------------------------------------------------------
// Routes
// -----------------------------------------------------------------------------

/// POST /api/v1/route with `{"from": id, "to": id}`.
pub async fn route_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> HandlerResult<RouteResponse> {
    let request = body(payload, &request_id).inspect_err(|_| {
        record_route_failed("validation_error", SERVICE);
    })?;
    calculate_route(&state, &request_id, request).await
}

/// GET /api/v1/routes/{from}/{to}
pub async fn route_by_path(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((from, to)): Path<(String, String)>,
) -> HandlerResult<RouteResponse> {
    calculate_route(&state, &request_id, RouteRequest { from, to }).await
}

async fn calculate_route(
    state: &AppState,
    request_id: &RequestId,
    request: RouteRequest,
) -> HandlerResult<RouteResponse> {
    info!(from = %request.from, to = %request.to, "handling route request");

    if let Err(problem) = request.validate(request_id.as_str()) {
        record_route_failed("validation_error", SERVICE);
        return Err(*problem);
    }

    let result = blocking(state, request_id, move |state| {
        state.router().route(&request.from, &request.to)
    })
    .await
    .inspect_err(|_| record_route_failed("internal", SERVICE))?;

    match result {
        RouteResult::Found {
            total_distance,
            path,
            edges,
        } => {
            let hops = edges.len();
            record_route_calculated(SERVICE);
            record_route_hops(hops, total_distance);
            info!(hops, total_distance, "route computed successfully");

            Ok(ServiceResponse::new(RouteResponse {
                total_distance,
                hops,
                path,
                edges,
            }))
        }
        RouteResult::NotFound { reason } => {
            record_route_failed("no_path", SERVICE);
            Err(ProblemDetails::route_not_found(reason, request_id.as_str()))
        }
        RouteResult::Failed { reason } => {
            record_route_failed("data_source", SERVICE);
            error!(%reason, "route query failed");
            Err(ProblemDetails::internal_error(
                "The route could not be calculated",
                request_id.as_str(),
            ))
        }
    }
}

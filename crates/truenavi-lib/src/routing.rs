use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::graph::{build_graph, Graph};
use crate::model::{Edge, Node};
use crate::path::find_shortest_path;
use crate::store::{GraphSnapshot, GraphSource};

/// Reason reported when the goal cannot be reached from the start.
pub const NO_PATH_REASON: &str = "No path exists between these nodes";

/// Outcome of a route query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteResult {
    /// A shortest route was found.
    Found {
        /// Sum of edge distances in meters.
        total_distance: f64,
        /// Nodes from start to goal inclusive.
        path: Vec<Node>,
        /// Edge records joining consecutive path nodes.
        edges: Vec<Edge>,
    },
    /// The nodes are disconnected or at least one of them does not exist.
    NotFound { reason: String },
    /// The graph could not be loaded.
    Failed { reason: String },
}

impl RouteResult {
    pub fn is_found(&self) -> bool {
        matches!(self, RouteResult::Found { .. })
    }

    /// Total distance in meters for found routes.
    pub fn total_distance(&self) -> Option<f64> {
        match self {
            RouteResult::Found { total_distance, .. } => Some(*total_distance),
            _ => None,
        }
    }

    fn not_found() -> Self {
        RouteResult::NotFound {
            reason: NO_PATH_REASON.to_string(),
        }
    }

    fn failed(err: &Error) -> Self {
        error!(error = %err, "route query failed to load the graph");
        RouteResult::Failed {
            reason: err.to_string(),
        }
    }
}

/// Route from `start` to `goal` against a freshly loaded graph.
///
/// Never mutates the source. Load failures become [`RouteResult::Failed`].
pub fn route<S>(source: &S, start: &str, goal: &str) -> RouteResult
where
    S: GraphSource + ?Sized,
{
    match source.snapshot() {
        Ok(snapshot) => {
            let graph = build_graph(&snapshot.nodes, &snapshot.edges);
            resolve_route(&snapshot, &graph, start, goal)
        }
        Err(err) => RouteResult::failed(&err),
    }
}

fn resolve_route(snapshot: &GraphSnapshot, graph: &Graph, start: &str, goal: &str) -> RouteResult {
    let Some(shortest) = find_shortest_path(graph, start, goal) else {
        debug!(start, goal, "no path between nodes");
        return RouteResult::not_found();
    };

    let nodes_by_id: HashMap<&str, &Node> = snapshot
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect();
    let edges_by_id: HashMap<&str, &Edge> = snapshot
        .edges
        .iter()
        .map(|edge| (edge.id.as_str(), edge))
        .collect();

    let path: Vec<Node> = shortest
        .nodes
        .iter()
        .filter_map(|id| nodes_by_id.get(id.as_str()).map(|node| (*node).clone()))
        .collect();
    let edges: Vec<Edge> = shortest
        .edge_ids(graph)
        .iter()
        .filter_map(|id| edges_by_id.get(id.as_str()).map(|edge| (*edge).clone()))
        .collect();

    info!(
        start,
        goal,
        hops = shortest.hop_count(),
        distance = shortest.distance,
        "route found"
    );
    RouteResult::Found {
        total_distance: shortest.distance,
        path,
        edges,
    }
}

struct CachedGraph {
    snapshot: GraphSnapshot,
    graph: Graph,
}

/// Route query entry point bound to a graph source.
///
/// By default every query rebuilds the graph. [`Router::with_cache`] keeps the
/// last built graph and reuses it while the source's graph version is
/// unchanged.
pub struct Router<S> {
    source: S,
    cache: Option<Mutex<Option<Arc<CachedGraph>>>>,
}

impl<S: GraphSource> Router<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: None,
        }
    }

    pub fn with_cache(source: S) -> Self {
        Self {
            source,
            cache: Some(Mutex::new(None)),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }

    pub fn route(&self, start: &str, goal: &str) -> RouteResult {
        let Some(cache) = &self.cache else {
            return route(&self.source, start, goal);
        };

        match self.current_graph(cache) {
            Ok(cached) => resolve_route(&cached.snapshot, &cached.graph, start, goal),
            Err(err) => RouteResult::failed(&err),
        }
    }

    fn current_graph(&self, cache: &Mutex<Option<Arc<CachedGraph>>>) -> Result<Arc<CachedGraph>> {
        let version = self.source.graph_version()?;
        let mut slot = cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = slot.as_ref() {
            if cached.snapshot.version == version {
                debug!(version, "reusing cached graph");
                return Ok(Arc::clone(cached));
            }
        }

        let snapshot = self.source.snapshot()?;
        let graph = build_graph(&snapshot.nodes, &snapshot.edges);
        debug!(
            version = snapshot.version,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "rebuilt cached graph"
        );
        let cached = Arc::new(CachedGraph { snapshot, graph });
        *slot = Some(Arc::clone(&cached));
        Ok(cached)
    }
}

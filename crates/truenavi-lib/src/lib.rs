//! TrueNavi library entry points.
//!
//! This crate owns the navigation graph: haversine distance helpers, the edge
//! distance invariant, the SQLite record store, the per-query graph builder,
//! and the Dijkstra route engine. Higher-level consumers (CLI, HTTP service)
//! should only depend on the items exported here instead of reimplementing
//! behavior.
//!

pub mod db;
pub mod edge;
pub mod error;
pub mod geo;
pub mod graph;
pub mod model;
pub mod path;
pub mod routing;
pub mod store;

pub use db::{SqliteStore, StoreStats};
pub use edge::{maintain_edge_distance, resolve_and_maintain};
pub use error::{Error, Result};
pub use geo::{distance, path_distance, Coordinates, EARTH_RADIUS_METERS};
pub use graph::{build_graph, Graph};
pub use model::{Edge, EdgeId, EdgeUpdate, NewEdge, NewNode, Node, NodeId, NodeUpdate};
pub use path::{find_shortest_path, ShortestPath};
pub use routing::{route, RouteResult, Router, NO_PATH_REASON};
pub use store::{GraphSnapshot, GraphSource};

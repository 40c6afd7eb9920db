//! Records stored in the navigation graph.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinates;

/// Identifier of a stored node.
pub type NodeId = String;

/// Identifier of a stored edge.
pub type EdgeId = String;

/// A geographic waypoint; a vertex of the routing graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub coordinates: Coordinates,
    pub created_at: String,
}

/// An undirected connection between two nodes.
///
/// `geometry` and `distance` are derived by
/// [`maintain_edge_distance`](crate::edge::maintain_edge_distance) and are
/// never taken from clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub start: NodeId,
    pub end: NodeId,
    /// Intermediate points between `start` and `end`, in travel order.
    #[serde(default)]
    pub waypoints: Vec<Coordinates>,
    /// Full polyline: start position, waypoints, end position.
    #[serde(default)]
    pub geometry: Vec<Coordinates>,
    /// Length of `geometry` in meters.
    pub distance: f64,
    pub created_at: String,
}

impl Edge {
    /// Whether this edge joins `a` and `b`, in either direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.start == a && self.end == b) || (self.start == b && self.end == a)
    }

    /// Whether `node` is one of the two endpoints.
    pub fn touches(&self, node: &str) -> bool {
        self.start == node || self.end == node
    }
}

/// Fields accepted when inserting a node.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    pub name: Option<String>,
    pub coordinates: Coordinates,
}

/// Partial replacement of a node's fields; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub name: Option<String>,
    pub coordinates: Option<Coordinates>,
}

/// Fields accepted when inserting an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEdge {
    pub start: NodeId,
    pub end: NodeId,
    pub waypoints: Vec<Coordinates>,
}

/// Partial replacement of an edge's endpoints or waypoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeUpdate {
    pub start: Option<NodeId>,
    pub end: Option<NodeId>,
    pub waypoints: Option<Vec<Coordinates>>,
}

impl EdgeUpdate {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.waypoints.is_none()
    }
}

/// Generate a new time-sortable record identifier.
pub(crate) fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Trim a display name, treating blank input as absent.
pub(crate) fn normalize_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

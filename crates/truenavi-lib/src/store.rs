//! Read contract between the routing engine and the record store.

use crate::error::Result;
use crate::model::{Edge, Node};

/// Consistent view of every node and edge at one graph version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSnapshot {
    pub version: u64,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Source of the nodes and edges a route query runs against.
///
/// Implementations bump [`GraphSource::graph_version`] on every node or edge
/// write so cached graphs can be invalidated.
pub trait GraphSource: Send + Sync {
    /// Every stored node.
    fn all_nodes(&self) -> Result<Vec<Node>>;

    /// Every stored edge, including ones whose endpoints were deleted.
    fn all_edges(&self) -> Result<Vec<Edge>>;

    /// Look up a single node.
    fn node_by_id(&self, id: &str) -> Result<Option<Node>>;

    /// Monotonic counter of committed graph writes.
    fn graph_version(&self) -> Result<u64>;

    /// Load nodes and edges together.
    ///
    /// The default reads them one after the other; stores that can should
    /// override this to read inside a single transaction.
    fn snapshot(&self) -> Result<GraphSnapshot> {
        let version = self.graph_version()?;
        Ok(GraphSnapshot {
            version,
            nodes: self.all_nodes()?,
            edges: self.all_edges()?,
        })
    }
}

use std::collections::HashMap;

use tracing::warn;

use crate::model::{Edge, EdgeId, Node, NodeId};

/// Unordered pair of node identifiers, smaller id first.
type PairKey = (NodeId, NodeId);

fn pair_key(a: &str, b: &str) -> PairKey {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Per-query adjacency view of the stored nodes and edges.
///
/// Every node is present, isolated ones with an empty neighbour map. Each edge
/// contributes a weight in both directions.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: HashMap<NodeId, HashMap<NodeId, f64>>,
    edges_by_pair: HashMap<PairKey, EdgeId>,
    skipped_edges: usize,
}

impl Graph {
    /// Whether `node` was part of the loaded node set.
    pub fn contains(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Return the weighted neighbours of `node`.
    pub fn neighbours<'a>(&'a self, node: &str) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(id, weight)| (id.as_str(), *weight)))
    }

    /// Weight of the direct connection from `from` to `to`, if any.
    pub fn weight(&self, from: &str, to: &str) -> Option<f64> {
        self.adjacency.get(from)?.get(to).copied()
    }

    /// Identifier of the edge record joining `a` and `b` in either direction.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&EdgeId> {
        self.edges_by_pair.get(&pair_key(a, b))
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of distinct unordered connections.
    pub fn edge_count(&self) -> usize {
        self.edges_by_pair.len()
    }

    /// Edges ignored because an endpoint was not among the loaded nodes.
    pub fn skipped_edges(&self) -> usize {
        self.skipped_edges
    }
}

/// Build the routing graph from a full snapshot of nodes and edges.
///
/// Edges pointing at nodes that no longer exist are skipped rather than
/// treated as fatal, since node deletion does not cascade. When two records
/// share an unordered pair, the later one in `edges` wins.
pub fn build_graph(nodes: &[Node], edges: &[Edge]) -> Graph {
    let mut adjacency: HashMap<NodeId, HashMap<NodeId, f64>> = nodes
        .iter()
        .map(|node| (node.id.clone(), HashMap::new()))
        .collect();
    let mut edges_by_pair = HashMap::new();
    let mut skipped_edges = 0usize;

    for edge in edges {
        if !adjacency.contains_key(&edge.start) || !adjacency.contains_key(&edge.end) {
            skipped_edges += 1;
            continue;
        }

        if let Some(targets) = adjacency.get_mut(&edge.start) {
            targets.insert(edge.end.clone(), edge.distance);
        }
        if let Some(targets) = adjacency.get_mut(&edge.end) {
            targets.insert(edge.start.clone(), edge.distance);
        }
        edges_by_pair.insert(pair_key(&edge.start, &edge.end), edge.id.clone());
    }

    if skipped_edges > 0 {
        warn!(
            skipped_edges,
            "ignored edges referencing unknown nodes",
        );
    }

    Graph {
        adjacency,
        edges_by_pair,
        skipped_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;

    fn node(id: &str) -> Node {
        Node {
            id: id.to_string(),
            name: None,
            coordinates: Coordinates::new(0.0, 0.0),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn edge(id: &str, start: &str, end: &str, distance: f64) -> Edge {
        Edge {
            id: id.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            waypoints: Vec::new(),
            geometry: Vec::new(),
            distance,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn isolated_nodes_are_represented() {
        let graph = build_graph(&[node("a"), node("b")], &[]);
        assert_eq!(graph.node_count(), 2);
        assert!(graph.contains("a"));
        assert_eq!(graph.neighbours("a").count(), 0);
    }

    #[test]
    fn edges_are_inserted_in_both_directions() {
        let graph = build_graph(&[node("a"), node("b")], &[edge("ab", "a", "b", 42.0)]);
        assert_eq!(graph.weight("a", "b"), Some(42.0));
        assert_eq!(graph.weight("b", "a"), Some(42.0));
        assert_eq!(graph.edge_between("b", "a").map(String::as_str), Some("ab"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn duplicate_pairs_are_last_write_wins() {
        let graph = build_graph(
            &[node("a"), node("b")],
            &[edge("first", "a", "b", 10.0), edge("second", "b", "a", 7.0)],
        );
        assert_eq!(graph.weight("a", "b"), Some(7.0));
        assert_eq!(graph.weight("b", "a"), Some(7.0));
        assert_eq!(graph.edge_between("a", "b").map(String::as_str), Some("second"));
    }

    #[test]
    fn dangling_edges_are_skipped() {
        let graph = build_graph(
            &[node("a"), node("b")],
            &[edge("ab", "a", "b", 1.0), edge("ax", "a", "deleted", 2.0)],
        );
        assert_eq!(graph.skipped_edges(), 1);
        assert_eq!(graph.weight("a", "deleted"), None);
        assert!(!graph.contains("deleted"));
        assert_eq!(graph.neighbours("a").count(), 1);
    }

    #[test]
    fn neighbours_of_unknown_node_is_empty() {
        let graph = build_graph(&[node("a")], &[]);
        assert_eq!(graph.neighbours("zzz").count(), 0);
    }
}

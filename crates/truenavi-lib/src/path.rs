use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::graph::Graph;
use crate::model::{EdgeId, NodeId};

/// Lowest-cost route through the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    /// Sum of edge weights along `nodes`, in meters.
    pub distance: f64,
    /// Visited nodes from start to goal inclusive.
    pub nodes: Vec<NodeId>,
}

impl ShortestPath {
    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Edge records joining consecutive nodes, in travel order.
    ///
    /// Pairs without an indexed edge are skipped, which cannot happen for a
    /// path produced from the same graph.
    pub fn edge_ids(&self, graph: &Graph) -> Vec<EdgeId> {
        self.nodes
            .windows(2)
            .filter_map(|pair| graph.edge_between(&pair[0], &pair[1]).cloned())
            .collect()
    }
}

/// Run Dijkstra's algorithm from `start`, stopping once `goal` is settled.
///
/// Returns `None` when either identifier is absent from the graph or the goal
/// is unreachable. Weights must be non-negative; non-finite weights are
/// treated as impassable. When several shortest paths exist any one of them
/// may be returned.
pub fn find_shortest_path(graph: &Graph, start: &str, goal: &str) -> Option<ShortestPath> {
    if !graph.contains(start) || !graph.contains(goal) {
        return None;
    }
    if start == goal {
        return Some(ShortestPath {
            distance: 0.0,
            nodes: vec![start.to_string()],
        });
    }

    let mut distances: HashMap<&str, f64> = HashMap::new();
    let mut parents: HashMap<&str, Option<&str>> = HashMap::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0.0);
    parents.insert(start, None);
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        let current_distance = match distances.get(entry.node) {
            Some(distance) if entry.cost.0 > *distance => continue,
            Some(distance) => *distance,
            None => continue,
        };

        if entry.node == goal {
            return Some(ShortestPath {
                distance: current_distance,
                nodes: reconstruct_path(&parents, start, goal),
            });
        }

        for (next, weight) in graph.neighbours(entry.node) {
            if !weight.is_finite() {
                continue;
            }

            let next_cost = current_distance + weight;
            if next_cost < *distances.get(next).unwrap_or(&f64::INFINITY) {
                distances.insert(next, next_cost);
                parents.insert(next, Some(entry.node));
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    None
}

fn reconstruct_path<'a>(
    parents: &HashMap<&'a str, Option<&'a str>>,
    start: &str,
    goal: &'a str,
) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node.to_string());
        if node == start {
            break;
        }
        current = parents.get(node).copied().flatten();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry<'a> {
    node: &'a str,
    cost: FloatOrd,
}

impl<'a> QueueEntry<'a> {
    fn new(node: &'a str, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(self.node))
    }
}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

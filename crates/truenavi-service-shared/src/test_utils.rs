//! Test utilities for handler testing.
//!
//! Every call builds a fresh in-memory store, so tests may write freely without
//! affecting each other.

use std::sync::atomic::{AtomicU64, Ordering};

use truenavi_lib::{Coordinates, NewEdge, NewNode, Node, SqliteStore};

use crate::state::AppState;

/// Nodes seeded by [`seeded_state`].
#[derive(Debug, Clone)]
pub struct FixtureGraph {
    /// Node "A" at (0, 0).
    pub a: Node,
    /// Node "B" at (0, 1), joined to A and C.
    pub b: Node,
    /// Node "C" at (0, 2).
    pub c: Node,
    /// Node "Island" at (10, 10) with no edges.
    pub island: Node,
}

/// Empty application state backed by an in-memory store.
///
/// # Panics
///
/// Panics if SQLite cannot open an in-memory database.
pub fn test_state() -> AppState {
    let store = SqliteStore::open_in_memory()
        .unwrap_or_else(|e| panic!("failed to open in-memory store: {}", e));
    AppState::from_store(store, false)
}

/// Application state holding the line A - B - C plus an unconnected node.
pub fn seeded_state(cache_routes: bool) -> (AppState, FixtureGraph) {
    let store = SqliteStore::open_in_memory()
        .unwrap_or_else(|e| panic!("failed to open in-memory store: {}", e));

    let node = |name: &str, latitude: f64, longitude: f64| {
        store
            .create_node(NewNode {
                name: Some(name.to_string()),
                coordinates: Coordinates::new(latitude, longitude),
            })
            .unwrap_or_else(|e| panic!("failed to seed node {}: {}", name, e))
    };
    let fixture = FixtureGraph {
        a: node("A", 0.0, 0.0),
        b: node("B", 0.0, 1.0),
        c: node("C", 0.0, 2.0),
        island: node("Island", 10.0, 10.0),
    };

    for (start, end) in [(&fixture.a, &fixture.b), (&fixture.b, &fixture.c)] {
        store
            .create_edge(NewEdge {
                start: start.id.clone(),
                end: end.id.clone(),
                waypoints: Vec::new(),
            })
            .unwrap_or_else(|e| panic!("failed to seed edge: {}", e));
    }

    (AppState::from_store(store, cache_routes), fixture)
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!("test-{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

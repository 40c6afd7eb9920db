#![allow(dead_code)]

use truenavi_lib::{Coordinates, Edge, NewEdge, NewNode, Node, SqliteStore};

pub fn store() -> SqliteStore {
    SqliteStore::open_in_memory().expect("in-memory store opens")
}

pub fn add_node(store: &SqliteStore, name: &str, latitude: f64, longitude: f64) -> Node {
    store
        .create_node(NewNode {
            name: Some(name.to_string()),
            coordinates: Coordinates::new(latitude, longitude),
        })
        .expect("node is created")
}

pub fn connect(store: &SqliteStore, a: &Node, b: &Node) -> Edge {
    connect_via(store, a, b, Vec::new())
}

pub fn connect_via(store: &SqliteStore, a: &Node, b: &Node, waypoints: Vec<Coordinates>) -> Edge {
    store
        .create_edge(NewEdge {
            start: a.id.clone(),
            end: b.id.clone(),
            waypoints,
        })
        .expect("edge is created")
}

/// Nodes A(0,0), B(0,1), C(0,2) joined A-B and B-C.
pub fn line(store: &SqliteStore) -> (Node, Node, Node) {
    let a = add_node(store, "A", 0.0, 0.0);
    let b = add_node(store, "B", 0.0, 1.0);
    let c = add_node(store, "C", 0.0, 2.0);
    connect(store, &a, &b);
    connect(store, &b, &c);
    (a, b, c)
}

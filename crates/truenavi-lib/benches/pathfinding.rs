use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;
use truenavi_lib::{
    build_graph, find_shortest_path, route, Coordinates, Edge, GraphSnapshot, GraphSource,
    NewEdge, NewNode, Node, Router, SqliteStore,
};

const GRID: usize = 24;

/// Square lattice of nodes a tenth of a degree apart, joined to their right and
/// lower neighbours.
fn grid_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().expect("in-memory store");
    let mut ids = Vec::with_capacity(GRID * GRID);
    for row in 0..GRID {
        for col in 0..GRID {
            let node = store
                .create_node(NewNode {
                    name: Some(format!("{row}:{col}")),
                    coordinates: Coordinates::new(row as f64 * 0.1, col as f64 * 0.1),
                })
                .expect("node created");
            ids.push(node.id);
        }
    }

    for row in 0..GRID {
        for col in 0..GRID {
            let here = &ids[row * GRID + col];
            let link = |other: &String| {
                store
                    .create_edge(NewEdge {
                        start: here.clone(),
                        end: other.clone(),
                        waypoints: Vec::new(),
                    })
                    .expect("edge created");
            };
            if col + 1 < GRID {
                link(&ids[row * GRID + col + 1]);
            }
            if row + 1 < GRID {
                link(&ids[(row + 1) * GRID + col]);
            }
        }
    }
    store
}

static STORE: Lazy<SqliteStore> = Lazy::new(grid_store);
static SNAPSHOT: Lazy<GraphSnapshot> = Lazy::new(|| STORE.snapshot().expect("snapshot loads"));

fn corners(nodes: &[Node]) -> (String, String) {
    let first = nodes.first().expect("grid has nodes");
    let last = nodes.last().expect("grid has nodes");
    (first.id.clone(), last.id.clone())
}

fn benchmark_pathfinding(c: &mut Criterion) {
    let snapshot = &*SNAPSHOT;
    let (start, goal) = corners(&snapshot.nodes);

    c.bench_function("build_graph_grid", |b| {
        b.iter(|| {
            let graph = build_graph(&snapshot.nodes, black_box(&snapshot.edges));
            black_box(graph.edge_count())
        });
    });

    let graph = build_graph(&snapshot.nodes, &snapshot.edges);
    c.bench_function("dijkstra_grid_corners", |b| {
        b.iter(|| {
            let path = find_shortest_path(&graph, &start, &goal).expect("route exists");
            black_box(path.distance)
        });
    });

    c.bench_function("route_uncached_grid_corners", |b| {
        b.iter(|| black_box(route(&*STORE, &start, &goal)));
    });

    let cached = Router::with_cache(grid_store());
    let (cached_start, cached_goal) = corners(&cached.source().all_nodes().expect("nodes load"));
    c.bench_function("route_cached_grid_corners", |b| {
        b.iter(|| black_box(cached.route(&cached_start, &cached_goal)));
    });
}

fn edge_total(edges: &[Edge]) -> f64 {
    edges.iter().map(|edge| edge.distance).sum()
}

fn benchmark_snapshot(c: &mut Criterion) {
    c.bench_function("load_snapshot_grid", |b| {
        b.iter(|| {
            let snapshot = STORE.snapshot().expect("snapshot loads");
            black_box(edge_total(&snapshot.edges))
        });
    });
}

criterion_group!(benches, benchmark_pathfinding, benchmark_snapshot);
criterion_main!(benches);

use truenavi_lib::{build_graph, find_shortest_path, Coordinates, Edge, Node};

/// Small deterministic generator so failures can be replayed by seed.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

fn node(id: usize) -> Node {
    Node {
        id: format!("n{id}"),
        name: None,
        coordinates: Coordinates::new(0.0, 0.0),
        created_at: String::new(),
    }
}

fn random_graph(rng: &mut Lcg, size: usize) -> (Vec<Node>, Vec<Edge>, Vec<Vec<Option<f64>>>) {
    let nodes: Vec<Node> = (0..size).map(node).collect();
    let mut weights = vec![vec![None; size]; size];
    let mut edges = Vec::new();

    for a in 0..size {
        for b in (a + 1)..size {
            if rng.below(100) < 40 {
                let weight = rng.below(1_000) as f64;
                weights[a][b] = Some(weight);
                weights[b][a] = Some(weight);
                edges.push(Edge {
                    id: format!("e{a}-{b}"),
                    start: nodes[a].id.clone(),
                    end: nodes[b].id.clone(),
                    waypoints: Vec::new(),
                    geometry: Vec::new(),
                    distance: weight,
                    created_at: String::new(),
                });
            }
        }
    }

    (nodes, edges, weights)
}

/// Minimum over every simple path, by exhaustive depth-first enumeration.
fn brute_force(
    weights: &[Vec<Option<f64>>],
    current: usize,
    goal: usize,
    visited: &mut [bool],
) -> Option<f64> {
    if current == goal {
        return Some(0.0);
    }
    visited[current] = true;
    let mut best: Option<f64> = None;
    for (next, weight) in weights[current].iter().enumerate() {
        let Some(weight) = weight else { continue };
        if visited[next] {
            continue;
        }
        if let Some(rest) = brute_force(weights, next, goal, visited) {
            let total = weight + rest;
            best = Some(best.map_or(total, |b: f64| b.min(total)));
        }
    }
    visited[current] = false;
    best
}

#[test]
fn dijkstra_matches_exhaustive_search_on_small_graphs() {
    let mut rng = Lcg(0x5eed);

    for round in 0..200 {
        let size = 2 + rng.below(7) as usize;
        let (nodes, edges, weights) = random_graph(&mut rng, size);
        let graph = build_graph(&nodes, &edges);

        for start in 0..size {
            for goal in 0..size {
                let expected = brute_force(&weights, start, goal, &mut vec![false; size]);
                let found = find_shortest_path(&graph, &nodes[start].id, &nodes[goal].id);

                match (expected, found) {
                    (None, None) => {}
                    (Some(expected), Some(path)) => {
                        assert_eq!(path.distance, expected, "round {round}: {start} -> {goal}");
                        assert_eq!(path.nodes.first(), Some(&nodes[start].id));
                        assert_eq!(path.nodes.last(), Some(&nodes[goal].id));

                        let walked: f64 = path
                            .nodes
                            .windows(2)
                            .map(|pair| graph.weight(&pair[0], &pair[1]).unwrap())
                            .sum();
                        assert_eq!(walked, path.distance, "round {round}: path weights");
                        assert_eq!(path.edge_ids(&graph).len(), path.hop_count());
                    }
                    (expected, found) => {
                        panic!("round {round}: {start} -> {goal}: expected {expected:?}, got {found:?}")
                    }
                }
            }
        }
    }
}

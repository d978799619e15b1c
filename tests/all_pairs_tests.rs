use floyd_apsp::matrix::generators::{generate_grid, generate_random, generate_random_integer};
use floyd_apsp::{
    AllPairsShortestPath, DistanceMatrix, DuplicateEdgePolicy, Edge, FloydWarshall, ParallelFloydWarshall, Weight,
};

// Test helper function to build a float matrix from edge triples
fn build(n: usize, edges: &[(usize, usize, f64)]) -> DistanceMatrix<f64> {
    DistanceMatrix::from_edges(n, edges.iter().copied(), DuplicateEdgePolicy::KeepLast).unwrap()
}

// Single-source Bellman-Ford, used as an independent reference
fn bellman_ford(n: usize, edges: &[Edge<f64>], source: usize) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; n];
    dist[source] = 0.0;
    for _ in 0..n {
        for e in edges {
            if dist[e.source] + e.weight < dist[e.destination] {
                dist[e.destination] = dist[e.source] + e.weight;
            }
        }
    }
    dist
}

fn assert_close(actual: f64, expected: f64) {
    if expected.is_infinite() {
        assert_eq!(actual, expected);
    } else {
        assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
    }
}

#[test]
fn test_empty_edge_set() {
    for n in [0, 1, 2, 5, 17] {
        let mut m: DistanceMatrix<f64> = DistanceMatrix::new(n);
        FloydWarshall::new().compute(&mut m).unwrap();
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 0.0 } else { f64::INFINITY };
                assert_eq!(m.get(i, j), expected);
            }
        }
    }
}

#[test]
fn test_path_through_intermediate() {
    let mut m = build(3, &[(0, 1, 1.0), (1, 2, 2.0), (0, 2, 10.0)]);
    FloydWarshall::new().compute(&mut m).unwrap();

    assert_eq!(m.get(0, 2), 3.0);
    assert_eq!(m.get(1, 0), f64::INFINITY);
    for i in 0..3 {
        assert_eq!(m.get(i, i), 0.0);
    }
}

#[test]
fn test_two_way_edge() {
    let mut m = build(2, &[(0, 1, 5.0), (1, 0, 5.0)]);
    FloydWarshall::new().compute(&mut m).unwrap();
    assert_eq!(m.as_slice(), &[0.0, 5.0, 5.0, 0.0]);
}

#[test]
fn test_disconnected_graph() {
    let mut m = build(3, &[(0, 1, 1.0)]);
    ParallelFloydWarshall::new().compute(&mut m).unwrap();
    assert_eq!(m.get(0, 1), 1.0);
    assert_eq!(m.get(0, 2), f64::INFINITY);
    assert_eq!(m.get(2, 0), f64::INFINITY);
}

#[test]
fn test_idempotent() {
    let edges = generate_random_integer(40, 0.15, 20, 3);
    let mut once = DistanceMatrix::from_edges(40, edges, DuplicateEdgePolicy::KeepLast).unwrap();
    FloydWarshall::new().compute(&mut once).unwrap();

    let mut twice = once.clone();
    let summary = FloydWarshall::new().compute(&mut twice).unwrap();
    assert_eq!(twice, once);
    assert_eq!(summary.relaxations, 0);
}

#[test]
fn test_triangle_inequality() {
    let n = 30;
    let edges = generate_random_integer(n, 0.2, 50, 11);
    let mut m = DistanceMatrix::from_edges(n, edges, DuplicateEdgePolicy::KeepLast).unwrap();
    FloydWarshall::new().compute(&mut m).unwrap();

    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                assert!(m.get(i, j) <= m.get(i, k).path_add(m.get(k, j)), "({}, {}) via {}", i, j, k);
            }
        }
    }
}

#[test]
fn test_matches_bellman_ford_with_negative_weights() {
    let n = 25;
    // Forward edges are slightly negative and every backward edge outweighs a
    // whole forward chain, so no cycle can be negative
    let edges: Vec<Edge<f64>> = generate_random(n, 0.25, 1.0, 30.0, 5)
        .into_iter()
        .filter(|e| e.source < e.destination || e.weight > 10.0)
        .map(|e| if e.source < e.destination { Edge::new(e.source, e.destination, -e.weight / 100.0) } else { e })
        .collect();

    let mut m = DistanceMatrix::from_edges(n, edges.iter().copied(), DuplicateEdgePolicy::KeepLast).unwrap();
    let summary = FloydWarshall::new().compute(&mut m).unwrap();

    for source in 0..n {
        let reference = bellman_ford(n, &edges, source);
        for target in 0..n {
            assert_close(m.get(source, target), reference[target]);
        }
    }
    assert!(!summary.has_negative_cycle());
}

#[test]
fn test_grid_distances() {
    let (w, h) = (6, 4);
    let mut m = DistanceMatrix::from_edges(w * h, generate_grid(w, h), DuplicateEdgePolicy::KeepLast).unwrap();
    ParallelFloydWarshall::new().with_num_threads(3).compute(&mut m).unwrap();

    for a in 0..w * h {
        for b in 0..w * h {
            let manhattan = (a % w).abs_diff(b % w) + (a / w).abs_diff(b / w);
            assert_eq!(m.get(a, b), manhattan as f64);
        }
    }
}

#[test]
fn test_integer_weights_never_wrap() {
    let edges: Vec<(usize, usize, i32)> = vec![(0, 1, i32::MAX - 10), (1, 2, i32::MAX - 10), (2, 3, 1)];
    let mut m = DistanceMatrix::from_edges(4, edges, DuplicateEdgePolicy::KeepLast).unwrap();
    FloydWarshall::new().compute(&mut m).unwrap();

    assert_eq!(m.get(0, 1), i32::MAX - 10);
    // The true length overflows i32 and is reported as unreachable
    assert_eq!(m.get(0, 2), i32::MAX);
    assert_eq!(m.get(1, 3), i32::MAX - 9);
    assert_eq!(m.get(3, 0), i32::MAX);
}

#[test]
fn test_negative_cycle_terminates_and_is_reported() {
    let edges: Vec<(usize, usize, i64)> = vec![(0, 1, 2), (1, 2, -5), (2, 1, 1), (2, 3, 1)];
    let mut m = DistanceMatrix::from_edges(4, edges, DuplicateEdgePolicy::KeepLast).unwrap();
    let summary = FloydWarshall::new().compute(&mut m).unwrap();

    assert_eq!(summary.rounds, 4);
    assert_eq!(summary.negative_cycle_vertices, vec![1, 2]);
    assert_eq!(m.get(0, 0), 0);
    assert_eq!(m.get(3, 3), 0);
}

#[test]
fn test_negative_self_loop() {
    let edges: Vec<(usize, usize, f64)> = vec![(0, 0, -1.0), (0, 1, 1.0)];
    let mut m = DistanceMatrix::from_edges(2, edges, DuplicateEdgePolicy::KeepLast).unwrap();
    let summary = ParallelFloydWarshall::new().compute(&mut m).unwrap();
    assert_eq!(summary.negative_cycle_vertices, vec![0]);
}

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::matrix::dense::Edge;

/// Generates a random directed graph where each ordered pair `(i, j)`, `i != j`,
/// is connected with probability `density`
///
/// Weights are drawn uniformly from `min_weight..max_weight`, so negative
/// weights are possible when `min_weight < 0`. The same seed always yields the
/// same edge list.
pub fn generate_random(n: usize, density: f64, min_weight: f64, max_weight: f64, seed: u64) -> Vec<Edge<f64>> {
    assert!((0.0..=1.0).contains(&density), "density must be within [0, 1]");
    assert!(min_weight < max_weight, "weight range must not be empty");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();

    for i in 0..n {
        for j in 0..n {
            if i != j && rng.gen_bool(density) {
                edges.push(Edge::new(i, j, rng.gen_range(min_weight..max_weight)));
            }
        }
    }

    edges
}

/// Same as [`generate_random`] with integer weights in `1..=max_weight`
pub fn generate_random_integer(n: usize, density: f64, max_weight: i64, seed: u64) -> Vec<Edge<i64>> {
    assert!((0.0..=1.0).contains(&density), "density must be within [0, 1]");
    assert!(max_weight > 0, "max_weight must be positive");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();

    for i in 0..n {
        for j in 0..n {
            if i != j && rng.gen_bool(density) {
                edges.push(Edge::new(i, j, rng.gen_range(1..=max_weight)));
            }
        }
    }

    edges
}

/// Generates a directed `width` x `height` grid with unit weights in all four directions
pub fn generate_grid(width: usize, height: usize) -> Vec<Edge<f64>> {
    let mut edges = Vec::new();

    // Helper function to get vertex index from 2D coordinates
    let index = |x: usize, y: usize| -> usize { y * width + x };

    for y in 0..height {
        for x in 0..width {
            let current = index(x, y);
            if x > 0 {
                edges.push(Edge::new(current, index(x - 1, y), 1.0));
            }
            if x + 1 < width {
                edges.push(Edge::new(current, index(x + 1, y), 1.0));
            }
            if y > 0 {
                edges.push(Edge::new(current, index(x, y - 1), 1.0));
            }
            if y + 1 < height {
                edges.push(Edge::new(current, index(x, y + 1), 1.0));
            }
        }
    }

    edges
}

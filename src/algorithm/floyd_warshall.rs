use crate::algorithm::AllPairsShortestPath;
use crate::matrix::{DistanceMatrix, SuccessorMatrix, Weight};
use crate::Result;

/// Classic sequential Floyd-Warshall, updating the matrix in place
///
/// Round `k` allows vertex `k` as an intermediate. Row `k` is never written
/// during round `k`, so it serves as the bridge row without a second buffer.
///
/// Each row reads `row[k]` once per round. Without negative cycles this is
/// the textbook recurrence. With a negative cycle the distances are no longer
/// meaningful and may differ from those of a literal triple loop, but they
/// match [`ParallelFloydWarshall`] exactly.
///
/// [`ParallelFloydWarshall`]: crate::algorithm::parallel::ParallelFloydWarshall
#[derive(Debug, Default, Clone, Copy)]
pub struct FloydWarshall;

impl FloydWarshall {
    /// Creates a new sequential engine
    pub fn new() -> Self {
        FloydWarshall
    }
}

impl<W: Weight> AllPairsShortestPath<W> for FloydWarshall {
    fn name(&self) -> &'static str {
        "FloydWarshall"
    }

    fn relax_all(&self, matrix: &mut DistanceMatrix<W>, mut successors: Option<&mut SuccessorMatrix>) -> Result<usize> {
        let n = matrix.dimension();
        let cells = matrix.as_mut_slice();
        let mut improved = 0;

        for k in 0..n {
            let before = improved;
            for i in (0..n).filter(|&i| i != k) {
                let (row, pivot) = row_and_pivot(cells, n, i, k);
                let next_row = successors
                    .as_deref_mut()
                    .map(|next| &mut next.as_mut_slice()[i * n..(i + 1) * n]);
                improved += relax_row(row, pivot, k, next_row);
            }
            log::trace!("round {}: {} cells improved", k, improved - before);
        }

        Ok(improved)
    }
}

/// Relaxes row `i` through vertex `k` given the bridge row `pivot` (row `k`)
///
/// Returns the number of cells that improved. `row[k]` is read once before
/// the sweep, and the candidate is only stored when it is strictly smaller,
/// so a NaN candidate can never enter the matrix.
#[inline]
pub(crate) fn relax_row<W: Weight>(row: &mut [W], pivot: &[W], k: usize, next_row: Option<&mut [usize]>) -> usize {
    let via = row[k];
    if via.is_infinite() {
        return 0;
    }

    let mut improved = 0;
    match next_row {
        None => {
            for (cell, &bridge) in row.iter_mut().zip(pivot) {
                let candidate = via.path_add(bridge);
                if candidate < *cell {
                    *cell = candidate;
                    improved += 1;
                }
            }
        }
        Some(next_row) => {
            let hop = next_row[k];
            for ((cell, &bridge), next) in row.iter_mut().zip(pivot).zip(next_row.iter_mut()) {
                let candidate = via.path_add(bridge);
                if candidate < *cell {
                    *cell = candidate;
                    *next = hop;
                    improved += 1;
                }
            }
        }
    }
    improved
}

/// Splits the buffer into a mutable row `i` and a shared row `k` (`i != k`)
fn row_and_pivot<W>(cells: &mut [W], n: usize, i: usize, k: usize) -> (&mut [W], &[W]) {
    debug_assert_ne!(i, k);
    if i < k {
        let (low, high) = cells.split_at_mut(k * n);
        (&mut low[i * n..(i + 1) * n], &high[..n])
    } else {
        let (low, high) = cells.split_at_mut(i * n);
        (&mut high[..n], &low[k * n..(k + 1) * n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DuplicateEdgePolicy;

    fn build(n: usize, edges: &[(usize, usize, f64)]) -> DistanceMatrix<f64> {
        DistanceMatrix::from_edges(n, edges.iter().copied(), DuplicateEdgePolicy::KeepLast).unwrap()
    }

    #[test]
    fn relax_row_skips_unreachable_bridge() {
        let mut row = vec![0.0, f64::INFINITY, 4.0];
        let pivot = vec![1.0, 0.0, 1.0];
        assert_eq!(relax_row(&mut row, &pivot, 1, None), 0);
        assert_eq!(row, vec![0.0, f64::INFINITY, 4.0]);
    }

    #[test]
    fn relax_row_tracks_hops() {
        let mut row = vec![0.0, 1.0, 9.0];
        let pivot = vec![f64::INFINITY, 0.0, 2.0];
        let mut next = vec![0, 1, 2];
        assert_eq!(relax_row(&mut row, &pivot, 1, Some(&mut next)), 1);
        assert_eq!(row, vec![0.0, 1.0, 3.0]);
        assert_eq!(next, vec![0, 1, 1]);
    }

    #[test]
    fn shortcut_through_middle_vertex() {
        let mut m = build(3, &[(0, 1, 1.0), (1, 2, 2.0), (0, 2, 10.0)]);
        let summary = FloydWarshall::new().compute(&mut m).unwrap();

        assert_eq!(m.get(0, 2), 3.0);
        assert_eq!(m.get(1, 0), f64::INFINITY);
        for i in 0..3 {
            assert_eq!(m.get(i, i), 0.0);
        }
        assert_eq!(summary.rounds, 3);
        assert_eq!(summary.relaxations, 1);
        assert!(!summary.has_negative_cycle());
    }

    #[test]
    fn zero_vertices_is_a_no_op() {
        let mut m: DistanceMatrix<f64> = DistanceMatrix::new(0);
        let summary = FloydWarshall::new().compute(&mut m).unwrap();
        assert_eq!(summary.rounds, 0);
        assert_eq!(summary.relaxations, 0);
    }

    #[test]
    fn reports_negative_cycle() {
        let mut m = build(3, &[(0, 1, 1.0), (1, 2, -3.0), (2, 0, 1.0)]);
        let summary = FloydWarshall::new().compute(&mut m).unwrap();
        assert!(summary.has_negative_cycle());
        assert_eq!(summary.negative_cycle_vertices, vec![0, 1, 2]);
    }
}

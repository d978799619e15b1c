use crate::matrix::dense::DistanceMatrix;
use crate::matrix::traits::Weight;
use crate::{Error, Result};

/// Marks "no successor" inside the packed table
const NO_SUCCESSOR: usize = usize::MAX;

/// Next-hop table filled in alongside the distances
///
/// `next(i, j)` is the vertex that follows `i` on a shortest path from `i`
/// to `j`, or `None` when `j` is unreachable from `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessorMatrix {
    dimension: usize,
    cells: Vec<usize>,
}

impl SuccessorMatrix {
    /// Seeds the table from a matrix that has not been relaxed yet
    ///
    /// Every finite off-diagonal cell is taken to be a direct edge, which only
    /// holds before any engine has run. A relaxed matrix is refused with
    /// [`Error::AlreadyRelaxed`].
    pub fn from_initial<W: Weight>(matrix: &DistanceMatrix<W>) -> Result<Self> {
        if matrix.is_relaxed() {
            return Err(Error::AlreadyRelaxed);
        }
        let dimension = matrix.dimension();
        let mut cells = vec![NO_SUCCESSOR; dimension * dimension];
        for (i, row) in matrix.rows().enumerate() {
            for (j, weight) in row.iter().enumerate() {
                if i == j {
                    cells[i * dimension + j] = i;
                } else if !weight.is_infinite() {
                    cells[i * dimension + j] = j;
                }
            }
        }
        Ok(SuccessorMatrix { dimension, cells })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn next(&self, i: usize, j: usize) -> Option<usize> {
        match self.cells[i * self.dimension + j] {
            NO_SUCCESSOR => None,
            v => Some(v),
        }
    }

    /// Vertices of a shortest path from `source` to `target`, both included
    ///
    /// Returns `None` when the target is unreachable, or when the walk does
    /// not reach the target within `dimension` hops, which happens once a
    /// negative cycle has corrupted the table.
    pub fn path(&self, source: usize, target: usize) -> Option<Vec<usize>> {
        if source >= self.dimension || target >= self.dimension {
            return None;
        }
        if source == target {
            return Some(vec![source]);
        }

        let mut path = vec![source];
        let mut current = source;
        while current != target {
            current = self.next(current, target)?;
            path.push(current);
            if path.len() > self.dimension {
                log::warn!("Path {} -> {} does not terminate, likely a negative cycle", source, target);
                return None;
            }
        }
        Some(path)
    }

    /// Row-major buffer, `usize::MAX` marks a missing successor
    pub(crate) fn as_mut_slice(&mut self) -> &mut [usize] {
        &mut self.cells
    }
}

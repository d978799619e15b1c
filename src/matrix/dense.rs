use std::fmt;

use serde::{Deserialize, Serialize};

use crate::matrix::traits::Weight;
use crate::{Error, Result};

/// A directed, weighted edge as handed over by a graph loader
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge<W> {
    pub source: usize,
    pub destination: usize,
    pub weight: W,
}

impl<W> Edge<W> {
    pub fn new(source: usize, destination: usize, weight: W) -> Self {
        Edge { source, destination, weight }
    }
}

impl<W> From<(usize, usize, W)> for Edge<W> {
    fn from((source, destination, weight): (usize, usize, W)) -> Self {
        Edge { source, destination, weight }
    }
}

/// What to do when the input lists the same ordered vertex pair more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateEdgePolicy {
    /// The edge applied last wins
    #[default]
    KeepLast,
    /// The edge applied first wins
    KeepFirst,
    /// The lightest edge wins
    KeepMin,
}

/// Dense V x V distance matrix stored in one row-major buffer
///
/// `get(i, j)` is the best known distance from `i` to `j`. A fresh matrix
/// has zero on the diagonal and the weight type's infinity everywhere else.
///
/// A matrix remembers whether an engine has already run over it. Once it
/// has, its cells are path lengths rather than edges, and it can no longer
/// seed a [`SuccessorMatrix`](crate::matrix::SuccessorMatrix).
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix<W>", bound(deserialize = "W: Deserialize<'de> + Copy"))]
pub struct DistanceMatrix<W> {
    /// Number of vertices
    dimension: usize,

    /// `cells[i * dimension + j]` holds the distance from i to j
    cells: Vec<W>,

    /// Set once an engine has run over the cells
    #[serde(skip)]
    relaxed: bool,
}

impl<W: Weight> DistanceMatrix<W> {
    /// Creates a matrix for `dimension` vertices and no edges
    pub fn new(dimension: usize) -> Self {
        let mut cells = vec![W::infinity(); dimension * dimension];
        for i in 0..dimension {
            cells[i * dimension + i] = W::zero();
        }
        DistanceMatrix { dimension, cells, relaxed: false }
    }

    /// Builds a matrix from a vertex count and an edge set
    ///
    /// A self-loop overrides the zero on the diagonal. Duplicate edges are
    /// resolved with `policy`.
    pub fn from_edges<I, E>(dimension: usize, edges: I, policy: DuplicateEdgePolicy) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Edge<W>>,
    {
        let mut matrix = Self::new(dimension);
        let mut seen = vec![false; dimension * dimension];

        for edge in edges {
            let Edge { source, destination, weight } = edge.into();
            for vertex in [source, destination] {
                if vertex >= dimension {
                    return Err(Error::InvalidVertex { vertex, dimension });
                }
            }

            let idx = source * dimension + destination;
            let apply = match policy {
                DuplicateEdgePolicy::KeepLast => true,
                DuplicateEdgePolicy::KeepFirst => !seen[idx],
                DuplicateEdgePolicy::KeepMin => !seen[idx] || weight < matrix.cells[idx],
            };
            if apply {
                matrix.cells[idx] = weight;
            }
            seen[idx] = true;
        }

        Ok(matrix)
    }

    /// Vertices whose distance to themselves went below zero
    ///
    /// After a run, these are exactly the vertices lying on a negative cycle.
    pub fn negative_cycle_vertices(&self) -> Vec<usize> {
        (0..self.dimension)
            .filter(|&i| self.get(i, i).is_negative())
            .collect()
    }
}

impl<W: Copy> DistanceMatrix<W> {
    /// Adopts an existing row-major buffer of `dimension * dimension` cells
    pub fn from_row_major(dimension: usize, cells: Vec<W>) -> Result<Self> {
        let expected = dimension * dimension;
        if cells.len() != expected {
            return Err(Error::DimensionMismatch { expected, actual: cells.len() });
        }
        Ok(DistanceMatrix { dimension, cells, relaxed: false })
    }

    /// Number of vertices
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> W {
        self.cells[i * self.dimension + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: W) {
        self.cells[i * self.dimension + j] = value;
    }

    /// Row `i` as a slice
    pub fn row(&self, i: usize) -> &[W] {
        &self.cells[i * self.dimension..(i + 1) * self.dimension]
    }

    /// Iterator over all rows
    pub fn rows(&self) -> std::slice::Chunks<'_, W> {
        self.cells.chunks(self.dimension.max(1))
    }

    pub fn as_slice(&self) -> &[W] {
        &self.cells
    }

    /// Mutable access to the whole row-major buffer
    ///
    /// The buffer can be rewritten but never resized.
    pub fn as_mut_slice(&mut self) -> &mut [W] {
        &mut self.cells
    }

    /// Returns true once an engine has run over this matrix
    pub fn is_relaxed(&self) -> bool {
        self.relaxed
    }

    pub(crate) fn mark_relaxed(&mut self) {
        self.relaxed = true;
    }

    /// Consumes the matrix and returns its row-major buffer
    pub fn into_inner(self) -> Vec<W> {
        self.cells
    }
}

/// Wire form checked on the way in
#[derive(Deserialize)]
struct RawMatrix<W> {
    dimension: usize,
    cells: Vec<W>,
}

impl<W: Copy> TryFrom<RawMatrix<W>> for DistanceMatrix<W> {
    type Error = Error;

    fn try_from(raw: RawMatrix<W>) -> Result<Self> {
        DistanceMatrix::from_row_major(raw.dimension, raw.cells)
    }
}

// Two matrices are equal when they hold the same distances, however they got there
impl<W: PartialEq> PartialEq for DistanceMatrix<W> {
    fn eq(&self, other: &Self) -> bool {
        self.dimension == other.dimension && self.cells == other.cells
    }
}

impl<W: fmt::Debug + Copy> fmt::Debug for DistanceMatrix<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistanceMatrix")
            .field("dimension", &self.dimension)
            .field("rows", &self.rows().collect::<Vec<_>>())
            .field("relaxed", &self.relaxed)
            .finish()
    }
}

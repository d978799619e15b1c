use std::time::{Duration, Instant};

use crate::matrix::{DistanceMatrix, SuccessorMatrix, Weight};
use crate::Result;

/// Outcome of one engine run over a distance matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of vertices in the matrix
    pub dimension: usize,

    /// Number of completed rounds, always equal to `dimension`
    pub rounds: usize,

    /// Number of cells whose distance went down
    pub relaxations: usize,

    /// Vertices with a negative distance to themselves after the run
    pub negative_cycle_vertices: Vec<usize>,

    /// Wall-clock time spent relaxing
    pub elapsed: Duration,
}

impl RunSummary {
    /// Returns true if the graph contains a negative cycle
    ///
    /// Distances touching such a cycle are not meaningful shortest paths.
    pub fn has_negative_cycle(&self) -> bool {
        !self.negative_cycle_vertices.is_empty()
    }
}

/// Trait for all-pairs shortest path engines working in place on a matrix
pub trait AllPairsShortestPath<W: Weight> {
    /// Get the name of the engine
    fn name(&self) -> &'static str;

    /// Runs every round over the matrix, optionally keeping next hops
    ///
    /// Returns the number of improved cells. Implementations must leave the
    /// dimension of both tables unchanged.
    fn relax_all(&self, matrix: &mut DistanceMatrix<W>, successors: Option<&mut SuccessorMatrix>) -> Result<usize>;

    /// Replace every distance with the shortest path length
    ///
    /// Negative cycles do not make this fail. Check
    /// [`RunSummary::negative_cycle_vertices`] before trusting the result on
    /// graphs with negative weights.
    fn compute(&self, matrix: &mut DistanceMatrix<W>) -> Result<RunSummary> {
        let start = Instant::now();
        let relaxations = self.relax_all(matrix, None)?;
        matrix.mark_relaxed();
        Ok(summarize(self.name(), matrix, relaxations, start.elapsed()))
    }

    /// Same as [`compute`](Self::compute), also returning a next-hop table
    ///
    /// The next hops are seeded from the matrix itself, so it must still hold
    /// the edge weights. A matrix that has already been through an engine is
    /// refused with [`Error::AlreadyRelaxed`](crate::Error::AlreadyRelaxed);
    /// use [`paths_from`](Self::paths_from) to rerun from the edges instead.
    fn compute_with_paths(&self, matrix: &mut DistanceMatrix<W>) -> Result<(RunSummary, SuccessorMatrix)> {
        let mut successors = SuccessorMatrix::from_initial(matrix)?;
        let start = Instant::now();
        let relaxations = self.relax_all(matrix, Some(&mut successors))?;
        matrix.mark_relaxed();
        let summary = summarize(self.name(), matrix, relaxations, start.elapsed());
        Ok((summary, successors))
    }

    /// Distances and next hops for `graph`, leaving the edge matrix untouched
    ///
    /// Can be called any number of times on the same graph.
    fn paths_from(&self, graph: &DistanceMatrix<W>) -> Result<(DistanceMatrix<W>, RunSummary, SuccessorMatrix)> {
        let mut matrix = graph.clone();
        let (summary, successors) = self.compute_with_paths(&mut matrix)?;
        Ok((matrix, summary, successors))
    }
}

fn summarize<W: Weight>(name: &str, matrix: &DistanceMatrix<W>, relaxations: usize, elapsed: Duration) -> RunSummary {
    let negative_cycle_vertices = matrix.negative_cycle_vertices();
    if !negative_cycle_vertices.is_empty() {
        log::warn!(
            "{}: {} vertices lie on a negative cycle, distances through them are unbounded",
            name,
            negative_cycle_vertices.len()
        );
    }

    log::info!(
        "{}: {} vertices, {} relaxations in {:?}",
        name,
        matrix.dimension(),
        relaxations,
        elapsed
    );

    RunSummary {
        dimension: matrix.dimension(),
        rounds: matrix.dimension(),
        relaxations,
        negative_cycle_vertices,
        elapsed,
    }
}

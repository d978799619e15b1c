use serde::{Deserialize, Serialize};

use crate::algorithm::floyd_warshall::FloydWarshall;
use crate::algorithm::parallel::{BarrierStrategy, ParallelFloydWarshall};
use crate::algorithm::AllPairsShortestPath;
use crate::matrix::{DistanceMatrix, DuplicateEdgePolicy, Edge, SuccessorMatrix, Weight};
use crate::Result;

/// Which engine family to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Sequential,
    #[default]
    Parallel,
}

/// Engine settings, loadable from JSON
///
/// Every field is optional in the JSON form:
///
/// ```
/// use floyd_apsp::{BarrierStrategy, EngineConfig, EngineKind};
///
/// let config = EngineConfig::from_json(r#"{ "strategy": "persistent", "num_threads": 4 }"#).unwrap();
/// assert_eq!(config.kind, EngineKind::Parallel);
/// assert_eq!(config.strategy, BarrierStrategy::Persistent);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub kind: EngineKind,
    pub strategy: BarrierStrategy,
    /// 0 uses every available core
    pub num_threads: usize,
    pub min_rows_per_task: usize,
    /// Applied when building a matrix through [`EngineConfig::load`]
    pub duplicate_edges: DuplicateEdgePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::Parallel,
            strategy: BarrierStrategy::ForkJoin,
            num_threads: 0,
            min_rows_per_task: 1,
            duplicate_edges: DuplicateEdgePolicy::KeepLast,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a matrix from an edge set using the configured duplicate policy
    pub fn load<W, I, E>(&self, dimension: usize, edges: I) -> Result<DistanceMatrix<W>>
    where
        W: Weight,
        I: IntoIterator<Item = E>,
        E: Into<Edge<W>>,
    {
        DistanceMatrix::from_edges(dimension, edges, self.duplicate_edges)
    }

    /// Instantiate the configured engine
    pub fn build(&self) -> Engine {
        match self.kind {
            EngineKind::Sequential => Engine::Sequential(FloydWarshall::new()),
            EngineKind::Parallel => Engine::Parallel(
                ParallelFloydWarshall::new()
                    .with_strategy(self.strategy)
                    .with_num_threads(self.num_threads)
                    .with_min_rows_per_task(self.min_rows_per_task),
            ),
        }
    }
}

/// An engine picked at runtime from an [`EngineConfig`]
#[derive(Debug, Clone)]
pub enum Engine {
    Sequential(FloydWarshall),
    Parallel(ParallelFloydWarshall),
}

impl<W: Weight> AllPairsShortestPath<W> for Engine {
    fn name(&self) -> &'static str {
        match self {
            Engine::Sequential(engine) => AllPairsShortestPath::<W>::name(engine),
            Engine::Parallel(engine) => AllPairsShortestPath::<W>::name(engine),
        }
    }

    fn relax_all(&self, matrix: &mut DistanceMatrix<W>, successors: Option<&mut SuccessorMatrix>) -> Result<usize> {
        log::debug!("{}: relaxing {} vertices", AllPairsShortestPath::<W>::name(self), matrix.dimension());
        match self {
            Engine::Sequential(engine) => engine.relax_all(matrix, successors),
            Engine::Parallel(engine) => engine.relax_all(matrix, successors),
        }
    }
}

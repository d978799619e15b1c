//! Floyd APSP - All-Pairs Shortest Paths on dense matrices
//!
//! This library implements the Floyd-Warshall algorithm over a contiguous
//! row-major distance matrix, in a sequential form and in a parallel form
//! that splits every round across worker threads by row.
//!
//! Both engines update the matrix in place and produce identical results.
//! Negative edge weights are accepted. Negative cycles are not rejected: the
//! run still finishes after exactly V rounds and the affected vertices are
//! reported in the [`RunSummary`].

pub mod algorithm;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod matrix;

pub use algorithm::{
    config::{Engine, EngineConfig, EngineKind},
    floyd_warshall::FloydWarshall,
    parallel::{BarrierStrategy, ParallelFloydWarshall},
    AllPairsShortestPath, RunSummary,
};
/// Re-export main types for convenient use
pub use matrix::{DistanceMatrix, DuplicateEdgePolicy, Edge, SuccessorMatrix, Weight};

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid vertex ID {vertex} for a graph of {dimension} vertices")]
    InvalidVertex { vertex: usize, dimension: usize },

    #[error("Expected {expected} matrix cells, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Could not build worker pool: {0}")]
    ThreadPool(String),

    #[error("Matrix already holds shortest distances, next hops must be seeded from the edge matrix")]
    AlreadyRelaxed,

    #[error("A worker thread panicked")]
    WorkerPanicked,

    #[error("Invalid engine configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, Error>;

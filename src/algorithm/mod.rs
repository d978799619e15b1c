pub mod traits;
mod barrier;
pub mod floyd_warshall;
pub mod parallel;
pub mod config;

pub use traits::{AllPairsShortestPath, RunSummary};

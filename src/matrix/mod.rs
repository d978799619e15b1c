pub mod traits;
pub mod dense;
pub mod successor;
pub mod generators;

pub use traits::Weight;
pub use dense::{DistanceMatrix, DuplicateEdgePolicy, Edge};
pub use successor::SuccessorMatrix;

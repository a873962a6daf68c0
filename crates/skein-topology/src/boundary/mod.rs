mod bounding;
pub mod graph;
mod iter;
mod query;
pub mod types;
mod validate;

pub use graph::BoundaryLoop;
pub use iter::CycleIter;
pub use query::{CONTAINMENT_LINES, CONTAINMENT_STEP};
pub use types::*;

//! Skein topology: boundary loops assembled from curve fragments, with
//! containment and edge-splitting queries.

pub mod boundary;

pub use boundary::{BoundaryLoop, CycleIter, FragmentId, Joint, Milestone};

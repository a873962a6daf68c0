//! Skein geometry: bounded curves, line intersection, closest-point search
//! and polyline approximation.

pub mod curve;
pub mod search;
pub mod tessellate;
pub mod trim;
pub mod usage;

pub use curve::{
    CircularArc, ClosestPoint, CubicCurve, Curve, CurvePrimitive, IntersectionPoint, LineSegment,
    QuadraticCurve,
};
pub use trim::TrimRange;
pub use usage::Usage;

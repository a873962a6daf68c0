//! Curve traits and implementations.

mod arc;
mod cubic;
mod polynomial;
mod primitive;
mod quadratic;
mod segment;

use serde::{Deserialize, Serialize};
use skein_core::{ensure_positive, Relation, Result, SkeinError};
use skein_math::{Aabb3, Line, Plane, Point3, PointExt, Transform, Vector3};

use crate::tessellate;
use crate::trim::TrimRange;
use crate::usage::Usage;

pub use arc::CircularArc;
pub use cubic::CubicCurve;
pub use primitive::CurvePrimitive;
pub use quadratic::QuadraticCurve;
pub use segment::LineSegment;

/// A point where a probing line crosses a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionPoint {
    pub point: Point3,
    /// Parameter of the hit on the curve.
    pub param: f64,
}

/// Result of a closest-point search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosestPoint {
    pub point: Point3,
    pub param: f64,
    pub distance: f64,
}

/// Capability set shared by every bounded curve.
///
/// Parameters live in `[0, 1]`; the trim range selects the usable part.
/// Values are immutable: trimming, reversing and transforming return new curves.
pub trait Curve: Send + Sync {
    fn usage(&self) -> &Usage;

    fn trim_range(&self) -> TrimRange;

    /// Evaluate the untrimmed curve at `t`.
    fn evaluate(&self, t: f64) -> Point3;

    /// First derivative of the untrimmed curve at `t`.
    fn derivative(&self, t: f64) -> Vector3;

    /// Evaluate at `t`, which must lie inside the trim range.
    fn point_at(&self, t: f64) -> Result<Point3> {
        self.trim_range().check(t)?;
        Ok(self.evaluate(t))
    }

    /// Unit tangent at `t`, which must lie inside the trim range.
    fn tangent_at(&self, t: f64) -> Result<Vector3> {
        self.trim_range().check(t)?;
        self.derivative(t).try_normalize().ok_or_else(|| {
            SkeinError::InvalidOperation(format!("curve has no tangent at t={t}"))
        })
    }

    /// Point at the lower trim bound.
    fn one_end(&self) -> Point3 {
        self.evaluate(self.trim_range().lower())
    }

    /// Point at the upper trim bound.
    fn other_end(&self) -> Point3 {
        self.evaluate(self.trim_range().upper())
    }

    fn is_closed(&self) -> bool {
        self.one_end().coincident(self.other_end())
    }

    /// Length of the trimmed curve.
    fn length(&self) -> f64;

    fn bounding_box(&self) -> Aabb3;

    /// Containing plane, when the curve defines one.
    fn plane(&self) -> Option<Plane>;

    /// Polyline whose chords stay within `tolerance` of the curve.
    fn approximate(&self, tolerance: f64) -> Result<Vec<Point3>> {
        tessellate::approximate(self, tolerance)
    }

    /// Crossings with an unbounded line, sorted by curve parameter.
    fn intersect(&self, line: &Line, accuracy: f64) -> Result<Vec<IntersectionPoint>>;

    /// Nearest point of the trimmed curve, or `None` when the target is far away.
    fn closest_point(&self, target: Point3) -> Result<Option<ClosestPoint>>;

    /// Parameter of `point` when it lies on the curve within `accuracy`.
    fn is_coincident(&self, point: Point3, accuracy: f64) -> Result<Option<f64>> {
        ensure_positive("accuracy", accuracy)?;
        Ok(self
            .closest_point(point)?
            .filter(|hit| hit.distance <= accuracy)
            .map(|hit| hit.param))
    }

    /// Same geometry traversed the other way.
    fn reversed(&self) -> Self
    where
        Self: Sized;

    fn transformed(&self, transform: &Transform) -> Result<Self>
    where
        Self: Sized;

    fn trimmed(&self, range: TrimRange) -> Self
    where
        Self: Sized;

    /// Drop everything before `t`.
    fn trim_front(&self, t: f64) -> Result<Self>
    where
        Self: Sized,
    {
        Ok(self.trimmed(self.trim_range().with_lower(t)?))
    }

    /// Drop everything after `t`.
    fn trim_back(&self, t: f64) -> Result<Self>
    where
        Self: Sized,
    {
        Ok(self.trimmed(self.trim_range().with_upper(t)?))
    }

    fn with_usage(&self, usage: Usage) -> Self
    where
        Self: Sized;
}

/// Planar curves only intersect lines lying in their plane.
fn require_coplanar(plane: &Plane, line: &Line) -> Result<()> {
    if plane.contains_line(line) {
        Ok(())
    } else {
        Err(SkeinError::relationship(
            Relation::NonCoplanar,
            "probing line leaves the curve plane",
        ))
    }
}

/// Accept `t` within `slack` of the trim range, clamped onto it.
fn clamp_to_trim(range: TrimRange, t: f64, slack: f64) -> Option<f64> {
    if t < range.lower() - slack || t > range.upper() + slack {
        None
    } else {
        Some(t.clamp(range.lower(), range.upper()))
    }
}

//! Closed set of curve kinds.

use serde::{Deserialize, Serialize};
use skein_core::Result;
use skein_math::{Aabb3, Line, Plane, Point3, Transform, Vector3};

use super::{
    CircularArc, ClosestPoint, CubicCurve, Curve, IntersectionPoint, LineSegment, QuadraticCurve,
};
use crate::trim::TrimRange;
use crate::usage::Usage;

/// Any curve that can take part in a boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurvePrimitive {
    Line(LineSegment),
    Arc(CircularArc),
    Quadratic(QuadraticCurve),
    Cubic(CubicCurve),
}

macro_rules! dispatch {
    ($self:expr, $curve:ident => $body:expr) => {
        match $self {
            CurvePrimitive::Line($curve) => $body,
            CurvePrimitive::Arc($curve) => $body,
            CurvePrimitive::Quadratic($curve) => $body,
            CurvePrimitive::Cubic($curve) => $body,
        }
    };
}

macro_rules! rewrap {
    ($self:expr, $curve:ident => $body:expr) => {
        match $self {
            CurvePrimitive::Line($curve) => CurvePrimitive::Line($body),
            CurvePrimitive::Arc($curve) => CurvePrimitive::Arc($body),
            CurvePrimitive::Quadratic($curve) => CurvePrimitive::Quadratic($body),
            CurvePrimitive::Cubic($curve) => CurvePrimitive::Cubic($body),
        }
    };
}

impl CurvePrimitive {
    pub fn kind(&self) -> &'static str {
        match self {
            CurvePrimitive::Line(_) => "line",
            CurvePrimitive::Arc(_) => "arc",
            CurvePrimitive::Quadratic(_) => "quadratic",
            CurvePrimitive::Cubic(_) => "cubic",
        }
    }
}

impl Curve for CurvePrimitive {
    fn usage(&self) -> &Usage {
        dispatch!(self, c => c.usage())
    }

    fn trim_range(&self) -> TrimRange {
        dispatch!(self, c => c.trim_range())
    }

    fn evaluate(&self, t: f64) -> Point3 {
        dispatch!(self, c => c.evaluate(t))
    }

    fn derivative(&self, t: f64) -> Vector3 {
        dispatch!(self, c => c.derivative(t))
    }

    fn length(&self) -> f64 {
        dispatch!(self, c => c.length())
    }

    fn bounding_box(&self) -> Aabb3 {
        dispatch!(self, c => c.bounding_box())
    }

    fn plane(&self) -> Option<Plane> {
        dispatch!(self, c => c.plane())
    }

    fn approximate(&self, tolerance: f64) -> Result<Vec<Point3>> {
        dispatch!(self, c => c.approximate(tolerance))
    }

    fn intersect(&self, line: &Line, accuracy: f64) -> Result<Vec<IntersectionPoint>> {
        dispatch!(self, c => c.intersect(line, accuracy))
    }

    fn closest_point(&self, target: Point3) -> Result<Option<ClosestPoint>> {
        dispatch!(self, c => c.closest_point(target))
    }

    fn reversed(&self) -> Self {
        rewrap!(self, c => c.reversed())
    }

    fn transformed(&self, transform: &Transform) -> Result<Self> {
        Ok(rewrap!(self, c => c.transformed(transform)?))
    }

    fn trimmed(&self, range: TrimRange) -> Self {
        rewrap!(self, c => c.trimmed(range))
    }

    fn with_usage(&self, usage: Usage) -> Self {
        rewrap!(self, c => c.with_usage(usage))
    }
}

impl From<LineSegment> for CurvePrimitive {
    fn from(curve: LineSegment) -> Self {
        CurvePrimitive::Line(curve)
    }
}

impl From<CircularArc> for CurvePrimitive {
    fn from(curve: CircularArc) -> Self {
        CurvePrimitive::Arc(curve)
    }
}

impl From<QuadraticCurve> for CurvePrimitive {
    fn from(curve: QuadraticCurve) -> Self {
        CurvePrimitive::Quadratic(curve)
    }
}

impl From<CubicCurve> for CurvePrimitive {
    fn from(curve: CubicCurve) -> Self {
        CurvePrimitive::Cubic(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_math::{dvec3, PointExt};
    use std::f64::consts::FRAC_PI_2;

    fn samples() -> Vec<CurvePrimitive> {
        vec![
            LineSegment::new(Point3::ZERO, dvec3(2.0, 0.0, 0.0)).unwrap().into(),
            CircularArc::new(Point3::ZERO, Vector3::Z, dvec3(1.0, 0.0, 0.0), FRAC_PI_2)
                .unwrap()
                .into(),
            QuadraticCurve::bezier(Point3::ZERO, dvec3(1.0, 1.0, 0.0), dvec3(2.0, 0.0, 0.0))
                .unwrap()
                .into(),
            CubicCurve::bezier(
                Point3::ZERO,
                dvec3(1.0, 1.0, 0.0),
                dvec3(2.0, 1.0, 0.0),
                dvec3(3.0, 0.0, 0.0),
            )
            .unwrap()
            .into(),
        ]
    }

    #[test]
    fn test_dispatch_matches_inner_curve() {
        let kinds: Vec<_> = samples().iter().map(CurvePrimitive::kind).collect();
        assert_eq!(kinds, ["line", "arc", "quadratic", "cubic"]);

        for curve in samples() {
            let rev = curve.reversed();
            assert_eq!(rev.kind(), curve.kind());
            assert!(rev.one_end().coincident(curve.other_end()));
            assert!(curve.point_at(0.5).is_ok());
            assert!(curve.tangent_at(0.5).is_ok());
        }
    }

    #[test]
    fn test_usage_and_trim_pass_through() {
        for curve in samples() {
            let tagged = curve
                .with_usage(Usage::Selected)
                .trimmed(TrimRange::new(0.25, 0.75).unwrap());
            assert_eq!(tagged.usage(), &Usage::Selected);
            assert_eq!(tagged.trim_range(), TrimRange::new(0.25, 0.75).unwrap());
            assert!(tagged.length() < curve.length());
        }
    }

    #[test]
    fn test_transform_preserves_kind() {
        let lift = Transform::from_translation(dvec3(0.0, 0.0, 5.0));
        for curve in samples() {
            let moved = curve.transformed(&lift).unwrap();
            assert_eq!(moved.kind(), curve.kind());
            assert!((moved.one_end().z - 5.0).abs() < 1e-12);
        }
    }
}

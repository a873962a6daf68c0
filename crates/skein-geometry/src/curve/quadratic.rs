//! Quadratic polynomial curve.

use serde::{Deserialize, Serialize};
use skein_core::{ensure_positive, Result, SkeinError};
use skein_math::point::{all_unique, are_collinear};
use skein_math::{Aabb3, Line, Plane, Point3, Transform, Vector3};

use super::{polynomial, require_coplanar, ClosestPoint, Curve, IntersectionPoint};
use crate::search;
use crate::trim::TrimRange;
use crate::usage::Usage;

/// A parabolic arc `p(t) = c0 + c1 t + c2 t^2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadraticCurve {
    coeffs: [Vector3; 3],
    trim: TrimRange,
    usage: Usage,
}

impl QuadraticCurve {
    /// Bezier form with a single control point.
    pub fn bezier(start: Point3, control: Point3, end: Point3) -> Result<Self> {
        Self::from_coefficients([
            start,
            2.0 * (control - start),
            start - 2.0 * control + end,
        ])
    }

    /// Curve passing through `middle` at `t = 0.5`.
    pub fn through_points(start: Point3, middle: Point3, end: Point3) -> Result<Self> {
        check_points(start, middle, end)?;
        Self::bezier(start, 2.0 * middle - 0.5 * (start + end), end)
    }

    fn from_coefficients(coeffs: [Vector3; 3]) -> Result<Self> {
        let [start, control, end] = control_points(&coeffs);
        check_points(start, control, end)?;
        Ok(Self {
            coeffs,
            trim: TrimRange::FULL,
            usage: Usage::default(),
        })
    }

    /// Bezier control points of the untrimmed curve.
    pub fn control_points(&self) -> [Point3; 3] {
        control_points(&self.coeffs)
    }

    /// Coefficients in ascending power.
    pub fn coefficients(&self) -> &[Vector3; 3] {
        &self.coeffs
    }
}

fn control_points(c: &[Vector3; 3]) -> [Point3; 3] {
    [c[0], c[0] + 0.5 * c[1], c[0] + c[1] + c[2]]
}

fn check_points(a: Point3, b: Point3, c: Point3) -> Result<()> {
    if !all_unique(&[a, b, c]) {
        return Err(SkeinError::Construction(
            "quadratic curve points must be unique".into(),
        ));
    }
    if are_collinear(a, b, c) {
        return Err(SkeinError::Construction(
            "quadratic curve points are collinear".into(),
        ));
    }
    Ok(())
}

impl Curve for QuadraticCurve {
    fn usage(&self) -> &Usage {
        &self.usage
    }

    fn trim_range(&self) -> TrimRange {
        self.trim
    }

    fn evaluate(&self, t: f64) -> Point3 {
        polynomial::evaluate(&self.coeffs, t)
    }

    fn derivative(&self, t: f64) -> Vector3 {
        polynomial::derivative(&self.coeffs, t)
    }

    fn length(&self) -> f64 {
        polynomial::arc_length(&self.coeffs, self.trim)
    }

    fn bounding_box(&self) -> Aabb3 {
        polynomial::bounding_box(&self.coeffs, self.trim)
    }

    fn plane(&self) -> Option<Plane> {
        polynomial::plane(&self.coeffs)
    }

    fn intersect(&self, line: &Line, accuracy: f64) -> Result<Vec<IntersectionPoint>> {
        ensure_positive("accuracy", accuracy)?;
        if let Some(plane) = self.plane() {
            require_coplanar(&plane, line)?;
        }
        search::bracket_crossings(|t| self.evaluate(t), self.trim, line, accuracy)
    }

    fn closest_point(&self, target: Point3) -> Result<Option<ClosestPoint>> {
        search::refine_closest(|t| self.evaluate(t), self.trim, target, self.length())
    }

    fn reversed(&self) -> Self {
        let mut coeffs = self.coeffs;
        polynomial::reverse(&mut coeffs);
        Self {
            coeffs,
            trim: self.trim.reversed(),
            usage: self.usage.clone(),
        }
    }

    fn transformed(&self, transform: &Transform) -> Result<Self> {
        let mut coeffs = self.coeffs;
        polynomial::transform(&mut coeffs, transform);
        let moved = Self::from_coefficients(coeffs)?;
        Ok(Self {
            trim: self.trim,
            usage: self.usage.clone(),
            ..moved
        })
    }

    fn trimmed(&self, range: TrimRange) -> Self {
        Self {
            trim: range,
            ..self.clone()
        }
    }

    fn with_usage(&self, usage: Usage) -> Self {
        Self {
            usage,
            ..self.clone()
        }
    }
}

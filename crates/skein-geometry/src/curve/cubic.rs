//! Cubic polynomial curve.

use nalgebra::{Matrix4, Matrix4x3};
use serde::{Deserialize, Serialize};
use skein_core::{ensure_positive, Result, SkeinError, Tolerance};
use skein_math::point::{all_unique, are_collinear};
use skein_math::{Aabb3, Line, Plane, Point3, PointExt, Transform, Vector3};

use super::{polynomial, require_coplanar, ClosestPoint, Curve, IntersectionPoint};
use crate::search;
use crate::trim::TrimRange;
use crate::usage::Usage;

/// A cubic `p(t) = c0 + c1 t + c2 t^2 + c3 t^3`. May twist out of any plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubicCurve {
    coeffs: [Vector3; 4],
    trim: TrimRange,
    usage: Usage,
}

impl CubicCurve {
    pub fn bezier(p0: Point3, c1: Point3, c2: Point3, p3: Point3) -> Result<Self> {
        Self::from_coefficients([
            p0,
            3.0 * (c1 - p0),
            3.0 * (p0 - 2.0 * c1 + c2),
            -p0 + 3.0 * c1 - 3.0 * c2 + p3,
        ])
    }

    /// Curve from end points and the derivatives there.
    pub fn hermite(p0: Point3, d0: Vector3, p1: Point3, d1: Vector3) -> Result<Self> {
        if p0.coincident(p1) {
            return Err(SkeinError::Construction(
                "hermite end points coincide".into(),
            ));
        }
        if d0.length() < Tolerance::DEFAULT_LINEAR || d1.length() < Tolerance::DEFAULT_LINEAR {
            return Err(SkeinError::Construction(
                "hermite tangents must be non-zero".into(),
            ));
        }
        Self::bezier(p0, p0 + d0 / 3.0, p1 - d1 / 3.0, p1)
    }

    /// Curve passing through `points` at `t = 0, 1/3, 2/3, 1`.
    pub fn through_points(points: [Point3; 4]) -> Result<Self> {
        check_points(&points)?;
        let basis = Matrix4::<f64>::from_fn(|r, c| (r as f64 / 3.0).powi(c as i32));
        let inverse = basis.try_inverse().ok_or_else(|| {
            SkeinError::Construction("interpolation system is singular".into())
        })?;
        let solved = inverse * Matrix4x3::from_fn(|r, c| points[r][c]);
        let row = |k: usize| Vector3::new(solved[(k, 0)], solved[(k, 1)], solved[(k, 2)]);
        Self::from_coefficients([row(0), row(1), row(2), row(3)])
    }

    fn from_coefficients(coeffs: [Vector3; 4]) -> Result<Self> {
        check_points(&control_points(&coeffs))?;
        Ok(Self {
            coeffs,
            trim: TrimRange::FULL,
            usage: Usage::default(),
        })
    }

    /// Bezier control points of the untrimmed curve.
    pub fn control_points(&self) -> [Point3; 4] {
        control_points(&self.coeffs)
    }

    /// Coefficients in ascending power.
    pub fn coefficients(&self) -> &[Vector3; 4] {
        &self.coeffs
    }
}

fn control_points(c: &[Vector3; 4]) -> [Point3; 4] {
    let p1 = c[0] + c[1] / 3.0;
    let p2 = c[2] / 3.0 - c[0] + 2.0 * p1;
    [c[0], p1, p2, c[0] + c[1] + c[2] + c[3]]
}

fn check_points(points: &[Point3; 4]) -> Result<()> {
    if !all_unique(points) {
        return Err(SkeinError::Construction(
            "cubic curve points must be unique".into(),
        ));
    }
    let [first, a, b, last] = *points;
    if are_collinear(first, last, a) && are_collinear(first, last, b) {
        return Err(SkeinError::Construction(
            "cubic curve points are all collinear".into(),
        ));
    }
    Ok(())
}

impl Curve for CubicCurve {
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use skein_math::dvec3;

    fn hump() -> CubicCurve {
        // x = 3 t, y = 6 t (1 - t)
        CubicCurve::bezier(
            Point3::ZERO,
            dvec3(1.0, 2.0, 0.0),
            dvec3(2.0, 2.0, 0.0),
            dvec3(3.0, 0.0, 0.0),
        )
        .unwrap()
    }

    fn twisted() -> CubicCurve {
        CubicCurve::bezier(
            Point3::ZERO,
            dvec3(1.0, 0.0, 0.0),
            dvec3(1.0, 1.0, 0.0),
            dvec3(1.0, 1.0, 1.0),
        )
        .unwrap()
    }

    #[test]
    fn test_bezier_validation() {
        let p = dvec3(1.0, 0.0, 0.0);
        assert!(CubicCurve::bezier(Point3::ZERO, p, p, dvec3(2.0, 1.0, 0.0)).is_err());
        assert!(matches!(
            CubicCurve::bezier(
                Point3::ZERO,
                dvec3(1.0, 0.0, 0.0),
                dvec3(2.0, 0.0, 0.0),
                dvec3(3.0, 0.0, 0.0)
            ),
            Err(SkeinError::Construction(_))
        ));
    }

    #[test]
    fn test_control_points_round_trip() {
        let [p0, c1, c2, p3] = hump().control_points();
        assert!(p0.coincident(Point3::ZERO));
        assert!(c1.coincident(dvec3(1.0, 2.0, 0.0)));
        assert!(c2.coincident(dvec3(2.0, 2.0, 0.0)));
        assert!(p3.coincident(dvec3(3.0, 0.0, 0.0)));
    }

    #[test]
    fn test_hermite_matches_end_derivatives() {
        let d0 = dvec3(3.0, 3.0, 0.0);
        let d1 = dvec3(3.0, -3.0, 0.0);
        let curve = CubicCurve::hermite(Point3::ZERO, d0, dvec3(3.0, 0.0, 0.0), d1).unwrap();
        assert!((curve.derivative(0.0) - d0).length() < 1e-12);
        assert!((curve.derivative(1.0) - d1).length() < 1e-12);
        assert!(CubicCurve::hermite(Point3::ZERO, Vector3::ZERO, Vector3::X, Vector3::X).is_err());
        assert!(CubicCurve::hermite(Point3::ZERO, Vector3::X, Point3::ZERO, Vector3::X).is_err());
    }

    #[test]
    fn test_through_points_interpolates() {
        let points = [
            Point3::ZERO,
            dvec3(1.0, 1.5, 0.0),
            dvec3(2.0, -0.5, 0.5),
            dvec3(3.0, 0.0, 0.0),
        ];
        let curve = CubicCurve::through_points(points).unwrap();
        for (i, p) in points.iter().enumerate() {
            let t = i as f64 / 3.0;
            assert!((curve.evaluate(t) - *p).length() < 1e-9, "point {i}");
        }
    }

    #[test]
    fn test_line_crosses_hump_twice() {
        let line = Line::new(dvec3(0.0, 1.0, 0.0), Vector3::X).unwrap();
        let hits = hump().intersect(&line, 1e-6).unwrap();
        assert_eq!(hits.len(), 2);
        // 6 t (1 - t) = 1
        let root = (1.0 - (1.0_f64 / 3.0).sqrt()) / 2.0;
        assert_abs_diff_eq!(hits[0].param, root, epsilon = 1e-5);
        assert_abs_diff_eq!(hits[1].param, 1.0 - root, epsilon = 1e-5);
        assert_abs_diff_eq!(hits[0].point.x, 3.0 * root, epsilon = 1e-4);
    }

    #[test]
    fn test_crossings_lie_on_the_curve() {
        let curve = hump();
        let line = Line::new(dvec3(0.0, 1.0, 0.0), Vector3::X).unwrap();
        let hits = curve.intersect(&line, 1e-6).unwrap();
        assert_eq!(hits.len(), 2);
        for hit in &hits {
            let param = curve.is_coincident(hit.point, 1e-6).unwrap();
            assert!(param.is_some(), "hit at t={} is off the curve", hit.param);
            assert_abs_diff_eq!(param.unwrap(), hit.param, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_trimmed_hump_keeps_one_crossing() {
        let line = Line::new(dvec3(0.0, 1.0, 0.0), Vector3::X).unwrap();
        let half = hump().trim_back(0.5).unwrap();
        assert_eq!(half.intersect(&line, 1e-6).unwrap().len(), 1);
    }

    #[test]
    fn test_twisted_curve_has_no_plane() {
        let curve = twisted();
        assert!(curve.plane().is_none());
        assert!(hump().plane().is_some());

        let through = Line::new(curve.evaluate(0.5), Vector3::X).unwrap();
        let hits = curve.intersect(&through, 1e-6).unwrap();
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].param, 0.5, epsilon = 1e-5);

        let skew = Line::new(curve.evaluate(0.5) + dvec3(0.0, 0.0, 0.1), Vector3::X).unwrap();
        assert!(curve.intersect(&skew, 1e-4).unwrap().is_empty());
    }

    #[test]
    fn test_bounding_box_and_length() {
        let curve = hump();
        let bounds = curve.bounding_box();
        assert_abs_diff_eq!(bounds.max.y, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(bounds.max.x, 3.0, epsilon = 1e-12);
        // Longer than the chord, shorter than the control polygon.
        let length = curve.length();
        assert!(length > 3.0 && length < 1.0 + 2.0 * 5.0_f64.sqrt());
    }

    #[test]
    fn test_reverse_preserves_shape() {
        let curve = twisted().trimmed(TrimRange::new(0.1, 0.7).unwrap());
        let rev = curve.reversed();
        assert!(rev.one_end().coincident(curve.other_end()));
        assert!(rev.other_end().coincident(curve.one_end()));
        assert_abs_diff_eq!(rev.length(), curve.length(), epsilon = 1e-9);
    }

    #[test]
    fn test_closest_point_on_hump() {
        let curve = hump();
        let hit = curve.closest_point(dvec3(1.5, 2.0, 0.0)).unwrap().unwrap();
        assert_abs_diff_eq!(hit.param, 0.5, epsilon = 1e-3);
        assert_abs_diff_eq!(hit.distance, 0.5, epsilon = 1e-3);
    }
}

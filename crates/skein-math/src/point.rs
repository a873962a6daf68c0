//! Epsilon-tolerant point and vector helpers.

use skein_core::{Result, SkeinError, Tolerance};

use crate::{Point3, Vector3};

/// Tolerance-aware comparisons on points.
pub trait PointExt: Copy {
    /// Coincidence within the default linear tolerance.
    fn coincident(self, other: Self) -> bool;

    fn coincident_within(self, other: Self, tolerance: f64) -> bool;

    /// Integer key of the grid cell this point rounds to, for deduplication.
    fn grid_key(self, spacing: f64) -> [i64; 3];
}

impl PointExt for Point3 {
    fn coincident(self, other: Self) -> bool {
        self.coincident_within(other, Tolerance::DEFAULT_LINEAR)
    }

    fn coincident_within(self, other: Self, tolerance: f64) -> bool {
        self.distance_squared(other) < tolerance * tolerance
    }

    fn grid_key(self, spacing: f64) -> [i64; 3] {
        let cell = |v: f64| (v / spacing).round() as i64;
        [cell(self.x), cell(self.y), cell(self.z)]
    }
}

/// Normalize `v`, rejecting vectors too short to carry a direction.
pub fn unit_vector(v: Vector3) -> Result<Vector3> {
    if v.length() < Tolerance::DEFAULT_LINEAR {
        return Err(SkeinError::Construction(format!(
            "zero-length vector {v} has no direction"
        )));
    }
    Ok(v.normalize())
}

/// Whether `v` has unit length within the angular tolerance.
pub fn is_unit(v: Vector3) -> bool {
    (v.length() - 1.0).abs() < Tolerance::DEFAULT_ANGULAR
}

/// True when no two points coincide.
pub fn all_unique(points: &[Point3]) -> bool {
    points.iter().enumerate().all(|(i, a)| {
        points[i + 1..].iter().all(|b| !a.coincident(*b))
    })
}

/// True when the three points lie on one line (triangle height below tolerance).
pub fn are_collinear(a: Point3, b: Point3, c: Point3) -> bool {
    let longest = a.distance(b).max(b.distance(c)).max(c.distance(a));
    if longest < Tolerance::DEFAULT_LINEAR {
        return true;
    }
    let twice_area = (b - a).cross(c - a).length();
    twice_area / longest < Tolerance::DEFAULT_LINEAR
}

/// Perpendicular distance from `point` to the chord through `start` and `end`.
///
/// Collapses to the distance from `start` when the chord is degenerate.
pub fn chord_deviation(point: Point3, start: Point3, end: Point3) -> f64 {
    let chord = end - start;
    let len_sq = chord.length_squared();
    if len_sq < f64::EPSILON {
        return point.distance(start);
    }
    let rel = point - start;
    let along = rel.dot(chord) / len_sq;
    (rel - chord * along).length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    #[test]
    fn test_coincident() {
        let a = dvec3(1.0, 2.0, 3.0);
        assert!(a.coincident(dvec3(1.0, 2.0, 3.00001)));
        assert!(!a.coincident(dvec3(1.0, 2.0, 3.01)));
    }

    #[test]
    fn test_grid_key_merges_near_points() {
        let a = dvec3(1.00001, 2.0, 0.0);
        let b = dvec3(1.00002, 2.0, 0.0);
        assert_eq!(a.grid_key(1e-3), b.grid_key(1e-3));
        assert_ne!(a.grid_key(1e-3), dvec3(1.1, 2.0, 0.0).grid_key(1e-3));
    }

    #[test]
    fn test_unit_vector_rejects_zero() {
        assert!(unit_vector(Vector3::ZERO).is_err());
        let u = unit_vector(dvec3(3.0, 4.0, 0.0)).unwrap();
        assert!(is_unit(u));
        assert!(!is_unit(dvec3(3.0, 4.0, 0.0)));
    }

    #[test]
    fn test_uniqueness_and_collinearity() {
        let a = dvec3(0.0, 0.0, 0.0);
        let b = dvec3(1.0, 1.0, 0.0);
        let c = dvec3(2.0, 2.0, 0.0);
        assert!(all_unique(&[a, b, c]));
        assert!(!all_unique(&[a, b, a]));
        assert!(are_collinear(a, b, c));
        assert!(!are_collinear(a, b, dvec3(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_chord_deviation() {
        let d = chord_deviation(dvec3(1.0, 2.0, 0.0), Point3::ZERO, dvec3(4.0, 0.0, 0.0));
        assert!((d - 2.0).abs() < 1e-12);
        let degenerate = chord_deviation(dvec3(3.0, 4.0, 0.0), Point3::ZERO, Point3::ZERO);
        assert!((degenerate - 5.0).abs() < 1e-12);
    }
}

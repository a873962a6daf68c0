use serde::{Deserialize, Serialize};
use skein_core::{Relation, Result, SkeinError, Tolerance};

use crate::point::{is_unit, unit_vector, PointExt};
use crate::{Point3, Vector3};

/// An unbounded line in 3D space defined by origin and unit direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    origin: Point3,
    direction: Vector3,
}

impl Line {
    /// Build a line from an origin and an already normalized direction.
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self> {
        if !is_unit(direction) {
            return Err(SkeinError::Construction(format!(
                "line direction {direction} is not a unit vector"
            )));
        }
        Ok(Self { origin, direction })
    }

    /// Line through two distinct points, directed from `a` toward `b`.
    pub fn through(a: Point3, b: Point3) -> Result<Self> {
        if a.coincident(b) {
            return Err(SkeinError::Construction(format!(
                "line through coincident points {a} and {b}"
            )));
        }
        Ok(Self {
            origin: a,
            direction: unit_vector(b - a)?,
        })
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// Point at signed distance `t` from the origin.
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Signed distance along the line from the origin to the projection of `point`.
    pub fn param_of(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.direction)
    }

    pub fn closest_point(&self, point: Point3) -> Point3 {
        self.at(self.param_of(point))
    }

    /// Perpendicular offset from the line to `point`.
    pub fn offset_of(&self, point: Point3) -> Vector3 {
        point - self.closest_point(point)
    }

    pub fn distance_to_point(&self, point: Point3) -> f64 {
        self.offset_of(point).length()
    }

    pub fn contains_point(&self, point: Point3) -> bool {
        self.distance_to_point(point) < Tolerance::DEFAULT_LINEAR
    }

    pub fn is_parallel(&self, other: &Line) -> bool {
        self.direction.cross(other.direction).length() < Tolerance::DEFAULT_ANGULAR
    }

    /// Unique crossing point with another line.
    pub fn intersect(&self, other: &Line) -> Result<Point3> {
        if self.is_parallel(other) {
            return Err(if self.contains_point(other.origin) {
                SkeinError::relationship(Relation::Coincident, "lines overlap")
            } else {
                SkeinError::relationship(Relation::Parallel, "lines never meet")
            });
        }

        let normal = self.direction.cross(other.direction);
        let between = other.origin - self.origin;
        if between.dot(normal.normalize()).abs() > Tolerance::DEFAULT_LINEAR {
            return Err(SkeinError::relationship(
                Relation::NonCoplanar,
                "lines are skew",
            ));
        }

        let s = between.cross(other.direction).dot(normal) / normal.length_squared();
        Ok(self.at(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    #[test]
    fn test_new_rejects_non_unit() {
        assert!(Line::new(Point3::ZERO, dvec3(2.0, 0.0, 0.0)).is_err());
        assert!(Line::new(Point3::ZERO, Vector3::X).is_ok());
        assert!(Line::through(Point3::ONE, Point3::ONE).is_err());
    }

    #[test]
    fn test_at_and_param() {
        let line = Line::through(dvec3(1.0, 0.0, 0.0), dvec3(3.0, 0.0, 0.0)).unwrap();
        assert!((line.at(5.0) - dvec3(6.0, 0.0, 0.0)).length() < 1e-10);
        assert!((line.param_of(dvec3(-1.0, 4.0, 0.0)) + 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_offset_and_distance() {
        let line = Line::new(Point3::ZERO, Vector3::X).unwrap();
        let off = line.offset_of(dvec3(5.0, 3.0, 0.0));
        assert!((off - dvec3(0.0, 3.0, 0.0)).length() < 1e-10);
        assert!((line.distance_to_point(dvec3(-5.0, 0.0, 4.0)) - 4.0).abs() < 1e-10);
        assert!(line.contains_point(dvec3(-7.0, 0.0, 0.0)));
    }

    #[test]
    fn test_intersect_crossing() {
        let a = Line::new(Point3::ZERO, Vector3::X).unwrap();
        let b = Line::through(dvec3(2.0, -1.0, 0.0), dvec3(2.0, 1.0, 0.0)).unwrap();
        let p = a.intersect(&b).unwrap();
        assert!((p - dvec3(2.0, 0.0, 0.0)).length() < 1e-10);
    }

    #[test]
    fn test_intersect_relationships() {
        let a = Line::new(Point3::ZERO, Vector3::X).unwrap();
        let parallel = Line::new(dvec3(0.0, 1.0, 0.0), Vector3::X).unwrap();
        let same = Line::new(dvec3(4.0, 0.0, 0.0), -Vector3::X).unwrap();
        let skew = Line::new(dvec3(0.0, 0.0, 1.0), Vector3::Y).unwrap();

        let relation = |r: Result<Point3>| match r {
            Err(SkeinError::Relationship { relation, .. }) => Some(relation),
            _ => None,
        };
        assert_eq!(relation(a.intersect(&parallel)), Some(Relation::Parallel));
        assert_eq!(relation(a.intersect(&same)), Some(Relation::Coincident));
        assert_eq!(relation(a.intersect(&skew)), Some(Relation::NonCoplanar));
    }
}

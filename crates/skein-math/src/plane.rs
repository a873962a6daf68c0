use serde::{Deserialize, Serialize};
use skein_core::{Result, SkeinError, Tolerance};

use crate::point::{all_unique, are_collinear, unit_vector};
use crate::{Line, Point3, Vector3};

/// A plane in 3D space defined by a point and unit normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    origin: Point3,
    normal: Vector3,
}

impl Plane {
    pub fn new(origin: Point3, normal: Vector3) -> Result<Self> {
        Ok(Self {
            origin,
            normal: unit_vector(normal)?,
        })
    }

    /// Plane through three unique, non-collinear points.
    ///
    /// The normal follows the right-hand rule on `a -> b -> c`.
    pub fn from_points(a: Point3, b: Point3, c: Point3) -> Result<Self> {
        if !all_unique(&[a, b, c]) {
            return Err(SkeinError::Construction(
                "plane needs three unique points".into(),
            ));
        }
        if are_collinear(a, b, c) {
            return Err(SkeinError::Construction(
                "plane points are collinear".into(),
            ));
        }
        Self::new(a, (b - a).cross(c - a))
    }

    pub fn xy() -> Self {
        Self {
            origin: Point3::ZERO,
            normal: Vector3::Z,
        }
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    pub fn normal(&self) -> Vector3 {
        self.normal
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.normal)
    }

    /// Project a point onto this plane.
    pub fn project_point(&self, point: Point3) -> Point3 {
        point - self.normal * self.signed_distance(point)
    }

    pub fn contains_point(&self, point: Point3) -> bool {
        self.signed_distance(point).abs() < Tolerance::DEFAULT_LINEAR
    }

    pub fn is_parallel(&self, other: &Plane) -> bool {
        self.normal.cross(other.normal).length() < Tolerance::DEFAULT_ANGULAR
    }

    /// Same infinite plane, regardless of normal orientation.
    pub fn is_coincident(&self, other: &Plane) -> bool {
        self.is_parallel(other) && self.contains_point(other.origin)
    }

    /// Whether the whole line lies in this plane.
    pub fn contains_line(&self, line: &Line) -> bool {
        line.direction().dot(self.normal).abs() < Tolerance::DEFAULT_ANGULAR
            && self.contains_point(line.origin())
    }

    /// Orthonormal in-plane directions `(u, v)` with `u x v == normal`.
    pub fn basis(&self) -> (Vector3, Vector3) {
        let n = self.normal;
        // Choose a vector not parallel to normal to build the frame
        let ref_vec = if n.x.abs() < 0.9 { Vector3::X } else { Vector3::Y };
        let v = n.cross(ref_vec).normalize();
        let u = v.cross(n).normalize();
        (u, v)
    }
}

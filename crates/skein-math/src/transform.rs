use crate::{DMat3, DMat4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Affine transform stored as a column-major 4x4 matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub matrix: [f64; 16],
}

impl Transform {
    pub fn identity() -> Self {
        Self::from_mat4(DMat4::IDENTITY)
    }

    pub fn from_translation(t: Vector3) -> Self {
        Self::from_mat4(DMat4::from_translation(t))
    }

    /// Rotation by `angle` radians about a unit `axis` through the origin.
    pub fn from_axis_angle(axis: Vector3, angle: f64) -> Self {
        Self::from_mat4(DMat4::from_axis_angle(axis, angle))
    }

    pub fn from_uniform_scale(factor: f64) -> Self {
        Self::from_mat4(DMat4::from_scale(Vector3::splat(factor)))
    }

    pub fn from_scale(factors: Vector3) -> Self {
        Self::from_mat4(DMat4::from_scale(factors))
    }

    pub fn from_mat4(m: DMat4) -> Self {
        Self {
            matrix: m.to_cols_array(),
        }
    }

    pub fn to_mat4(&self) -> DMat4 {
        DMat4::from_cols_array(&self.matrix)
    }

    pub fn transform_point(&self, p: Point3) -> Point3 {
        self.to_mat4().transform_point3(p)
    }

    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        self.to_mat4().transform_vector3(v)
    }

    /// Apply `self` first, then `other`.
    pub fn then(&self, other: &Transform) -> Transform {
        Self::from_mat4(other.to_mat4() * self.to_mat4())
    }

    /// True when the linear part flips handedness (negative determinant).
    pub fn is_mirroring(&self) -> bool {
        DMat3::from_mat4(self.to_mat4()).determinant() < 0.0
    }

    pub fn inverse(&self) -> Option<Transform> {
        let m = self.to_mat4();
        // Check if inverse is valid (determinant != 0)
        if m.determinant().abs() < 1e-15 {
            None
        } else {
            Some(Self::from_mat4(m.inverse()))
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity() {
        let t = Transform::identity();
        let p = dvec3(1.0, 2.0, 3.0);
        let result = t.transform_point(p);
        assert!((result - p).length() < 1e-10);
    }

    #[test]
    fn test_translation_moves_points_not_vectors() {
        let t = Transform::from_translation(dvec3(10.0, 20.0, 30.0));
        let p = dvec3(1.0, 2.0, 3.0);
        assert!((t.transform_point(p) - dvec3(11.0, 22.0, 33.0)).length() < 1e-10);
        assert!((t.transform_vector(p) - p).length() < 1e-10);
    }

    #[test]
    fn test_rotation_then_translation() {
        let rot = Transform::from_axis_angle(Vector3::Z, FRAC_PI_2);
        let shift = Transform::from_translation(dvec3(0.0, 0.0, 1.0));
        let p = rot.then(&shift).transform_point(dvec3(1.0, 0.0, 0.0));
        assert!((p - dvec3(0.0, 1.0, 1.0)).length() < 1e-10);
    }

    #[test]
    fn test_inverse() {
        let t = Transform::from_translation(dvec3(10.0, 20.0, 30.0));
        let inv = t.inverse().unwrap();
        let p = dvec3(1.0, 2.0, 3.0);
        let result = inv.transform_point(t.transform_point(p));
        assert!((result - p).length() < 1e-10);
        assert!(Transform::from_uniform_scale(0.0).inverse().is_none());
    }

    #[test]
    fn test_mirroring_detection() {
        assert!(Transform::from_scale(dvec3(-1.0, 1.0, 1.0)).is_mirroring());
        assert!(!Transform::from_scale(dvec3(-1.0, -1.0, 1.0)).is_mirroring());
        assert!(!Transform::from_axis_angle(Vector3::X, 2.0).is_mirroring());
    }
}

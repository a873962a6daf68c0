//! Local coordinate systems.

use serde::{Deserialize, Serialize};
use skein_core::{Result, SkeinError, Tolerance};

use crate::point::unit_vector;
use crate::{DMat4, Point3, Transform, Vector3};

/// Right-handed orthonormal frame anchored at `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSystem {
    origin: Point3,
    x_axis: Vector3,
    y_axis: Vector3,
    z_axis: Vector3,
}

impl CoordinateSystem {
    /// Frame whose x axis follows `x_dir` and whose xy plane contains `in_plane`.
    pub fn new(origin: Point3, x_dir: Vector3, in_plane: Vector3) -> Result<Self> {
        let x_axis = unit_vector(x_dir)?;
        let z = x_axis.cross(in_plane);
        if z.length() < Tolerance::DEFAULT_ANGULAR * in_plane.length().max(1.0) {
            return Err(SkeinError::Construction(
                "frame reference directions are parallel".into(),
            ));
        }
        let z_axis = z.normalize();
        let y_axis = z_axis.cross(x_axis);
        Ok(Self {
            origin,
            x_axis,
            y_axis,
            z_axis,
        })
    }

    pub fn world() -> Self {
        Self {
            origin: Point3::ZERO,
            x_axis: Vector3::X,
            y_axis: Vector3::Y,
            z_axis: Vector3::Z,
        }
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    pub fn x_axis(&self) -> Vector3 {
        self.x_axis
    }

    pub fn y_axis(&self) -> Vector3 {
        self.y_axis
    }

    pub fn z_axis(&self) -> Vector3 {
        self.z_axis
    }

    /// Same frame spun by `angle` radians about its own z axis.
    pub fn rotated(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            origin: self.origin,
            x_axis: self.x_axis * cos + self.y_axis * sin,
            y_axis: self.y_axis * cos - self.x_axis * sin,
            z_axis: self.z_axis,
        }
    }

    /// Maps local coordinates into world coordinates.
    pub fn to_global(&self) -> Transform {
        Transform::from_mat4(DMat4::from_cols(
            self.x_axis.extend(0.0),
            self.y_axis.extend(0.0),
            self.z_axis.extend(0.0),
            self.origin.extend(1.0),
        ))
    }

    /// Maps world coordinates into this frame.
    pub fn to_local(&self) -> Transform {
        // Orthonormal: the inverse rotation is the transpose.
        let rot = DMat4::from_cols(
            self.x_axis.extend(0.0),
            self.y_axis.extend(0.0),
            self.z_axis.extend(0.0),
            glam::DVec4::W,
        )
        .transpose();
        Transform::from_mat4(rot * DMat4::from_translation(-self.origin))
    }

    pub fn local_point(&self, p: Point3) -> Point3 {
        let rel = p - self.origin;
        Point3::new(rel.dot(self.x_axis), rel.dot(self.y_axis), rel.dot(self.z_axis))
    }

    pub fn global_point(&self, p: Point3) -> Point3 {
        self.origin + self.x_axis * p.x + self.y_axis * p.y + self.z_axis * p.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    #[test]
    fn test_rejects_parallel_references() {
        assert!(CoordinateSystem::new(Point3::ZERO, Vector3::X, dvec3(2.0, 0.0, 0.0)).is_err());
        assert!(CoordinateSystem::new(Point3::ZERO, Vector3::ZERO, Vector3::Y).is_err());
    }

    #[test]
    fn test_axes_are_orthonormal() {
        let cs = CoordinateSystem::new(
            dvec3(1.0, 2.0, 3.0),
            dvec3(1.0, 1.0, 0.0),
            dvec3(0.0, 1.0, 0.5),
        )
        .unwrap();
        assert!(cs.x_axis().dot(cs.y_axis()).abs() < 1e-12);
        assert!(cs.y_axis().dot(cs.z_axis()).abs() < 1e-12);
        assert!((cs.x_axis().cross(cs.y_axis()) - cs.z_axis()).length() < 1e-12);
    }

    #[test]
    fn test_local_global_round_trip() {
        let cs = CoordinateSystem::new(dvec3(1.0, 1.0, 2.0), Vector3::Y, -Vector3::X).unwrap();
        let world = dvec3(3.0, -4.0, 7.0);

        let local = cs.to_local().transform_point(world);
        assert!((local - cs.local_point(world)).length() < 1e-12);
        assert!((cs.to_global().transform_point(local) - world).length() < 1e-12);
        assert!((cs.global_point(local) - world).length() < 1e-12);
    }

    #[test]
    fn test_rotated_keeps_z() {
        let cs = CoordinateSystem::world().rotated(std::f64::consts::FRAC_PI_2);
        assert!((cs.x_axis() - Vector3::Y).length() < 1e-12);
        assert!((cs.y_axis() + Vector3::X).length() < 1e-12);
        assert_eq!(cs.z_axis(), Vector3::Z);
    }

    #[test]
    fn test_world_frame_is_identity() {
        let p = dvec3(5.0, 6.0, 7.0);
        assert_eq!(CoordinateSystem::world().to_global().transform_point(p), p);
    }
}

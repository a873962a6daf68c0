pub mod aabb;
pub mod frame;
pub mod line;
pub mod plane;
pub mod point;
pub mod transform;

pub use aabb::Aabb3;
pub use frame::CoordinateSystem;
pub use glam::{dvec3, DAffine3, DMat3, DMat4, DVec2, DVec3, DVec4};
pub use line::Line;
pub use plane::Plane;
pub use point::PointExt;
pub use transform::Transform;

pub type Point2 = DVec2;
pub type Point3 = DVec3;
pub type Vector2 = DVec2;
pub type Vector3 = DVec3;

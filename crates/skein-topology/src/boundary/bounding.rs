use skein_geometry::Curve;
use skein_math::Aabb3;

use super::graph::BoundaryLoop;

impl BoundaryLoop {
    /// Union of the fragment boxes; `None` for an empty loop.
    pub fn bounding_box(&self) -> Option<Aabb3> {
        self.fragments
            .values()
            .map(|curve| curve.bounding_box())
            .reduce(|a, b| a | b)
    }
}

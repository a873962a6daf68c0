use serde::{Deserialize, Serialize};
use skein_math::{Point3, PointExt};
use slotmap::new_key_type;

new_key_type! {
    pub struct FragmentId;
}

/// A point where one or two boundary fragments end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub point: Point3,
    pub first: FragmentId,
    pub second: Option<FragmentId>,
}

impl Joint {
    pub fn new(point: Point3, first: FragmentId) -> Self {
        Self {
            point,
            first,
            second: None,
        }
    }

    pub fn is_shared(&self) -> bool {
        self.second.is_some()
    }

    pub fn holds(&self, id: FragmentId) -> bool {
        self.first == id || self.second == Some(id)
    }

    /// The fragment on the far side of `id`, if any.
    pub fn other(&self, id: FragmentId) -> Option<FragmentId> {
        if self.first == id {
            self.second
        } else if self.second == Some(id) {
            Some(self.first)
        } else {
            None
        }
    }

    pub(crate) fn matches(&self, point: Point3, tolerance: f64) -> bool {
        self.point.coincident_within(point, tolerance)
    }
}

/// Crossing of a probing line with the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Milestone {
    pub point: Point3,
    /// Signed distance from the line origin along its direction.
    pub distance: f64,
}

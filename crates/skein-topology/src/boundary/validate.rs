use skein_core::traits::Validate;
use skein_core::{Result, SkeinError};
use skein_geometry::Curve;
use skein_math::PointExt;

use super::graph::BoundaryLoop;

impl Validate for BoundaryLoop {
    fn validate(&self) -> Result<()> {
        let tolerance = self.tolerance.linear;

        // 1. Every joint refers to live fragments and sits on one of their ends
        for joint in &self.joints {
            for id in std::iter::once(joint.first).chain(joint.second) {
                let curve = self.fragments.get(id).ok_or_else(|| {
                    SkeinError::Topology(format!(
                        "joint at {} references missing fragment {:?}",
                        joint.point, id
                    ))
                })?;
                let touches = curve.one_end().coincident_within(joint.point, tolerance)
                    || curve.other_end().coincident_within(joint.point, tolerance);
                if !touches {
                    return Err(SkeinError::Topology(format!(
                        "fragment {:?} does not end at its joint {}",
                        id, joint.point
                    )));
                }
            }
        }

        // 2. The closed flag matches the joint structure
        let cycle = !self.fragments.is_empty()
            && self.joints.len() == self.fragments.len()
            && self.joints.iter().all(|j| j.is_shared());
        if cycle != self.closed {
            return Err(SkeinError::Topology(format!(
                "closed flag is {} but joints describe {}",
                self.closed,
                if cycle { "a cycle" } else { "an open chain" }
            )));
        }

        // 3. Ordering covers every fragment head to tail
        if self.ordered.is_empty() {
            return Ok(());
        }
        if !self.closed || self.ordered.len() != self.fragments.len() {
            return Err(SkeinError::Topology(format!(
                "ordering lists {} of {} fragments",
                self.ordered.len(),
                self.fragments.len()
            )));
        }
        for (current, following) in self.cycle() {
            if !current.other_end().coincident_within(following.one_end(), tolerance) {
                return Err(SkeinError::Topology(format!(
                    "ordered fragments break between {} and {}",
                    current.other_end(),
                    following.one_end()
                )));
            }
        }

        Ok(())
    }
}

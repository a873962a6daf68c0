use serde::{Deserialize, Serialize};
use skein_core::{Result, SkeinError, Tolerance};
use skein_geometry::{Curve, CurvePrimitive};
use skein_math::{Point3, PointExt};
use slotmap::SlotMap;

use super::types::*;

/// A boundary assembled from curve fragments that meet end to end.
///
/// Fragments may be added in any order and orientation. Once every joint is
/// shared by exactly two fragments the loop is closed and its fragments are
/// aligned into a single head-to-tail cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryLoop {
    pub(crate) fragments: SlotMap<FragmentId, CurvePrimitive>,
    pub(crate) joints: Vec<Joint>,
    pub(crate) ordered: Vec<FragmentId>,
    pub(crate) closed: bool,
    pub(crate) tolerance: Tolerance,
}

impl BoundaryLoop {
    pub fn new() -> Self {
        Self::with_tolerance(Tolerance::default())
    }

    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            fragments: SlotMap::with_key(),
            joints: Vec::new(),
            ordered: Vec::new(),
            closed: false,
            tolerance,
        }
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragment(&self, id: FragmentId) -> Option<&CurvePrimitive> {
        self.fragments.get(id)
    }

    pub fn fragments(&self) -> impl Iterator<Item = (FragmentId, &CurvePrimitive)> {
        self.fragments.iter()
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Fragment ids in cycle order; empty until the loop is closed and aligned.
    pub fn ordered(&self) -> &[FragmentId] {
        &self.ordered
    }

    /// Ordered fragments, each oriented to start where the previous one ends.
    pub fn ordered_fragments(&self) -> impl Iterator<Item = &CurvePrimitive> {
        self.ordered.iter().filter_map(|&id| self.fragments.get(id))
    }

    /// Add a fragment, joining it to any open end it touches.
    ///
    /// A fragment end landing on a joint that already has two fragments, or
    /// a closure that would leave several disjoint cycles, is rejected and
    /// the loop is left unchanged.
    pub fn add(&mut self, fragment: impl Into<CurvePrimitive>) -> Result<FragmentId> {
        let fragment = fragment.into();
        let ends = [fragment.one_end(), fragment.other_end()];
        let tolerance = self.tolerance.linear;
        let id = self.fragments.insert(fragment);

        let mut joints = self.joints.clone();
        let attached = ends
            .iter()
            .try_for_each(|&end| attach(&mut joints, id, end, tolerance));
        if let Err(err) = attached {
            self.fragments.remove(id);
            return Err(err);
        }

        let was_closed = self.closed;
        let closed = is_cycle(&joints, self.fragments.len());
        if closed && !was_closed {
            log::debug!("boundary closed with {} fragments", self.fragments.len());
            let order = match plan_order(&self.fragments, &joints, tolerance) {
                Ok(order) => order,
                Err(err) => {
                    self.fragments.remove(id);
                    return Err(err);
                }
            };
            self.commit_order(order);
        } else if !closed {
            self.ordered.clear();
        }
        self.joints = joints;
        self.closed = closed;
        Ok(id)
    }

    /// Remove a fragment; the loop reopens and its ordering is dropped.
    ///
    /// The remaining joints are rebuilt from scratch. If the survivors cannot
    /// be rejoined the removal is rejected and the loop is left unchanged.
    pub fn remove(&mut self, id: FragmentId) -> Result<CurvePrimitive> {
        if !self.fragments.contains_key(id) {
            return Err(SkeinError::NotFound(format!("fragment {id:?}")));
        }

        let mut joints = Vec::with_capacity(self.joints.len());
        for (other, curve) in self.fragments.iter().filter(|&(other, _)| other != id) {
            for end in [curve.one_end(), curve.other_end()] {
                attach(&mut joints, other, end, self.tolerance.linear)?;
            }
        }
        let fragment = self
            .fragments
            .remove(id)
            .ok_or_else(|| SkeinError::NotFound(format!("fragment {id:?}")))?;
        self.joints = joints;
        self.closed = is_cycle(&self.joints, self.fragments.len());
        self.ordered.clear();
        log::debug!("removed fragment {id:?}, {} remain", self.fragments.len());
        Ok(fragment)
    }

    /// Order the fragments into one head-to-tail cycle, reversing where needed.
    pub fn align(&mut self) -> Result<()> {
        let order = plan_order(&self.fragments, &self.joints, self.tolerance.linear)?;
        self.commit_order(order);
        Ok(())
    }

    fn commit_order(&mut self, order: Vec<(FragmentId, bool)>) {
        self.ordered.clear();
        for (id, flip) in order {
            if flip {
                if let Some(curve) = self.fragments.get_mut(id) {
                    *curve = curve.reversed();
                }
            }
            self.ordered.push(id);
        }
        log::trace!("aligned {} fragments", self.ordered.len());
    }
}

impl Default for BoundaryLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Join `end` of fragment `id` to a matching open joint, or open a new one.
fn attach(joints: &mut Vec<Joint>, id: FragmentId, end: Point3, tolerance: f64) -> Result<()> {
    if let Some(full) = joints
        .iter()
        .find(|j| j.is_shared() && j.matches(end, tolerance))
    {
        return Err(SkeinError::Topology(format!(
            "a third fragment meets the joint at {}",
            full.point
        )));
    }
    match joints
        .iter_mut()
        .find(|j| !j.is_shared() && j.matches(end, tolerance))
    {
        Some(open) => open.second = Some(id),
        None => joints.push(Joint::new(end, id)),
    }
    Ok(())
}

fn is_cycle(joints: &[Joint], fragment_count: usize) -> bool {
    fragment_count > 0 && joints.len() == fragment_count && joints.iter().all(Joint::is_shared)
}

/// Walk the joints from the first fragment, recording which fragments to reverse.
fn plan_order(
    fragments: &SlotMap<FragmentId, CurvePrimitive>,
    joints: &[Joint],
    tolerance: f64,
) -> Result<Vec<(FragmentId, bool)>> {
    if let Some(open) = joints.iter().find(|j| !j.is_shared()) {
        return Err(SkeinError::Topology(format!(
            "cannot align an open boundary: joint at {} has one fragment",
            open.point
        )));
    }
    let Some((seed, _)) = fragments.iter().next() else {
        return Err(SkeinError::Topology("cannot align an empty boundary".into()));
    };

    let ends = |id: FragmentId, flip: bool| -> Result<(Point3, Point3)> {
        let curve = fragments
            .get(id)
            .ok_or_else(|| SkeinError::NotFound(format!("fragment {id:?}")))?;
        let (head, tail) = (curve.one_end(), curve.other_end());
        Ok(if flip { (tail, head) } else { (head, tail) })
    };

    let mut order = vec![(seed, false)];
    while order.len() < joints.len() {
        let (caboose, flip) = order[order.len() - 1];
        let (_, trailing) = ends(caboose, flip)?;
        let joint = joints
            .iter()
            .find(|j| j.holds(caboose) && j.matches(trailing, tolerance))
            .ok_or_else(|| {
                SkeinError::Topology(format!("no joint at the trailing end {trailing}"))
            })?;
        let next = joint.other(caboose).ok_or_else(|| {
            SkeinError::Topology(format!("joint at {} has one fragment", joint.point))
        })?;
        if next == seed {
            return Err(SkeinError::Topology(format!(
                "boundary splits into several cycles; the first has {} fragments",
                order.len()
            )));
        }
        let (leading, _) = ends(next, false)?;
        order.push((next, !leading.coincident_within(trailing, tolerance)));
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_core::traits::Validate;
    use skein_geometry::LineSegment;
    use skein_math::dvec3;

    fn seg(a: (f64, f64), b: (f64, f64)) -> LineSegment {
        LineSegment::new(dvec3(a.0, a.1, 0.0), dvec3(b.0, b.1, 0.0)).unwrap()
    }

    #[test]
    fn test_attach_rejects_third_fragment() {
        let mut graph = BoundaryLoop::new();
        graph.add(seg((0.0, 0.0), (1.0, 0.0))).unwrap();
        graph.add(seg((1.0, 0.0), (1.0, 1.0))).unwrap();
        let before = graph.joints().to_vec();

        let err = graph.add(seg((1.0, 0.0), (2.0, 0.0))).unwrap_err();
        assert!(matches!(err, SkeinError::Topology(_)));
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.joints(), before.as_slice());
    }

    #[test]
    fn test_remove_keeps_loop_when_rejoin_fails() {
        // Ends 0.8e-4 apart chain within tolerance, 1.6e-4 apart do not.
        let mut graph = BoundaryLoop::new();
        let spare = graph.add(seg((10.0, 10.0), (11.0, 10.0))).unwrap();
        graph.add(seg((0.0, 0.0), (0.0, -1.0))).unwrap();
        graph.remove(spare).unwrap();
        // Reuses the freed slot, so it is visited first when joints are rebuilt.
        graph.add(seg((0.8e-4, 0.0), (1.0, 1.0))).unwrap();
        graph.add(seg((1.6e-4, 0.0), (-1.0, 1.0))).unwrap();
        let unrelated = graph.add(seg((5.0, 5.0), (6.0, 5.0))).unwrap();
        let before = graph.joints().to_vec();

        let err = graph.remove(unrelated).unwrap_err();
        assert!(matches!(err, SkeinError::Topology(_)));
        assert_eq!(graph.len(), 4);
        assert!(graph.fragment(unrelated).is_some());
        assert_eq!(graph.joints(), before.as_slice());
        graph.validate().unwrap();
    }

    #[test]
    fn test_align_requires_closed_boundary() {
        let mut graph = BoundaryLoop::new();
        graph.add(seg((0.0, 0.0), (1.0, 0.0))).unwrap();
        assert!(matches!(graph.align(), Err(SkeinError::Topology(_))));
        assert!(matches!(BoundaryLoop::new().align(), Err(SkeinError::Topology(_))));
    }
}

use skein_geometry::CurvePrimitive;

use super::graph::BoundaryLoop;

/// Iterator over consecutive pairs of ordered fragments, wrapping from the
/// last fragment back to the first.
pub struct CycleIter<'a> {
    boundary: &'a BoundaryLoop,
    index: usize,
}

impl<'a> CycleIter<'a> {
    pub fn new(boundary: &'a BoundaryLoop) -> Self {
        Self { boundary, index: 0 }
    }
}

impl<'a> Iterator for CycleIter<'a> {
    type Item = (&'a CurvePrimitive, &'a CurvePrimitive);

    fn next(&mut self) -> Option<Self::Item> {
        let boundary: &'a BoundaryLoop = self.boundary;
        let ordered = &boundary.ordered;
        if self.index >= ordered.len() {
            return None;
        }
        let current = ordered[self.index];
        let following = ordered[(self.index + 1) % ordered.len()];
        self.index += 1;

        Some((
            boundary.fragments.get(current)?,
            boundary.fragments.get(following)?,
        ))
    }
}

// --- BoundaryLoop iterator methods ---

impl BoundaryLoop {
    /// Iterate over `(fragment, next fragment)` around the aligned cycle.
    pub fn cycle(&self) -> CycleIter<'_> {
        CycleIter::new(self)
    }
}

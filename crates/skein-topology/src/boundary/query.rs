use std::collections::HashSet;
use std::f64::consts::PI;

use rayon::prelude::*;
use skein_core::{Relation, Result, SkeinError};
use skein_geometry::Curve;
use skein_math::point::are_collinear;
use skein_math::{Line, Plane, Point3, PointExt};

use super::graph::BoundaryLoop;
use super::types::Milestone;

/// Probing lines cast through a point by [`BoundaryLoop::is_inside`].
pub const CONTAINMENT_LINES: usize = 6;

/// Angle between consecutive probing lines.
pub const CONTAINMENT_STEP: f64 = PI / CONTAINMENT_LINES as f64;

impl BoundaryLoop {
    /// Plane of the boundary: the first fragment that defines one, else three joints.
    pub fn plane(&self) -> Option<Plane> {
        if let Some(plane) = self.fragments.values().find_map(|curve| curve.plane()) {
            return Some(plane);
        }
        let points: Vec<Point3> = self.joints.iter().map(|j| j.point).collect();
        let (&a, rest) = points.split_first()?;
        rest.iter().enumerate().find_map(|(i, &b)| {
            rest[i + 1..]
                .iter()
                .find(|&&c| !are_collinear(a, b, c))
                .and_then(|&c| Plane::from_points(a, b, c).ok())
        })
    }

    /// Crossings of `line` with the closed boundary, sorted by signed distance.
    ///
    /// A crossing at a joint is reported by both adjacent fragments but kept once.
    pub fn milestones(&self, line: &Line) -> Result<Vec<Milestone>> {
        self.require_closed()?;
        let spacing = self.tolerance.linear;

        let mut seen = HashSet::new();
        let mut milestones = Vec::new();
        for curve in self.ordered_fragments() {
            for hit in curve.intersect(line, spacing)? {
                if seen.insert(hit.point.grid_key(spacing)) {
                    milestones.push(Milestone {
                        point: hit.point,
                        distance: line.param_of(hit.point),
                    });
                }
            }
        }
        milestones.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        milestones.dedup_by(|later, earlier| later.point.coincident_within(earlier.point, spacing));
        Ok(milestones)
    }

    /// Whether `point`, lying in the boundary plane, is enclosed by the loop.
    ///
    /// Casts [`CONTAINMENT_LINES`] lines through the point. A line votes
    /// inside when two adjacent milestones bracket the point, one at or
    /// behind it and the next at or ahead of it. Every line must vote inside.
    pub fn is_inside(&self, point: Point3) -> Result<bool> {
        self.require_closed()?;
        let plane = self.plane().ok_or_else(|| {
            SkeinError::InvalidOperation("boundary does not define a plane".into())
        })?;
        if !plane.contains_point(point) {
            return Err(SkeinError::relationship(
                Relation::NonCoplanar,
                format!("{point} is off the boundary plane"),
            ));
        }

        let (u, v) = plane.basis();
        for k in 0..CONTAINMENT_LINES {
            let (sin, cos) = (k as f64 * CONTAINMENT_STEP).sin_cos();
            let line = Line::new(point, u * cos + v * sin)?;
            let milestones = self.milestones(&line)?;
            let brackets = milestones
                .windows(2)
                .any(|pair| pair[0].distance <= 0.0 && pair[1].distance >= 0.0);
            if !brackets {
                log::trace!("probe {k} through {point} votes outside");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// [`is_inside`](Self::is_inside) for many points, evaluated in parallel.
    pub fn classify(&self, points: &[Point3]) -> Result<Vec<bool>> {
        points.par_iter().map(|&p| self.is_inside(p)).collect()
    }

    /// Where the straight edge from `a` to `b` crosses the boundary.
    ///
    /// At most two crossings are expected; more is a topology error.
    pub fn find_split(&self, a: Point3, b: Point3) -> Result<Vec<Milestone>> {
        let line = Line::through(a, b)?;
        let reach = a.distance(b);
        let slack = self.tolerance.linear;
        let crossings: Vec<Milestone> = self
            .milestones(&line)?
            .into_iter()
            .filter(|m| m.distance >= -slack && m.distance <= reach + slack)
            .collect();
        if crossings.len() > 2 {
            return Err(SkeinError::Topology(format!(
                "edge from {a} to {b} crosses the boundary {} times",
                crossings.len()
            )));
        }
        Ok(crossings)
    }

    fn require_closed(&self) -> Result<()> {
        if self.closed && !self.ordered.is_empty() {
            Ok(())
        } else {
            Err(SkeinError::Topology("boundary is not closed".into()))
        }
    }
}

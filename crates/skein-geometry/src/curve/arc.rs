//! Circular arc curve.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use skein_core::{ensure_positive, Result, SkeinError, Tolerance};
use skein_math::point::{all_unique, are_collinear, is_unit, unit_vector};
use skein_math::{Aabb3, CoordinateSystem, Line, Plane, Point3, Transform, Vector3};

use super::{clamp_to_trim, require_coplanar, ClosestPoint, Curve, IntersectionPoint};
use crate::trim::TrimRange;
use crate::usage::Usage;

/// A circular arc in 3D space.
///
/// The arc starts at `start` and turns by the signed `sweep` angle about
/// `axis` (right-hand rule). Parameter `t` maps to the angle `t * sweep`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularArc {
    center: Point3,
    axis: Vector3,
    start: Point3,
    sweep: f64,
    radius: f64,
    /// x toward `start`, z along `axis`.
    frame: CoordinateSystem,
    trim: TrimRange,
    usage: Usage,
}

impl CircularArc {
    pub fn new(center: Point3, axis: Vector3, start: Point3, sweep: f64) -> Result<Self> {
        if !is_unit(axis) {
            return Err(SkeinError::Construction(format!(
                "arc axis {axis} is not a unit vector"
            )));
        }
        let radial = start - center;
        let radius = radial.length();
        if radius < Tolerance::DEFAULT_LINEAR {
            return Err(SkeinError::Construction(
                "arc start coincides with its center".into(),
            ));
        }
        if radial.dot(axis).abs() > Tolerance::DEFAULT_LINEAR {
            return Err(SkeinError::Construction(
                "arc start is not in the plane normal to the axis".into(),
            ));
        }
        if !sweep.is_finite()
            || sweep.abs() < Tolerance::DEFAULT_ANGULAR
            || sweep.abs() > TAU + Tolerance::DEFAULT_ANGULAR
        {
            return Err(SkeinError::Construction(format!(
                "sweep {sweep} must be non-zero and within [-2pi, 2pi]"
            )));
        }

        let frame = CoordinateSystem::new(center, radial, axis.cross(radial))?;
        Ok(Self {
            center,
            axis,
            start,
            sweep: sweep.clamp(-TAU, TAU),
            radius,
            frame,
            trim: TrimRange::FULL,
            usage: Usage::default(),
        })
    }

    /// Arc from `start` through `middle` to `end`.
    pub fn through_points(start: Point3, middle: Point3, end: Point3) -> Result<Self> {
        if !all_unique(&[start, middle, end]) {
            return Err(SkeinError::Construction(
                "arc points must be unique".into(),
            ));
        }
        if are_collinear(start, middle, end) {
            return Err(SkeinError::Construction(
                "arc points are collinear".into(),
            ));
        }

        let ab = middle - start;
        let ac = end - start;
        let normal = ab.cross(ac);
        let center = start
            + (normal.cross(ab) * ac.length_squared() + ac.cross(normal) * ab.length_squared())
                / (2.0 * normal.length_squared());

        // Seen from the normal, start -> middle -> end runs counter-clockwise.
        let axis = unit_vector(normal)?;
        let full = Self::new(center, axis, start, TAU)?;
        let mut sweep = full.local_angle(end);
        if sweep <= 0.0 {
            sweep += TAU;
        }
        Self::new(center, axis, start, sweep)
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn axis(&self) -> Vector3 {
        self.axis
    }

    /// Untrimmed start point.
    pub fn start_point(&self) -> Point3 {
        self.start
    }

    /// Untrimmed end point.
    pub fn end_point(&self) -> Point3 {
        self.evaluate(1.0)
    }

    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn frame(&self) -> &CoordinateSystem {
        &self.frame
    }

    fn point_at_angle(&self, angle: f64) -> Point3 {
        let (sin, cos) = angle.sin_cos();
        self.center + self.radius * (cos * self.frame.x_axis() + sin * self.frame.y_axis())
    }

    /// Angle of `point` around the axis, measured from `start`, in `(-pi, pi]`.
    fn local_angle(&self, point: Point3) -> f64 {
        let local = self.frame.local_point(point);
        local.y.atan2(local.x)
    }

    /// Sweep parameter of the angular position of `point`.
    ///
    /// The local angle is wrapped across the +-pi seam toward the sweep sign,
    /// so arcs sweeping more than half a turn resolve correctly.
    fn sweep_param(&self, point: Point3) -> f64 {
        let mut angle = self.local_angle(point);
        if angle.abs() < Tolerance::DEFAULT_ANGULAR {
            angle = 0.0;
        } else if self.sweep > 0.0 && angle < 0.0 {
            angle += TAU;
        } else if self.sweep < 0.0 && angle > 0.0 {
            angle -= TAU;
        }
        angle / self.sweep
    }

    fn supporting_plane(&self) -> Result<Plane> {
        Plane::new(self.center, self.axis)
    }
}

impl Curve for CircularArc {
    fn usage(&self) -> &Usage {
        &self.usage
    }

    fn trim_range(&self) -> TrimRange {
        self.trim
    }

    fn evaluate(&self, t: f64) -> Point3 {
        self.point_at_angle(t * self.sweep)
    }

    fn derivative(&self, t: f64) -> Vector3 {
        let (sin, cos) = (t * self.sweep).sin_cos();
        self.radius * self.sweep * (-sin * self.frame.x_axis() + cos * self.frame.y_axis())
    }

    fn length(&self) -> f64 {
        self.sweep.abs() * self.radius * self.trim.span()
    }

    fn bounding_box(&self) -> Aabb3 {
        let a = self.trim.lower() * self.sweep;
        let b = self.trim.upper() * self.sweep;
        let (lo, hi) = (a.min(b), a.max(b));

        let x = self.frame.x_axis();
        let y = self.frame.y_axis();
        let mut bounds = Aabb3::from_corners(self.one_end(), self.other_end());
        for k in 0..3 {
            if x[k].hypot(y[k]) < f64::EPSILON {
                continue;
            }
            // Extremes along axis k repeat every half turn.
            let base = y[k].atan2(x[k]);
            for m in -3..=3 {
                let angle = base + m as f64 * PI;
                if angle >= lo && angle <= hi {
                    bounds = bounds.include_point(self.point_at_angle(angle));
                }
            }
        }
        bounds
    }

    fn plane(&self) -> Option<Plane> {
        self.supporting_plane().ok()
    }

    fn intersect(&self, line: &Line, accuracy: f64) -> Result<Vec<IntersectionPoint>> {
        ensure_positive("accuracy", accuracy)?;
        require_coplanar(&self.supporting_plane()?, line)?;

        let foot = line.closest_point(self.center);
        let gap = foot.distance(self.center);
        if gap > self.radius + accuracy {
            return Ok(Vec::new());
        }

        let half_chord = (self.radius * self.radius - gap * gap).max(0.0).sqrt();
        let roots = if half_chord <= Tolerance::DEFAULT_LINEAR {
            vec![foot]
        } else {
            vec![
                foot - line.direction() * half_chord,
                foot + line.direction() * half_chord,
            ]
        };

        let slack = accuracy / (self.radius * self.sweep.abs());
        let mut hits: Vec<IntersectionPoint> = roots
            .into_iter()
            .filter_map(|point| {
                clamp_to_trim(self.trim, self.sweep_param(point), slack)
                    .map(|param| IntersectionPoint { point, param })
            })
            .collect();
        hits.sort_by(|a, b| a.param.total_cmp(&b.param));
        Ok(hits)
    }

    fn closest_point(&self, target: Point3) -> Result<Option<ClosestPoint>> {
        let rel = target - self.center;
        let planar = rel - self.axis * rel.dot(self.axis);

        let on_sweep = if planar.length() < Tolerance::DEFAULT_LINEAR {
            None
        } else {
            let foot = self.center + planar.normalize() * self.radius;
            clamp_to_trim(self.trim, self.sweep_param(foot), 0.0)
        };
        let param = on_sweep.unwrap_or_else(|| {
            let (lower, upper) = (self.trim.lower(), self.trim.upper());
            if self.evaluate(upper).distance(target) < self.evaluate(lower).distance(target) {
                upper
            } else {
                lower
            }
        });

        let point = self.evaluate(param);
        Ok(Some(ClosestPoint {
            point,
            param,
            distance: point.distance(target),
        }))
    }

    fn reversed(&self) -> Self {
        Self {
            start: self.evaluate(1.0),
            sweep: -self.sweep,
            frame: self.frame.rotated(self.sweep),
            trim: self.trim.reversed(),
            ..self.clone()
        }
    }

    fn transformed(&self, transform: &Transform) -> Result<Self> {
        let x = transform.transform_vector(self.frame.x_axis());
        let y = transform.transform_vector(self.frame.y_axis());
        let scale = x.length();
        if (scale - y.length()).abs() > Tolerance::DEFAULT_ANGULAR * scale.max(1.0)
            || x.dot(y).abs() > Tolerance::DEFAULT_ANGULAR * scale.max(1.0)
        {
            return Err(SkeinError::Construction(
                "transform does not keep the arc circular".into(),
            ));
        }

        // Mirrors reverse the turning direction: keep the mapped axis and flip the sweep.
        let turn = unit_vector(x.cross(y))?;
        let (axis, sweep) = if transform.is_mirroring() {
            (-turn, -self.sweep)
        } else {
            (turn, self.sweep)
        };
        let moved = Self::new(
            transform.transform_point(self.center),
            axis,
            transform.transform_point(self.start),
            sweep,
        )?;
        Ok(Self {
            trim: self.trim,
            usage: self.usage.clone(),
            ..moved
        })
    }

    fn trimmed(&self, range: TrimRange) -> Self {
        Self {
            trim: range,
            ..self.clone()
        }
    }

    fn with_usage(&self, usage: Usage) -> Self {
        Self {
            usage,
            ..self.clone()
        }
    }
}

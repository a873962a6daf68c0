//! Line segment curve.

use serde::{Deserialize, Serialize};
use skein_core::{ensure_positive, Relation, Result, SkeinError, Tolerance};
use skein_math::{Aabb3, Line, Plane, Point3, PointExt, Transform, Vector3};

use super::{clamp_to_trim, ClosestPoint, Curve, IntersectionPoint};
use crate::trim::TrimRange;
use crate::usage::Usage;

/// A straight segment from `start` to `end`, parameterized over `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    start: Point3,
    end: Point3,
    trim: TrimRange,
    usage: Usage,
}

impl LineSegment {
    pub fn new(start: Point3, end: Point3) -> Result<Self> {
        if start.coincident(end) {
            return Err(SkeinError::Construction(format!(
                "segment endpoints coincide at {start}"
            )));
        }
        Ok(Self {
            start,
            end,
            trim: TrimRange::FULL,
            usage: Usage::default(),
        })
    }

    /// Untrimmed start point.
    pub fn start(&self) -> Point3 {
        self.start
    }

    /// Untrimmed end point.
    pub fn end(&self) -> Point3 {
        self.end
    }

    /// Vector from `start` to `end`.
    pub fn direction(&self) -> Vector3 {
        self.end - self.start
    }

    /// The unbounded line carrying this segment.
    pub fn supporting_line(&self) -> Result<Line> {
        Line::through(self.start, self.end)
    }
}

impl Curve for LineSegment {
    fn usage(&self) -> &Usage {
        &self.usage
    }

    fn trim_range(&self) -> TrimRange {
        self.trim
    }

    fn evaluate(&self, t: f64) -> Point3 {
        self.start + t * (self.end - self.start)
    }

    fn derivative(&self, _t: f64) -> Vector3 {
        self.end - self.start
    }

    fn length(&self) -> f64 {
        self.direction().length() * self.trim.span()
    }

    fn bounding_box(&self) -> Aabb3 {
        Aabb3::from_corners(self.one_end(), self.other_end())
    }

    fn plane(&self) -> Option<Plane> {
        None
    }

    fn approximate(&self, tolerance: f64) -> Result<Vec<Point3>> {
        ensure_positive("tolerance", tolerance)?;
        Ok(vec![self.one_end(), self.other_end()])
    }

    fn intersect(&self, line: &Line, accuracy: f64) -> Result<Vec<IntersectionPoint>> {
        ensure_positive("accuracy", accuracy)?;

        let along = self.direction();
        let normal = along.cross(line.direction());
        if normal.length() < Tolerance::DEFAULT_ANGULAR * along.length() {
            if line.contains_point(self.one_end()) && line.contains_point(self.other_end()) {
                return Err(SkeinError::relationship(
                    Relation::Coincident,
                    "probing line runs along the segment",
                ));
            }
            return Ok(Vec::new());
        }

        // Skew lines never meet.
        let between = line.origin() - self.start;
        if between.dot(normal.normalize()).abs() > accuracy {
            return Ok(Vec::new());
        }

        let s = between.cross(line.direction()).dot(normal) / normal.length_squared();
        let hit = clamp_to_trim(self.trim, s, accuracy / along.length()).map(|param| {
            IntersectionPoint {
                point: self.evaluate(param),
                param,
            }
        });
        Ok(hit.into_iter().collect())
    }

    fn closest_point(&self, target: Point3) -> Result<Option<ClosestPoint>> {
        let along = self.direction();
        let raw = (target - self.start).dot(along) / along.length_squared();
        let param = raw.clamp(self.trim.lower(), self.trim.upper());
        let point = self.evaluate(param);
        Ok(Some(ClosestPoint {
            point,
            param,
            distance: point.distance(target),
        }))
    }

    fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            trim: self.trim.reversed(),
            usage: self.usage.clone(),
        }
    }

    fn transformed(&self, transform: &Transform) -> Result<Self> {
        let moved = Self::new(
            transform.transform_point(self.start),
            transform.transform_point(self.end),
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

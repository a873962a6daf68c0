//! Polyline approximation of curves.

use skein_core::{ensure_positive, Result, SkeinError};
use skein_math::point::chord_deviation;
use skein_math::Point3;

use crate::curve::Curve;

/// Points sampled strictly inside a chord when measuring its crown.
pub const CROWN_SAMPLES: usize = 20;

/// Halvings of the trial step before giving up on a chord.
pub const STEP_MAX_HALVINGS: usize = 16;

/// Convert a curve to a polyline whose chords stay within `tolerance`.
///
/// Walks the trim range from its lower bound, taking the longest step
/// [`find_step`] accepts each time. The first and last points are the trim
/// ends of the curve.
pub fn approximate<C: Curve + ?Sized>(curve: &C, tolerance: f64) -> Result<Vec<Point3>> {
    ensure_positive("tolerance", tolerance)?;

    let range = curve.trim_range();
    let mut t = range.lower();
    let mut points = vec![curve.evaluate(t)];
    while t < range.upper() {
        t = find_step(curve, t, range.upper(), tolerance)?;
        points.push(curve.evaluate(t));
    }
    log::trace!("approximated curve with {} points", points.len());
    Ok(points)
}

/// Largest parameter in `(from, to]` whose chord from `from` has a crown within `tolerance`.
///
/// The trial end starts at `to` and the step halves on each rejection.
pub fn find_step<C: Curve + ?Sized>(curve: &C, from: f64, to: f64, tolerance: f64) -> Result<f64> {
    let mut end = to;
    for _ in 0..=STEP_MAX_HALVINGS {
        if crown(curve, from, end) <= tolerance {
            return Ok(end);
        }
        end = from + 0.5 * (end - from);
    }
    log::debug!("no chord from t={from} fits within {tolerance}");
    Err(SkeinError::Convergence {
        search: "approximation step",
        iterations: STEP_MAX_HALVINGS,
    })
}

/// Largest deviation of the curve from the chord between `from` and `to`.
pub fn crown<C: Curve + ?Sized>(curve: &C, from: f64, to: f64) -> f64 {
    let start = curve.evaluate(from);
    let end = curve.evaluate(to);
    let step = (to - from) / (CROWN_SAMPLES + 1) as f64;
    (1..=CROWN_SAMPLES)
        .map(|i| chord_deviation(curve.evaluate(from + step * i as f64), start, end))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{CircularArc, CubicCurve, LineSegment};
    use crate::trim::TrimRange;
    use approx::assert_abs_diff_eq;
    use skein_math::{dvec3, PointExt, Vector3};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

    fn quarter() -> CircularArc {
        CircularArc::new(Point3::ZERO, Vector3::Z, dvec3(1.0, 0.0, 0.0), FRAC_PI_2).unwrap()
    }

    #[test]
    fn test_crown_of_quarter_circle_is_sagitta() {
        let arc = quarter();
        // 1 - cos(pi/4)
        assert_abs_diff_eq!(crown(&arc, 0.0, 1.0), 1.0 - FRAC_PI_4.cos(), epsilon = 5e-3);
    }

    #[test]
    fn test_approximation_ends_at_trim_ends() {
        let arc = quarter().trimmed(TrimRange::new(0.1, 0.8).unwrap());
        let points = approximate(&arc, 1e-3).unwrap();
        assert!(points.first().unwrap().coincident(arc.one_end()));
        assert!(points.last().unwrap().coincident(arc.other_end()));
    }

    #[test]
    fn test_chords_respect_tolerance() {
        let arc = quarter();
        let tolerance = 1e-3;
        let points = approximate(&arc, tolerance).unwrap();
        for pair in points.windows(2) {
            // Chord midpoints of a unit circle sit at most `tolerance` inside it.
            let mid = 0.5 * (pair[0] + pair[1]);
            assert!(1.0 - mid.length() <= tolerance + 1e-6);
        }
    }

    #[test]
    fn test_smaller_tolerance_never_yields_fewer_points() {
        let cubic = CubicCurve::bezier(
            Point3::ZERO,
            dvec3(1.0, 2.0, 0.0),
            dvec3(2.0, -2.0, 0.0),
            dvec3(3.0, 0.0, 0.0),
        )
        .unwrap();
        let mut previous = 0;
        for tolerance in [1e-1, 1e-2, 1e-3, 1e-4] {
            let count = approximate(&cubic, tolerance).unwrap().len();
            assert!(count >= previous, "{count} points at {tolerance}");
            previous = count;
        }
    }

    #[test]
    fn test_full_circle_is_split() {
        let circle = CircularArc::new(Point3::ZERO, Vector3::Z, dvec3(2.0, 0.0, 0.0), TAU).unwrap();
        let points = approximate(&circle, 1e-2).unwrap();
        assert!(points.len() > 4);
        assert!(points.first().unwrap().coincident(*points.last().unwrap()));
    }

    #[test]
    fn test_rejects_bad_tolerance_and_reports_exhaustion() {
        let seg = LineSegment::new(Point3::ZERO, Vector3::X).unwrap();
        assert!(matches!(approximate(&seg, 0.0), Err(SkeinError::Tolerance(_))));

        let err = approximate(&quarter(), 1e-15).unwrap_err();
        assert!(matches!(
            err,
            SkeinError::Convergence { iterations: STEP_MAX_HALVINGS, .. }
        ));
    }
}

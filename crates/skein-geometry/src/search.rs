//! Bounded numerical searches over a curve's parameter range.
//!
//! Curves without a closed form for line intersection or closest point share
//! these two slice-and-refine searches. Each search runs as an explicit loop
//! with one named level budget; running out of levels is reported as
//! [`SkeinError::Convergence`], never as "nothing found".

use skein_core::{Result, SkeinError, Tolerance};
use skein_math::{Line, Point3, PointExt};

use crate::curve::{ClosestPoint, IntersectionPoint};
use crate::trim::{split, TrimRange};

/// Initial slices scanned for sign changes of the line offset.
pub const INTERSECTION_SLICES: usize = 100;
/// Children per refinement level of an intersection candidate.
pub const INTERSECTION_SPLIT: usize = 5;
/// Refinement levels before an intersection candidate is declared non-convergent.
pub const INTERSECTION_MAX_LEVELS: usize = 8;

/// Initial slices ranked by distance to the target.
pub const CLOSEST_SLICES: usize = 40;
/// Children per refinement level of the winning slice.
pub const CLOSEST_SPLIT: usize = 5;
/// Refinement levels before the closest-point search gives up.
pub const CLOSEST_MAX_LEVELS: usize = 8;

/// A pending slice of the intersection search.
struct Candidate {
    lo: f64,
    hi: f64,
    level: usize,
}

/// Find every crossing of `line` with the curve `eval` over `range`.
///
/// A slice is a candidate when the perpendicular offsets of its two ends
/// point in opposite directions (or one vanishes). Candidates are split and
/// retested until their chord is shorter than `accuracy`.
pub(crate) fn bracket_crossings<F>(
    eval: F,
    range: TrimRange,
    line: &Line,
    accuracy: f64,
) -> Result<Vec<IntersectionPoint>>
where
    F: Fn(f64) -> Point3,
{
    let straddles = |lo: f64, hi: f64| {
        line.offset_of(eval(lo)).dot(line.offset_of(eval(hi))) <= 0.0
    };
    let on_line = |p: Point3| line.distance_to_point(p) <= accuracy * 1e-3;

    let mut pending: Vec<Candidate> = range
        .slices(INTERSECTION_SLICES)
        .filter(|&(lo, hi)| straddles(lo, hi))
        .map(|(lo, hi)| Candidate { lo, hi, level: 0 })
        .collect();
    log::trace!("{} intersection candidates over {range:?}", pending.len());

    let mut hits = Vec::new();
    while let Some(Candidate { lo, hi, level }) = pending.pop() {
        let (start, end) = (eval(lo), eval(hi));
        if on_line(start) {
            hits.push(IntersectionPoint { point: start, param: lo });
            continue;
        }
        if on_line(end) {
            hits.push(IntersectionPoint { point: end, param: hi });
            continue;
        }
        if start.distance(end) < accuracy {
            let param = 0.5 * (lo + hi);
            let point = eval(param);
            // Non-planar curves can swing around the line without touching it.
            if line.distance_to_point(point) <= accuracy {
                hits.push(IntersectionPoint { point, param });
            }
            continue;
        }
        if level >= INTERSECTION_MAX_LEVELS {
            log::debug!("intersection refinement stalled on [{lo}, {hi}]");
            return Err(SkeinError::Convergence {
                search: "curve/line intersection",
                iterations: INTERSECTION_MAX_LEVELS,
            });
        }
        pending.extend(
            split(lo, hi, INTERSECTION_SPLIT)
                .filter(|&(a, b)| straddles(a, b))
                .map(|(a, b)| Candidate { lo: a, hi: b, level: level + 1 }),
        );
    }

    hits.sort_by(|a, b| a.param.total_cmp(&b.param));
    // Shared slice ends and neighbouring slices can report the same crossing.
    hits.dedup_by(|later, earlier| later.point.coincident_within(earlier.point, accuracy));
    Ok(hits)
}

/// Locate the point of the curve `eval` nearest to `target` over `range`.
///
/// Slices whose midpoint lies farther than a quarter of `length` are pruned;
/// when nothing survives the target is reported as far from the curve.
pub(crate) fn refine_closest<F>(
    eval: F,
    range: TrimRange,
    target: Point3,
    length: f64,
) -> Result<Option<ClosestPoint>>
where
    F: Fn(f64) -> Point3,
{
    let rank = |(lo, hi): (f64, f64)| {
        let mid = 0.5 * (lo + hi);
        (lo, hi, eval(mid).distance(target))
    };
    let nearest = |slices: Vec<(f64, f64, f64)>| {
        slices
            .into_iter()
            .min_by(|a, b| a.2.total_cmp(&b.2))
    };

    let cutoff = 0.25 * length;
    let survivors: Vec<_> = range
        .slices(CLOSEST_SLICES)
        .map(rank)
        .filter(|&(_, _, distance)| distance < cutoff)
        .collect();
    let Some((mut lo, mut hi, _)) = nearest(survivors) else {
        return Ok(None);
    };

    let mut level = 0;
    loop {
        let (start, end) = (eval(lo), eval(hi));
        let chord = end - start;
        if chord.length() < Tolerance::DEFAULT_LINEAR {
            // Settle on the target's foot along the final chord.
            let along = if chord.length_squared() > 0.0 {
                ((target - start).dot(chord) / chord.length_squared()).clamp(0.0, 1.0)
            } else {
                0.5
            };
            let param = lo + along * (hi - lo);
            let point = eval(param);
            return Ok(Some(ClosestPoint {
                point,
                param,
                distance: point.distance(target),
            }));
        }
        if level == CLOSEST_MAX_LEVELS {
            log::debug!("closest-point refinement stalled on [{lo}, {hi}]");
            return Err(SkeinError::Convergence {
                search: "closest point refinement",
                iterations: CLOSEST_MAX_LEVELS,
            });
        }
        let children: Vec<_> = split(lo, hi, CLOSEST_SPLIT).map(rank).collect();
        if let Some((a, b, _)) = nearest(children) {
            lo = a;
            hi = b;
        }
        level += 1;
    }
}

//! Shared math for curves stored as per-axis polynomial coefficients.
//!
//! Coefficients are kept in ascending power: `p(t) = c0 + c1 t + c2 t^2 + ...`.

use skein_core::Tolerance;
use skein_math::{Aabb3, Plane, Point3, Transform, Vector3};

use crate::trim::TrimRange;

/// Intervals of the composite Simpson rule used for arc length (even).
const LENGTH_INTERVALS: usize = 64;

pub(crate) fn evaluate(coeffs: &[Vector3], t: f64) -> Point3 {
    coeffs
        .iter()
        .rev()
        .fold(Vector3::ZERO, |acc, c| acc * t + *c)
}

pub(crate) fn derivative(coeffs: &[Vector3], t: f64) -> Vector3 {
    coeffs
        .iter()
        .enumerate()
        .skip(1)
        .rev()
        .fold(Vector3::ZERO, |acc, (power, c)| acc * t + *c * power as f64)
}

/// Rewrite the coefficients for the substitution `t -> 1 - t`.
pub(crate) fn reverse(coeffs: &mut [Vector3]) {
    let original = coeffs.to_vec();
    for (j, slot) in coeffs.iter_mut().enumerate() {
        let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
        *slot = original
            .iter()
            .enumerate()
            .skip(j)
            .fold(Vector3::ZERO, |acc, (i, c)| acc + *c * binomial(i, j))
            * sign;
    }
}

/// Apply an affine transform: the constant term is a point, the rest are vectors.
pub(crate) fn transform(coeffs: &mut [Vector3], transform: &Transform) {
    for (i, c) in coeffs.iter_mut().enumerate() {
        *c = if i == 0 {
            transform.transform_point(*c)
        } else {
            transform.transform_vector(*c)
        };
    }
}

fn binomial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Length of the curve over the trim range (composite Simpson on `|p'(t)|`).
pub(crate) fn arc_length(coeffs: &[Vector3], range: TrimRange) -> f64 {
    let h = range.span() / LENGTH_INTERVALS as f64;
    let speed = |i: usize| derivative(coeffs, range.lower() + h * i as f64).length();

    let mut sum = speed(0) + speed(LENGTH_INTERVALS);
    for i in 1..LENGTH_INTERVALS {
        sum += if i % 2 == 1 { 4.0 } else { 2.0 } * speed(i);
    }
    sum * h / 3.0
}

/// Real roots of `a t^2 + b t + c`, degrading to the linear case.
pub(crate) fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    const ZERO: f64 = 1e-14;
    if a.abs() < ZERO {
        if b.abs() < ZERO {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        Vec::new()
    } else if disc == 0.0 {
        vec![-b / (2.0 * a)]
    } else {
        let root = disc.sqrt();
        vec![(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
    }
}

/// Parameters where some coordinate reaches a local extreme.
///
/// Supports up to cubic curves, whose derivatives are at most quadratic.
pub(crate) fn critical_params(coeffs: &[Vector3]) -> Vec<f64> {
    let deriv = |power: usize, axis: usize| -> f64 {
        coeffs
            .get(power + 1)
            .map_or(0.0, |c| c[axis] * (power + 1) as f64)
    };
    (0..3)
        .flat_map(|axis| quadratic_roots(deriv(2, axis), deriv(1, axis), deriv(0, axis)))
        .collect()
}

pub(crate) fn bounding_box(coeffs: &[Vector3], range: TrimRange) -> Aabb3 {
    let ends = Aabb3::from_corners(
        evaluate(coeffs, range.lower()),
        evaluate(coeffs, range.upper()),
    );
    critical_params(coeffs)
        .into_iter()
        .filter(|&t| t > range.lower() && t < range.upper())
        .fold(ends, |bounds, t| bounds.include_point(evaluate(coeffs, t)))
}

/// Plane containing the curve, if the non-constant coefficients are coplanar.
pub(crate) fn plane(coeffs: &[Vector3]) -> Option<Plane> {
    let spans = &coeffs[1..];
    let normal = spans.iter().enumerate().find_map(|(i, a)| {
        spans[i + 1..].iter().find_map(|b| {
            let n = a.cross(*b);
            (n.length() > Tolerance::DEFAULT_ANGULAR * a.length() * b.length()).then_some(n)
        })
    })?;
    let unit = normal.normalize();
    let flat = spans
        .iter()
        .all(|c| c.dot(unit).abs() <= Tolerance::DEFAULT_ANGULAR * c.length());
    if flat {
        Plane::new(coeffs[0], unit).ok()
    } else {
        None
    }
}

//! Usable sub-interval of a curve's `[0, 1]` parameter domain.

use serde::{Deserialize, Serialize};
use skein_core::{Result, SkeinError};

/// Slack allowed when checking a parameter against the range bounds.
const PARAM_SLACK: f64 = 1e-12;

/// Sub-interval `[lower, upper]` of `[0, 1]` with `lower < upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimRange {
    lower: f64,
    upper: f64,
}

impl TrimRange {
    pub const FULL: TrimRange = TrimRange {
        lower: 0.0,
        upper: 1.0,
    };

    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&lower) || !(0.0..=1.0).contains(&upper) || lower >= upper {
            return Err(SkeinError::Construction(format!(
                "trim range [{lower}, {upper}] must satisfy 0 <= lower < upper <= 1"
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.lower + self.upper)
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.lower - PARAM_SLACK && t <= self.upper + PARAM_SLACK
    }

    /// Domain check for a parameter handed to a curve.
    pub fn check(&self, t: f64) -> Result<()> {
        if self.contains(t) {
            Ok(())
        } else {
            Err(SkeinError::ParameterRange {
                param: t,
                lower: self.lower,
                upper: self.upper,
            })
        }
    }

    /// The same interval seen from a curve whose parameter runs backwards.
    pub fn reversed(&self) -> Self {
        Self {
            lower: 1.0 - self.upper,
            upper: 1.0 - self.lower,
        }
    }

    pub fn with_lower(&self, lower: f64) -> Result<Self> {
        self.check(lower)?;
        Self::new(lower, self.upper)
    }

    pub fn with_upper(&self, upper: f64) -> Result<Self> {
        self.check(upper)?;
        Self::new(self.lower, upper)
    }

    /// `count` equal slices covering the range, as `(lo, hi)` pairs.
    pub fn slices(&self, count: usize) -> impl Iterator<Item = (f64, f64)> {
        split(self.lower, self.upper, count)
    }
}

impl Default for TrimRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Split `[lo, hi]` into `count` equal pieces.
pub(crate) fn split(lo: f64, hi: f64, count: usize) -> impl Iterator<Item = (f64, f64)> {
    let step = (hi - lo) / count as f64;
    (0..count).map(move |i| {
        let a = lo + step * i as f64;
        let b = if i + 1 == count { hi } else { lo + step * (i + 1) as f64 };
        (a, b)
    })
}

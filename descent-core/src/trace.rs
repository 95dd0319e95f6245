//! Curve sampling for the renderer contract.
//!
//! The core hands a renderer plain `[x, y]` pairs: the static objective
//! curve sampled across the domain, plus whatever model curve a trainer
//! exposes. Pixels, canvases, and chart styling stay on the other side of
//! this boundary.

use std::ops::RangeInclusive;

use crate::{problem::DescentProblem, scalar::ScalarProblem};

/// Default sampling increment along x.
pub const DEFAULT_STEP: f64 = 0.1;

/// Samples `(x, f(x))` across `range` at a fixed increment.
///
/// Points are generated by index rather than by accumulating `x`, so the
/// right edge is included instead of being lost to float drift.
/// Returns an empty vector for a non-positive or non-finite increment or an
/// empty range.
pub fn sample_fn(
    range: &RangeInclusive<f64>,
    step: f64,
    f: impl Fn(f64) -> f64,
) -> Vec<[f64; 2]> {
    let (start, end) = (*range.start(), *range.end());
    if !step.is_finite() || step <= 0.0 || !start.is_finite() || !end.is_finite() || start > end {
        return Vec::new();
    }

    let count = ((end - start) / step + 1e-9).floor() as usize;
    (0..=count)
        .map(|i| {
            let x = start + i as f64 * step;
            [x, f(x)]
        })
        .collect()
}

/// Samples the objective curve of a scalar problem across its domain.
pub fn sample_curve(problem: &ScalarProblem, step: f64) -> Vec<[f64; 2]> {
    sample_fn(problem.domain(), step, |x| problem.objective(&x))
}

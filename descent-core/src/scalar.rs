use std::ops::RangeInclusive;

use thiserror::Error;

use crate::problem::{DescentProblem, Goal};

/// A single-variable problem with an exact derivative.
///
/// The objective and its derivative are plain function pointers, which keeps
/// level definitions `'static` data.
/// A run fails when its parameter leaves `domain` and succeeds when it comes
/// within `tolerance` of `target`.
#[derive(Debug, Clone)]
pub struct ScalarProblem {
    objective: fn(f64) -> f64,
    derivative: fn(f64) -> f64,
    domain: RangeInclusive<f64>,
    target: f64,
    tolerance: f64,
    max_steps: usize,
}

/// Errors raised when constructing an invalid [`ScalarProblem`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScalarProblemError {
    #[error("domain bound is not finite: {value}")]
    NonFiniteBound { value: f64 },

    #[error("domain is empty: {start} > {end}")]
    EmptyDomain { start: f64, end: f64 },

    #[error("tolerance must be finite and positive, got {tolerance}")]
    InvalidTolerance { tolerance: f64 },

    #[error("target {target} lies outside the domain [{start}, {end}]")]
    TargetOutsideDomain {
        target: f64,
        start: f64,
        end: f64,
    },

    #[error("step budget must be nonzero")]
    ZeroStepBudget,
}

impl ScalarProblem {
    /// Creates a validated scalar problem.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is non-finite or empty, the tolerance
    /// is not positive, the target lies outside the domain, or the step
    /// budget is zero.
    pub fn new(
        objective: fn(f64) -> f64,
        derivative: fn(f64) -> f64,
        domain: RangeInclusive<f64>,
        target: f64,
        tolerance: f64,
        max_steps: usize,
    ) -> Result<Self, ScalarProblemError> {
        let (start, end) = (*domain.start(), *domain.end());

        for value in [start, end] {
            if !value.is_finite() {
                return Err(ScalarProblemError::NonFiniteBound { value });
            }
        }
        if start > end {
            return Err(ScalarProblemError::EmptyDomain { start, end });
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ScalarProblemError::InvalidTolerance { tolerance });
        }
        if !domain.contains(&target) {
            return Err(ScalarProblemError::TargetOutsideDomain { target, start, end });
        }
        if max_steps == 0 {
            return Err(ScalarProblemError::ZeroStepBudget);
        }

        Ok(Self {
            objective,
            derivative,
            domain,
            target,
            tolerance,
            max_steps,
        })
    }

    pub fn domain(&self) -> &RangeInclusive<f64> {
        &self.domain
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Maps a unit-interval fraction onto the domain.
    ///
    /// `start_at(0.0)` is the left edge and `start_at(1.0)` the right;
    /// fractions outside the unit interval are clamped.
    #[must_use]
    pub fn start_at(&self, fraction: f64) -> f64 {
        let (start, end) = (*self.domain.start(), *self.domain.end());
        start + (end - start) * fraction.clamp(0.0, 1.0)
    }
}

impl DescentProblem for ScalarProblem {
    type Params = f64;

    fn objective(&self, params: &f64) -> f64 {
        (self.objective)(*params)
    }

    fn gradient(&self, params: &f64) -> f64 {
        (self.derivative)(*params)
    }

    fn max_steps(&self) -> usize {
        self.max_steps
    }

    fn goal(&self) -> Option<Goal<f64>> {
        Some(Goal {
            target: self.target,
            tolerance: self.tolerance,
        })
    }

    fn contains(&self, params: &f64) -> bool {
        self.domain.contains(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn parabola(x: f64) -> f64 {
        x * x + 0.5
    }

    fn parabola_slope(x: f64) -> f64 {
        2.0 * x
    }

    fn valley() -> Result<ScalarProblem, ScalarProblemError> {
        ScalarProblem::new(parabola, parabola_slope, -5.0..=5.0, 0.0, 0.1, 30)
    }

    #[test]
    fn valid_problem_exposes_its_goal_and_domain() {
        let problem = valley().unwrap();

        let goal = problem.goal().unwrap();
        assert_relative_eq!(goal.target, 0.0);
        assert_relative_eq!(goal.tolerance, 0.1);
        assert!(problem.contains(&5.0));
        assert!(!problem.contains(&5.1));
        assert_relative_eq!(problem.gradient(&2.0), 4.0);
    }

    #[test]
    fn start_at_interpolates_and_clamps() {
        let problem = valley().unwrap();

        assert_relative_eq!(problem.start_at(0.0), -5.0);
        assert_relative_eq!(problem.start_at(0.7), 2.0, epsilon = 1e-12);
        assert_relative_eq!(problem.start_at(1.0), 5.0);
        assert_relative_eq!(problem.start_at(2.0), 5.0);
    }

    #[test]
    fn rejects_non_finite_bounds() {
        let result = ScalarProblem::new(parabola, parabola_slope, f64::NAN..=5.0, 0.0, 0.1, 30);
        assert!(matches!(
            result,
            Err(ScalarProblemError::NonFiniteBound { .. })
        ));
    }

    #[test]
    fn rejects_empty_domain() {
        let result = ScalarProblem::new(parabola, parabola_slope, 5.0..=-5.0, 0.0, 0.1, 30);
        assert!(matches!(result, Err(ScalarProblemError::EmptyDomain { .. })));
    }

    #[test]
    fn rejects_non_positive_tolerance() {
        let result = ScalarProblem::new(parabola, parabola_slope, -5.0..=5.0, 0.0, 0.0, 30);
        assert!(matches!(
            result,
            Err(ScalarProblemError::InvalidTolerance { .. })
        ));
    }

    #[test]
    fn rejects_target_outside_domain() {
        let result = ScalarProblem::new(parabola, parabola_slope, -5.0..=5.0, 6.0, 0.1, 30);
        assert!(matches!(
            result,
            Err(ScalarProblemError::TargetOutsideDomain { .. })
        ));
    }

    #[test]
    fn rejects_zero_step_budget() {
        let result = ScalarProblem::new(parabola, parabola_slope, -5.0..=5.0, 0.0, 0.1, 0);
        assert_eq!(result.unwrap_err(), ScalarProblemError::ZeroStepBudget);
    }
}

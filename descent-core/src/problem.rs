use crate::params::Parameters;

/// The win condition of a problem that has one.
///
/// A run succeeds once its parameters come within `tolerance` of `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal<P> {
    pub target: P,
    pub tolerance: f64,
}

/// Defines a descent problem to be stepped.
///
/// A problem pairs an objective with its gradient rule: an exact derivative
/// for single-variable problems, or a batch (sub)gradient over a fixed
/// dataset for the trainer variants.
pub trait DescentProblem {
    type Params: Parameters;

    /// Cost at the given parameters.
    fn objective(&self, params: &Self::Params) -> f64;

    /// Gradient (or subgradient) of the objective at the given parameters.
    fn gradient(&self, params: &Self::Params) -> Self::Params;

    /// Step budget for a run; reaching it without success fails the run.
    fn max_steps(&self) -> usize;

    /// Win condition, if the problem has one.
    ///
    /// The trainer variants return `None`: they have no target and terminate
    /// only by budget or an explicit stop.
    fn goal(&self) -> Option<Goal<Self::Params>> {
        None
    }

    /// Whether the parameters remain inside the valid domain.
    ///
    /// Defaults to `true` for unconstrained problems.
    fn contains(&self, _params: &Self::Params) -> bool {
        true
    }
}

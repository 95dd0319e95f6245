use crate::{params::Parameters, problem::DescentProblem};

/// A recorded parameter state with its objective value.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit<P> {
    pub params: P,
    pub objective: f64,
}

/// Classification of a run after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Neither termination condition has triggered yet.
    InProgress,
    /// The parameters came within tolerance of the problem's goal.
    Succeeded,
    /// The run ended without reaching the goal.
    Failed(Failure),
}

/// Why a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The step budget was exhausted before reaching the goal.
    StepBudgetExhausted,
    /// The parameters left the problem's valid domain.
    LeftDomain,
}

/// Mutable state of one optimization run.
///
/// Exactly one state is live per run.
/// It is created when the run starts, advanced by [`step`] once per tick,
/// and discarded on reset; the step count only returns to zero by
/// constructing a fresh state.
#[derive(Debug, Clone)]
pub struct OptimizerState<P> {
    params: P,
    learning_rate: f64,
    step_count: usize,
    history: Vec<Visit<P>>,
}

impl<P: Parameters> OptimizerState<P> {
    /// Starts a run at the given parameters.
    ///
    /// The start state is recorded as the first history entry before any
    /// step is applied.
    pub fn new(problem: &impl DescentProblem<Params = P>, start: P, learning_rate: f64) -> Self {
        let objective = problem.objective(&start);
        Self {
            params: start.clone(),
            learning_rate,
            step_count: 0,
            history: vec![Visit {
                params: start,
                objective,
            }],
        }
    }

    /// Current parameters.
    pub fn params(&self) -> &P {
        &self.params
    }

    /// Number of steps applied so far.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    #[must_use]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Adjusts the learning rate; takes effect on the next step.
    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    /// Every visited state in order, starting with the run's initial
    /// parameters.
    pub fn history(&self) -> &[Visit<P>] {
        &self.history
    }

    /// The most recent visit.
    ///
    /// # Panics
    ///
    /// Panics if the history is empty, which is impossible after
    /// construction via [`OptimizerState::new`].
    pub fn latest(&self) -> &Visit<P> {
        self.history.last().unwrap()
    }
}

/// Advances the run by exactly one step and classifies the result.
///
/// Computes the gradient at the current parameters, applies
/// `params − learning_rate · gradient`, records the visit, and checks
/// termination.
/// The success check runs before the budget check, so a step that reaches
/// the goal while exhausting the budget still succeeds.
pub fn step<P>(problem: &P, state: &mut OptimizerState<P::Params>) -> Outcome
where
    P: DescentProblem,
{
    let gradient = problem.gradient(&state.params);
    let next = state.params.descend(&gradient, state.learning_rate);
    let objective = problem.objective(&next);

    state.history.push(Visit {
        params: next.clone(),
        objective,
    });
    state.params = next;
    state.step_count += 1;

    if let Some(goal) = problem.goal() {
        if state.params.distance(&goal.target) < goal.tolerance {
            return Outcome::Succeeded;
        }
    }

    if state.step_count >= problem.max_steps() {
        return Outcome::Failed(Failure::StepBudgetExhausted);
    }

    if !problem.contains(&state.params) {
        return Outcome::Failed(Failure::LeftDomain);
    }

    Outcome::InProgress
}

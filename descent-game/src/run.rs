use descent_core::{DescentProblem, Failure, OptimizerState, Outcome, step};
use thiserror::Error;

use crate::observe::Observer;

/// Learning rate a fresh run starts with unless the caller adjusts it.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Phase of the run state machine.
///
/// `Succeeded` and `Failed` are terminal: leaving them requires an explicit
/// [`RunController::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Succeeded,
    Failed(Failure),
}

/// Errors raised by run control commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("a run can only start from idle (current phase: {phase:?})")]
    NotIdle { phase: Phase },
}

/// Control actions an observer may request during a run.
pub enum Action {
    /// Abandon the run and return to idle.
    Stop,
}

/// Tick event emitted to observers after each applied step.
pub struct TickEvent<'a, P> {
    /// Steps applied so far in this run.
    pub step: usize,
    /// Parameters after the step.
    pub params: &'a P,
    /// Objective value after the step.
    pub objective: f64,
    /// Classification of the run after the step.
    pub outcome: Outcome,
}

/// Drives one problem's runs at the caller's cadence.
///
/// The controller owns the problem and at most one live
/// [`OptimizerState`]; an external scheduler calls [`tick`] at whatever
/// cadence it likes, and cancellation is simply ceasing to tick.
///
/// Start parameters edited while a run is live are deferred until the next
/// reset; learning-rate edits apply to the very next step.
///
/// [`tick`]: RunController::tick
#[derive(Debug)]
pub struct RunController<P: DescentProblem> {
    problem: P,
    phase: Phase,
    state: Option<OptimizerState<P::Params>>,
    learning_rate: f64,
    start_params: P::Params,
    pending_start: Option<P::Params>,
}

impl<P: DescentProblem> RunController<P> {
    /// Creates an idle controller for the given problem.
    pub fn new(problem: P, start_params: P::Params) -> Self {
        Self {
            problem,
            phase: Phase::Idle,
            state: None,
            learning_rate: DEFAULT_LEARNING_RATE,
            start_params,
            pending_start: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// The live run's state, if a run has started and not been reset.
    pub fn state(&self) -> Option<&OptimizerState<P::Params>> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Adjusts the learning rate; applies to the next step of a live run.
    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
        if let Some(state) = self.state.as_mut() {
            state.set_learning_rate(learning_rate);
        }
    }

    /// Parameters the next run will start from.
    pub fn start_params(&self) -> &P::Params {
        self.pending_start.as_ref().unwrap_or(&self.start_params)
    }

    /// Sets where the next run starts.
    ///
    /// While a run is live the edit is held back and only lands on the next
    /// reset, mirroring a start slider that is ignored mid-run.
    pub fn set_start_params(&mut self, params: P::Params) {
        if self.phase == Phase::Idle {
            self.start_params = params;
        } else {
            self.pending_start = Some(params);
        }
    }

    /// Starts a run from the current start parameters and learning rate.
    ///
    /// # Errors
    ///
    /// Returns an error unless the controller is idle.
    pub fn start(&mut self) -> Result<(), RunError> {
        if self.phase != Phase::Idle {
            return Err(RunError::NotIdle { phase: self.phase });
        }
        self.state = Some(OptimizerState::new(
            &self.problem,
            self.start_params.clone(),
            self.learning_rate,
        ));
        self.phase = Phase::Running;
        Ok(())
    }

    /// Applies one step if the run is live; otherwise does nothing.
    ///
    /// Returns the phase after the tick.
    pub fn tick(&mut self) -> Phase {
        self.tick_observed(&mut ())
    }

    /// Applies one step, emitting a [`TickEvent`] to the observer.
    ///
    /// An observer returning [`Action::Stop`] abandons a still-running run
    /// back to idle; terminal outcomes always take precedence.
    pub fn tick_observed<Obs>(&mut self, observer: &mut Obs) -> Phase
    where
        Obs: for<'a> Observer<TickEvent<'a, P::Params>, Action>,
    {
        if self.phase != Phase::Running {
            return self.phase;
        }
        let Some(state) = self.state.as_mut() else {
            return self.phase;
        };

        let outcome = step(&self.problem, state);
        let event = TickEvent {
            step: state.step_count(),
            params: state.params(),
            objective: state.latest().objective,
            outcome,
        };
        let action = observer.observe(&event);

        match outcome {
            Outcome::InProgress => {}
            Outcome::Succeeded => self.phase = Phase::Succeeded,
            Outcome::Failed(failure) => self.phase = Phase::Failed(failure),
        }

        if matches!(action, Some(Action::Stop)) && self.phase == Phase::Running {
            self.reset();
        }

        self.phase
    }

    /// Freezes the cadence without touching the run's state.
    ///
    /// Only a running run can pause; any other phase is left unchanged.
    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    /// Resumes a paused run.
    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
        }
    }

    /// Discards any live run and returns to idle.
    ///
    /// A deferred start-parameter edit lands here.
    pub fn reset(&mut self) {
        if let Some(params) = self.pending_start.take() {
            self.start_params = params;
        }
        self.state = None;
        self.phase = Phase::Idle;
    }
}

use thiserror::Error;

use descent_core::scalar::ScalarProblem;

use crate::{
    level::Catalog,
    progress::{GameProgress, ProgressError},
    run::{Phase, RunController},
};

/// Fraction of the domain the start slider sits at when a level opens.
const START_FRACTION: f64 = 0.7;

/// Result of recording a winning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub score: i64,
    pub stars: u8,
    pub steps: usize,
}

/// Errors raised by session commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown level id: {id}")]
    UnknownLevel { id: String },

    #[error("level is still locked: {id}")]
    LevelLocked { id: String },

    #[error("no level is selected")]
    NoActiveLevel,

    #[error("there is no level after {id}")]
    NoNextLevel { id: String },

    #[error("the active run has not succeeded")]
    RunNotWon,
}

impl From<ProgressError> for SessionError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::UnknownLevel { id } => Self::UnknownLevel { id },
        }
    }
}

/// One player's sitting with one game: a catalog, the player's progress,
/// and the run controller for the currently selected level.
///
/// The session is the seam between the pure core and the outside world: a
/// UI selects levels and ticks the active run at its own cadence, then asks
/// the session to record a win.
#[derive(Debug)]
pub struct GameSession {
    catalog: Catalog,
    progress: GameProgress,
    active: Option<ActiveLevel>,
}

#[derive(Debug)]
struct ActiveLevel {
    id: &'static str,
    controller: RunController<ScalarProblem>,
}

impl GameSession {
    #[must_use]
    pub fn new(catalog: Catalog, progress: GameProgress) -> Self {
        Self {
            catalog,
            progress,
            active: None,
        }
    }

    /// Opens a session with fresh progress.
    #[must_use]
    pub fn fresh(catalog: Catalog) -> Self {
        let progress = GameProgress::fresh(&catalog);
        Self::new(catalog, progress)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    /// Id of the currently selected level, if any.
    pub fn active_level(&self) -> Option<&'static str> {
        self.active.as_ref().map(|active| active.id)
    }

    /// The active level's run controller.
    pub fn controller(&mut self) -> Option<&mut RunController<ScalarProblem>> {
        self.active.as_mut().map(|active| &mut active.controller)
    }

    /// Selects an unlocked level and prepares an idle run for it.
    ///
    /// The start parameter is seeded partway up the domain, ready for the
    /// player to adjust before starting.
    ///
    /// # Errors
    ///
    /// Returns an error if the level does not exist or is still locked.
    pub fn select_level(&mut self, id: &str) -> Result<(), SessionError> {
        let level = self
            .catalog
            .get(id)
            .ok_or_else(|| SessionError::UnknownLevel { id: id.to_string() })?;
        if !self.progress.is_unlocked(id) {
            return Err(SessionError::LevelLocked { id: id.to_string() });
        }

        let start = level.problem.start_at(START_FRACTION);
        self.active = Some(ActiveLevel {
            id: level.id,
            controller: RunController::new(level.problem.clone(), start),
        });
        Ok(())
    }

    /// Moves the start slider to a fraction of the level's domain.
    ///
    /// The fraction is clamped, so the start position can never leave the
    /// domain. Mid-run edits are deferred until the next reset.
    ///
    /// # Errors
    ///
    /// Returns an error if no level is selected.
    pub fn set_start_fraction(&mut self, fraction: f64) -> Result<(), SessionError> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveLevel)?;
        let start = active.controller.problem().start_at(fraction);
        active.controller.set_start_params(start);
        Ok(())
    }

    /// Ticks the active run, if a level is selected.
    pub fn tick(&mut self) -> Option<Phase> {
        self.active
            .as_mut()
            .map(|active| active.controller.tick())
    }

    /// Records the active run's win into the player's progress.
    ///
    /// # Errors
    ///
    /// Returns an error if no level is selected or its run has not reached
    /// [`Phase::Succeeded`].
    pub fn complete(&mut self, elapsed_seconds: u64) -> Result<Completion, SessionError> {
        let active = self.active.as_ref().ok_or(SessionError::NoActiveLevel)?;
        if active.controller.phase() != Phase::Succeeded {
            return Err(SessionError::RunNotWon);
        }

        let steps = active
            .controller
            .state()
            .map_or(0, |state| state.step_count());
        let id = active.id;

        let stars = self
            .progress
            .complete_level(&self.catalog, id, steps, elapsed_seconds)?;
        let score = self
            .catalog
            .get(id)
            .map_or(0, |level| level.scoring.score(steps, elapsed_seconds));

        Ok(Completion {
            score,
            stars,
            steps,
        })
    }

    /// Advances to the next level in catalog order, if one exists and is
    /// unlocked.
    ///
    /// # Errors
    ///
    /// Returns an error if no level is selected, there is no next level, or
    /// the next level is still locked.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        let current = self.active_level().ok_or(SessionError::NoActiveLevel)?;
        let next = self
            .catalog
            .next_after(current)
            .ok_or_else(|| SessionError::NoNextLevel {
                id: current.to_string(),
            })?;
        let id = next.id;
        self.select_level(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::level::intro;

    #[test]
    fn locked_levels_cannot_be_selected() {
        let mut session = GameSession::fresh(intro());

        let result = session.select_level("right-direction");
        assert!(matches!(result, Err(SessionError::LevelLocked { .. })));

        let result = session.select_level("nope");
        assert!(matches!(result, Err(SessionError::UnknownLevel { .. })));
    }

    #[test]
    fn selecting_a_level_seeds_the_start_position() {
        let mut session = GameSession::fresh(intro());
        session.select_level("first-step").unwrap();

        // 70% of [-4, 4].
        let controller = session.controller().unwrap();
        assert_relative_eq!(*controller.start_params(), 1.6, epsilon = 1e-12);
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn start_slider_cannot_leave_the_domain() {
        let mut session = GameSession::fresh(intro());
        session.select_level("first-step").unwrap();

        session.set_start_fraction(0.5).unwrap();
        assert_relative_eq!(*session.controller().unwrap().start_params(), 0.0);

        session.set_start_fraction(5.0).unwrap();
        assert_relative_eq!(*session.controller().unwrap().start_params(), 4.0);
    }

    #[test]
    fn completing_without_a_win_is_rejected() {
        let mut session = GameSession::fresh(intro());
        assert_eq!(session.complete(0), Err(SessionError::NoActiveLevel));

        session.select_level("first-step").unwrap();
        assert_eq!(session.complete(0), Err(SessionError::RunNotWon));
    }
}

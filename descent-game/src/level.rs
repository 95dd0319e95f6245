//! Playable lessons and the ordered catalogs that gate them.

use rand::seq::IndexedRandom;
use thiserror::Error;

use descent_core::scalar::ScalarProblem;

use crate::score::ScoringPolicy;

/// One playable lesson: a scalar problem plus its presentation and scoring.
#[derive(Debug, Clone)]
pub struct Level {
    pub id: &'static str,
    pub name: &'static str,
    pub explanation: &'static str,
    pub hints: &'static [&'static str],
    pub problem: ScalarProblem,
    pub scoring: ScoringPolicy,
}

impl Level {
    /// Picks a hint for display.
    ///
    /// Display-only randomness; the stepper never consults it.
    pub fn random_hint<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Option<&'static str> {
        self.hints.choose(rng).copied()
    }
}

/// An ordered set of levels; the order drives unlock progression.
#[derive(Debug, Clone)]
pub struct Catalog {
    levels: Vec<Level>,
}

/// Errors raised when constructing an invalid [`Catalog`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one level")]
    Empty,

    #[error("duplicate level id: {id}")]
    DuplicateId { id: &'static str },
}

impl Catalog {
    /// Creates a catalog, checking that level ids are unique.
    ///
    /// # Errors
    ///
    /// Returns an error if `levels` is empty or two levels share an id.
    pub fn new(levels: Vec<Level>) -> Result<Self, CatalogError> {
        if levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, level) in levels.iter().enumerate() {
            if levels[..index].iter().any(|other| other.id == level.id) {
                return Err(CatalogError::DuplicateId { id: level.id });
            }
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn get(&self, id: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// The catalog's first level, unlocked from the start.
    pub fn first(&self) -> &Level {
        &self.levels[0]
    }

    /// The level after `id` in catalog order, if any.
    pub fn next_after(&self, id: &str) -> Option<&Level> {
        let index = self.levels.iter().position(|level| level.id == id)?;
        self.levels.get(index + 1)
    }
}

const INTRO_SCORING: ScoringPolicy = ScoringPolicy {
    ceiling: 1000,
    step_penalty: 50,
    time_penalty: 0,
    floor: 100,
    timed_stars: false,
};

const TUTORIAL_SCORING: ScoringPolicy = ScoringPolicy {
    ceiling: 1000,
    step_penalty: 10,
    time_penalty: 1,
    floor: 100,
    timed_stars: true,
};

fn half_square(x: f64) -> f64 {
    0.5 * x * x + 1.0
}

fn half_square_slope(x: f64) -> f64 {
    x
}

fn shifted_bowl(x: f64) -> f64 {
    0.3 * (x - 1.0) * (x - 1.0) + 0.5
}

fn shifted_bowl_slope(x: f64) -> f64 {
    0.6 * (x - 1.0)
}

fn quartic(x: f64) -> f64 {
    0.2 * x.powi(4) + 0.1 * x * x + 0.5
}

fn quartic_slope(x: f64) -> f64 {
    0.8 * x.powi(3) + 0.2 * x
}

fn wavy_bowl(x: f64) -> f64 {
    x.sin() + 0.1 * x * x
}

fn wavy_bowl_slope(x: f64) -> f64 {
    x.cos() + 0.2 * x
}

fn offset_parabola(x: f64) -> f64 {
    (x - 2.0) * (x - 2.0) + 1.0
}

fn offset_parabola_slope(x: f64) -> f64 {
    2.0 * (x - 2.0)
}

fn parabola(x: f64) -> f64 {
    x * x + 0.5
}

fn parabola_slope(x: f64) -> f64 {
    2.0 * x
}

fn noisy_volcano(x: f64) -> f64 {
    (x * 0.5).sin() * (x * 0.3).cos() + 0.05 * x * x + (x * 3.0).sin() * 0.1
}

fn noisy_volcano_slope(x: f64) -> f64 {
    0.5 * (x * 0.5).cos() * (x * 0.3).cos() - 0.3 * (x * 0.5).sin() * (x * 0.3).sin()
        + 0.1 * x
        + 0.3 * (x * 3.0).cos()
}

#[allow(clippy::too_many_arguments)]
fn level(
    id: &'static str,
    name: &'static str,
    explanation: &'static str,
    hints: &'static [&'static str],
    objective: fn(f64) -> f64,
    derivative: fn(f64) -> f64,
    domain: std::ops::RangeInclusive<f64>,
    target: f64,
    tolerance: f64,
    max_steps: usize,
    scoring: ScoringPolicy,
) -> Level {
    Level {
        id,
        name,
        explanation,
        hints,
        problem: ScalarProblem::new(objective, derivative, domain, target, tolerance, max_steps)
            .expect("built-in level definitions are valid"),
        scoring,
    }
}

/// The four introductory lessons: find the minimum of progressively harder
/// one-variable cost curves.
#[must_use]
pub fn intro() -> Catalog {
    Catalog::new(vec![
        level(
            "first-step",
            "First Step: What is a gradient?",
            "The gradient is the slope of a function. It tells you how fast \
             the value changes as you move. To find the lowest point, walk \
             in the direction opposite to the gradient.",
            &[
                "The gradient at x=2 is 2, so move to the left",
                "The farther from the center, the steeper the gradient",
                "The minimum sits at x=0, where the gradient is 0",
            ],
            half_square,
            half_square_slope,
            -4.0..=4.0,
            0.0,
            0.2,
            15,
            INTRO_SCORING,
        ),
        level(
            "right-direction",
            "Right Direction: Following the slope",
            "To minimize a function, always move opposite to the gradient. \
             A positive gradient means go left; a negative one means go \
             right.",
            &[
                "The minimum is not always at x=0",
                "Check which way the gradient points and go the other way",
                "When the gradient is positive you need to move left",
            ],
            shifted_bowl,
            shifted_bowl_slope,
            -3.0..=5.0,
            1.0,
            0.15,
            20,
            INTRO_SCORING,
        ),
        level(
            "perfect-pace",
            "Perfect Pace: Tuning the learning rate",
            "The learning rate controls how large your steps are. Too high \
             and you overshoot; too low and you crawl. Find the balance.",
            &[
                "This curve is steeper, so tune the learning rate carefully",
                "If the walk oscillates, lower the learning rate",
                "If progress is slow, raise the learning rate",
            ],
            quartic,
            quartic_slope,
            -2.5..=2.5,
            0.0,
            0.1,
            25,
            INTRO_SCORING,
        ),
        level(
            "many-valleys",
            "Many Valleys: Complex landscapes",
            "Real cost functions can have several local minima. Where you \
             start decides which valley you end up in.",
            &[
                "There is more than one valley in this curve",
                "The starting point matters a lot here",
                "Try different starting positions",
            ],
            wavy_bowl,
            wavy_bowl_slope,
            -6.0..=4.0,
            -1.42755,
            0.2,
            40,
            INTRO_SCORING,
        ),
    ])
    .expect("built-in catalog is valid")
}

/// The four tutorial-game lessons, scored with a time bonus.
#[must_use]
pub fn tutorial() -> Catalog {
    Catalog::new(vec![
        level(
            "tutorial",
            "Tutorial",
            "Learn the fundamentals of walking downhill on a cost curve.",
            &[
                "The gradient points in the direction of fastest ascent",
                "To find the minimum, walk against the gradient",
                "A very high learning rate can overshoot the target",
                "A very low learning rate takes forever to arrive",
            ],
            offset_parabola,
            offset_parabola_slope,
            -2.0..=6.0,
            2.0,
            0.2,
            50,
            TUTORIAL_SCORING,
        ),
        level(
            "simple-valley",
            "Simple Valley",
            "A basic quadratic bowl.",
            &[
                "This is a plain parabola with its minimum at x=0",
                "The gradient grows with the distance from the minimum",
            ],
            parabola,
            parabola_slope,
            -5.0..=5.0,
            0.0,
            0.1,
            30,
            TUTORIAL_SCORING,
        ),
        level(
            "rolling-hills",
            "Rolling Hills",
            "A curve with several local minima.",
            &[
                "Careful: there are several local minima",
                "The starting point decides which minimum you reach",
                "Experiment with different learning rates",
            ],
            wavy_bowl,
            wavy_bowl_slope,
            -8.0..=8.0,
            -1.42755,
            0.15,
            100,
            TUTORIAL_SCORING,
        ),
        level(
            "treacherous-volcano",
            "Treacherous Volcano",
            "A noisy curve that punishes careless steps.",
            &[
                "This curve is noisy and full of local minima",
                "It takes patience and experimentation",
                "The global minimum is near the center",
            ],
            noisy_volcano,
            noisy_volcano_slope,
            -10.0..=10.0,
            0.0,
            0.3,
            150,
            TUTORIAL_SCORING,
        ),
    ])
    .expect("built-in catalog is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use descent_core::DescentProblem;

    #[test]
    fn catalogs_are_ordered_and_navigable() {
        let catalog = intro();

        assert_eq!(catalog.levels().len(), 4);
        assert_eq!(catalog.first().id, "first-step");
        assert_eq!(catalog.next_after("first-step").unwrap().id, "right-direction");
        assert!(catalog.next_after("many-valleys").is_none());
        assert!(catalog.get("nope").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let catalog = intro();
        let mut levels = catalog.levels().to_vec();
        levels.push(levels[0].clone());

        assert_eq!(
            Catalog::new(levels).unwrap_err(),
            CatalogError::DuplicateId { id: "first-step" }
        );
    }

    #[test]
    fn empty_catalogs_are_rejected() {
        assert_eq!(Catalog::new(vec![]).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn lesson_curves_match_their_derivatives_numerically() {
        // Central differences across each domain keep the hand-written
        // derivatives honest.
        for catalog in [intro(), tutorial()] {
            for level in catalog.levels() {
                let problem = &level.problem;
                let (start, end) = (*problem.domain().start(), *problem.domain().end());
                let h = 1e-6;
                for i in 0..=20 {
                    let x = start + (end - start) * f64::from(i) / 20.0;
                    let numeric =
                        (problem.objective(&(x + h)) - problem.objective(&(x - h))) / (2.0 * h);
                    assert_relative_eq!(
                        problem.gradient(&x),
                        numeric,
                        epsilon = 1e-4,
                        max_relative = 1e-4
                    );
                }
            }
        }
    }

    #[test]
    fn random_hint_draws_from_the_level_hints() {
        let catalog = tutorial();
        let level = catalog.first();
        let mut rng = rand::rng();

        for _ in 0..10 {
            let hint = level.random_hint(&mut rng).unwrap();
            assert!(level.hints.contains(&hint));
        }
    }
}

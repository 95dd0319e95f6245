//! The two dataset trainers: logistic regression and a linear SVM.
//!
//! Trainers have no target or star rating; a session just watches the model
//! curve settle and stops when satisfied (or when the step budget runs out).

use std::ops::RangeInclusive;

use descent_core::dataset::{Dataset, HingeLoss, LogisticLoss, Sample};

/// Display range both trainers plot their model curve over.
pub const PLOT_RANGE: RangeInclusive<f64> = -3.0..=3.0;

/// Step budget used when a caller has no opinion.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Training points for the logistic-regression trainer: negatives at and
/// below zero, positives above.
#[must_use]
pub fn logistic_dataset() -> Dataset {
    Dataset::new(vec![
        Sample::new(-3.0, 0.0),
        Sample::new(-2.0, 0.0),
        Sample::new(-1.0, 0.0),
        Sample::new(0.0, 0.0),
        Sample::new(1.0, 1.0),
        Sample::new(2.0, 1.0),
        Sample::new(3.0, 1.0),
    ])
    .expect("built-in dataset is valid")
}

/// Training points for the margin trainer, labeled ±1.
#[must_use]
pub fn svm_dataset() -> Dataset {
    Dataset::new(vec![
        Sample::new(-2.0, -1.0),
        Sample::new(-1.5, -1.0),
        Sample::new(-1.0, -1.0),
        Sample::new(1.0, 1.0),
        Sample::new(1.5, 1.0),
        Sample::new(2.0, 1.0),
    ])
    .expect("built-in dataset is valid")
}

/// The logistic-regression trainer over the built-in dataset.
#[must_use]
pub fn logistic_trainer(max_steps: usize) -> LogisticLoss {
    LogisticLoss::new(logistic_dataset(), max_steps)
}

/// The linear-SVM trainer over the built-in dataset.
#[must_use]
pub fn svm_trainer(max_steps: usize) -> HingeLoss {
    HingeLoss::new(svm_dataset(), max_steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    use descent_core::Linear;

    use crate::run::{Phase, RunController};

    #[test]
    fn svm_training_separates_the_margin_dataset() {
        let mut run = RunController::new(svm_trainer(DEFAULT_MAX_STEPS), Linear::default());
        run.set_learning_rate(0.1);
        run.start().unwrap();

        for _ in 0..500 {
            if run.tick() != Phase::Running {
                break;
            }
        }

        let params = *run.state().unwrap().params();
        for sample in svm_dataset().samples() {
            assert!(
                sample.label * params.predict(sample.feature) >= 1.0 - 1e-9,
                "margin not satisfied at x = {}",
                sample.feature
            );
        }
    }

    #[test]
    fn trainers_expose_their_datasets() {
        assert_eq!(logistic_trainer(10).dataset().len(), 7);
        assert_eq!(svm_trainer(10).dataset().len(), 6);
    }

    #[test]
    fn model_curves_cover_the_plot_range() {
        let trainer = logistic_trainer(10);
        let curve = trainer.decision_curve(&Linear::new(1.0, 0.0), &PLOT_RANGE, 0.1);

        assert_eq!(curve.len(), 61);
        assert!((curve[0][0] - PLOT_RANGE.start()).abs() < 1e-9);
        assert!((curve[60][0] - PLOT_RANGE.end()).abs() < 1e-9);
    }
}

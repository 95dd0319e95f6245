//! Dataset-backed trainer problems.
//!
//! These problems have no target or tolerance: training runs until the step
//! budget is spent or the caller stops it.

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::{params::Linear, problem::DescentProblem, trace};

/// One labeled training point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub feature: f64,
    pub label: f64,
}

impl Sample {
    #[must_use]
    pub fn new(feature: f64, label: f64) -> Self {
        Self { feature, label }
    }
}

/// An immutable, ordered collection of training samples.
///
/// Fixed at construction and never mutated afterwards, so every gradient a
/// problem computes over it is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
}

/// Errors raised when constructing an invalid [`Dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DatasetError {
    #[error("dataset must contain at least one sample")]
    Empty,

    #[error("sample {index} is not finite: ({feature}, {label})")]
    NonFiniteSample {
        index: usize,
        feature: f64,
        label: f64,
    },
}

impl Dataset {
    /// Creates a validated dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if `samples` is empty or contains a non-finite
    /// feature or label.
    pub fn new(samples: Vec<Sample>) -> Result<Self, DatasetError> {
        if samples.is_empty() {
            return Err(DatasetError::Empty);
        }
        for (index, sample) in samples.iter().enumerate() {
            if !sample.feature.is_finite() || !sample.label.is_finite() {
                return Err(DatasetError::NonFiniteSample {
                    index,
                    feature: sample.feature,
                    label: sample.label,
                });
            }
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean over all samples of a per-sample `(d_weight, d_bias)`
    /// contribution.
    fn mean_gradient(&self, contribution: impl Fn(&Sample) -> (f64, f64)) -> Linear {
        let n = self.samples.len() as f64;
        let (dw, db) = self
            .samples
            .iter()
            .map(contribution)
            .fold((0.0, 0.0), |(w, b), (cw, cb)| (w + cw, b + cb));
        Linear::new(dw / n, db / n)
    }

    /// Mean over all samples of a per-sample loss.
    fn mean_loss(&self, loss: impl Fn(&Sample) -> f64) -> f64 {
        let n = self.samples.len() as f64;
        self.samples.iter().map(loss).sum::<f64>() / n
    }
}

/// The logistic sigmoid `1 / (1 + e^(−z))`.
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

// Keeps predicted probabilities away from 0 and 1 so the log loss stays
// finite.
const PROBABILITY_CLAMP: f64 = 1e-12;

/// Binary cross-entropy training on 0/1 labels.
///
/// The gradient is the batch mean over the dataset of
/// `((σ(w·x + b) − y) · x, σ(w·x + b) − y)`.
#[derive(Debug, Clone)]
pub struct LogisticLoss {
    dataset: Dataset,
    max_steps: usize,
}

impl LogisticLoss {
    #[must_use]
    pub fn new(dataset: Dataset, max_steps: usize) -> Self {
        Self { dataset, max_steps }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Sampled `(x, σ(w·x + b))` pairs across `range` for display.
    pub fn decision_curve(
        &self,
        params: &Linear,
        range: &RangeInclusive<f64>,
        step: f64,
    ) -> Vec<[f64; 2]> {
        trace::sample_fn(range, step, |x| sigmoid(params.predict(x)))
    }
}

impl DescentProblem for LogisticLoss {
    type Params = Linear;

    fn objective(&self, params: &Linear) -> f64 {
        self.dataset.mean_loss(|sample| {
            let predicted = sigmoid(params.predict(sample.feature))
                .clamp(PROBABILITY_CLAMP, 1.0 - PROBABILITY_CLAMP);
            -(sample.label * predicted.ln() + (1.0 - sample.label) * (1.0 - predicted).ln())
        })
    }

    fn gradient(&self, params: &Linear) -> Linear {
        self.dataset.mean_gradient(|sample| {
            let error = sigmoid(params.predict(sample.feature)) - sample.label;
            (error * sample.feature, error)
        })
    }

    fn max_steps(&self) -> usize {
        self.max_steps
    }
}

/// Hinge-loss training on ±1 labels.
///
/// The update rule is a subgradient, not a true gradient: a sample
/// contributes `(−y·x, −y)` only while its margin `y·(w·x + b)` is below 1
/// and nothing once the margin is satisfied.
/// A state where every margin holds is therefore a fixed point.
#[derive(Debug, Clone)]
pub struct HingeLoss {
    dataset: Dataset,
    max_steps: usize,
}

impl HingeLoss {
    #[must_use]
    pub fn new(dataset: Dataset, max_steps: usize) -> Self {
        Self { dataset, max_steps }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Sampled `(x, w·x + b)` pairs across `range` for display.
    pub fn decision_curve(
        &self,
        params: &Linear,
        range: &RangeInclusive<f64>,
        step: f64,
    ) -> Vec<[f64; 2]> {
        trace::sample_fn(range, step, |x| params.predict(x))
    }
}

impl DescentProblem for HingeLoss {
    type Params = Linear;

    fn objective(&self, params: &Linear) -> f64 {
        self.dataset
            .mean_loss(|sample| (1.0 - sample.label * params.predict(sample.feature)).max(0.0))
    }

    fn gradient(&self, params: &Linear) -> Linear {
        self.dataset.mean_gradient(|sample| {
            let margin = sample.label * params.predict(sample.feature);
            if margin < 1.0 {
                (-sample.label * sample.feature, -sample.label)
            } else {
                (0.0, 0.0)
            }
        })
    }

    fn max_steps(&self) -> usize {
        self.max_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{OptimizerState, Outcome, step};

    fn binary_dataset() -> Dataset {
        Dataset::new(vec![
            Sample::new(-3.0, 0.0),
            Sample::new(-2.0, 0.0),
            Sample::new(-1.0, 0.0),
            Sample::new(0.0, 0.0),
            Sample::new(1.0, 1.0),
            Sample::new(2.0, 1.0),
            Sample::new(3.0, 1.0),
        ])
        .unwrap()
    }

    fn margin_dataset() -> Dataset {
        Dataset::new(vec![
            Sample::new(-2.0, -1.0),
            Sample::new(-1.5, -1.0),
            Sample::new(-1.0, -1.0),
            Sample::new(1.0, 1.0),
            Sample::new(1.5, 1.0),
            Sample::new(2.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_empty_and_non_finite_datasets() {
        assert_eq!(Dataset::new(vec![]).unwrap_err(), DatasetError::Empty);

        let result = Dataset::new(vec![Sample::new(f64::INFINITY, 1.0)]);
        assert!(matches!(
            result,
            Err(DatasetError::NonFiniteSample { index: 0, .. })
        ));
    }

    #[test]
    fn sigmoid_is_centered_and_bounded() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(20.0) > 0.999_999);
        assert!(sigmoid(-20.0) < 1e-6);
    }

    #[test]
    fn logistic_gradient_at_origin_matches_hand_computation() {
        // At w = b = 0 every prediction is 0.5, so the per-sample errors
        // are 0.5 for the four 0-labels and -0.5 for the three 1-labels.
        let problem = LogisticLoss::new(binary_dataset(), 100);
        let gradient = problem.gradient(&Linear::default());

        assert_relative_eq!(gradient.weight, -6.0 / 7.0);
        assert_relative_eq!(gradient.bias, 0.5 / 7.0);
    }

    #[test]
    fn logistic_training_separates_the_classes() {
        let problem = LogisticLoss::new(binary_dataset(), 500);
        let mut state = OptimizerState::new(&problem, Linear::default(), 0.5);
        let initial_loss = state.latest().objective;

        for _ in 0..200 {
            step(&problem, &mut state);
        }

        let params = state.params();
        assert!(params.weight > 0.0, "weight must turn positive");
        assert!(state.latest().objective < initial_loss);
        assert!(sigmoid(params.predict(3.0)) > 0.8);
        assert!(sigmoid(params.predict(-3.0)) < 0.2);
    }

    #[test]
    fn satisfied_margins_contribute_nothing() {
        let problem = HingeLoss::new(margin_dataset(), 100);

        // With w = 1, b = 0 every margin is at least 1.
        let params = Linear::new(1.0, 0.0);
        assert_eq!(problem.gradient(&params), Linear::default());
        assert_relative_eq!(problem.objective(&params), 0.0);
    }

    #[test]
    fn fully_separated_state_is_a_fixed_point() {
        let problem = HingeLoss::new(margin_dataset(), 100);
        let mut state = OptimizerState::new(&problem, Linear::new(1.0, 0.0), 0.1);

        for _ in 0..5 {
            step(&problem, &mut state);
            assert_eq!(*state.params(), Linear::new(1.0, 0.0));
        }
    }

    #[test]
    fn violated_margins_average_over_the_whole_dataset() {
        // At w = b = 0 every margin is 0 < 1, so each sample contributes
        // (-y*x, -y); the labels are balanced, so the bias term cancels.
        let problem = HingeLoss::new(margin_dataset(), 100);
        let gradient = problem.gradient(&Linear::default());

        assert_relative_eq!(gradient.weight, -9.0 / 6.0);
        assert_relative_eq!(gradient.bias, 0.0);
    }

    #[test]
    fn trainer_runs_end_only_by_budget() {
        let problem = HingeLoss::new(margin_dataset(), 3);
        let mut state = OptimizerState::new(&problem, Linear::default(), 0.1);

        assert_eq!(step(&problem, &mut state), Outcome::InProgress);
        assert_eq!(step(&problem, &mut state), Outcome::InProgress);
        assert!(matches!(step(&problem, &mut state), Outcome::Failed(_)));
    }

    #[test]
    fn decision_curves_span_the_requested_range() {
        let logistic = LogisticLoss::new(binary_dataset(), 100);
        let curve = logistic.decision_curve(&Linear::new(1.0, 0.0), &(-3.0..=3.0), 0.1);

        assert_eq!(curve.len(), 61);
        assert_relative_eq!(curve[0][0], -3.0);
        assert_relative_eq!(curve[0][1], sigmoid(-3.0));
        assert_relative_eq!(curve[60][0], 3.0, epsilon = 1e-9);
    }
}

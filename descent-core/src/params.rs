use std::fmt::Debug;

/// A parameter state that a descent problem optimizes over.
///
/// Two shapes exist: plain `f64` for single-variable problems and
/// [`Linear`] for the one-feature models trained against a dataset.
pub trait Parameters: Clone + Debug + PartialEq {
    /// Applies one descent update, `self − learning_rate · gradient`,
    /// componentwise.
    ///
    /// A learning rate of zero leaves the parameters unchanged.
    #[must_use]
    fn descend(&self, gradient: &Self, learning_rate: f64) -> Self;

    /// Distance between two parameter states.
    fn distance(&self, other: &Self) -> f64;
}

impl Parameters for f64 {
    fn descend(&self, gradient: &Self, learning_rate: f64) -> Self {
        self - learning_rate * gradient
    }

    fn distance(&self, other: &Self) -> f64 {
        (self - other).abs()
    }
}

/// Weight and bias of a one-feature linear model.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Linear {
    pub weight: f64,
    pub bias: f64,
}

impl Linear {
    #[must_use]
    pub fn new(weight: f64, bias: f64) -> Self {
        Self { weight, bias }
    }

    /// Raw model output `weight · x + bias`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.weight * x + self.bias
    }
}

impl Parameters for Linear {
    fn descend(&self, gradient: &Self, learning_rate: f64) -> Self {
        Self {
            weight: self.weight - learning_rate * gradient.weight,
            bias: self.bias - learning_rate * gradient.bias,
        }
    }

    fn distance(&self, other: &Self) -> f64 {
        (self.weight - other.weight).hypot(self.bias - other.bias)
    }
}

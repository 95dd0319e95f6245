//! Pure numerical core for the descent learning games.
//!
//! This crate knows nothing about charts, screens, or storage.
//! It defines parameter states, descent problems with pluggable gradient
//! rules, and a single-step optimizer that classifies each run as in
//! progress, succeeded, or failed.
//! Everything here is deterministic local computation: the same problem and
//! state always produce the same step.

mod params;
mod problem;
mod stepper;

pub mod dataset;
pub mod scalar;
pub mod trace;

pub use params::{Linear, Parameters};
pub use problem::{DescentProblem, Goal};
pub use stepper::{Failure, OptimizerState, Outcome, Visit, step};

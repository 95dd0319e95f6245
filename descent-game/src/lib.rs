//! Game semantics for the descent learning games.
//!
//! `descent-core` knows how to take one descent step; this crate turns that
//! into a playable game: a run controller driven by an external cadence,
//! scoring and star ratings, ordered level catalogs with unlock progression,
//! the two dataset trainers, and the serializable progress record a storage
//! collaborator persists.

mod observe;
mod progress;
mod run;
mod score;
mod session;

pub mod level;
pub mod trainer;

pub use observe::Observer;
pub use progress::{GameProgress, LevelRecord, ProgressError};
pub use run::{Action, DEFAULT_LEARNING_RATE, Phase, RunController, RunError, TickEvent};
pub use score::ScoringPolicy;
pub use session::{Completion, GameSession, SessionError};

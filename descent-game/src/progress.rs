use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use descent_core::DescentProblem;

use crate::level::Catalog;

/// Best recorded result for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub score: i64,
    pub steps: usize,
    pub stars: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<u64>,
}

/// Errors raised when recording progress.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("unknown level id: {id}")]
    UnknownLevel { id: String },
}

/// Persistent progress for one game.
///
/// This is the whole record a storage collaborator keeps: which levels are
/// unlocked, the best result per level, and the running totals.
/// The core never touches storage itself; it only produces and consumes the
/// serialized blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProgress {
    pub unlocked_levels: BTreeSet<String>,
    pub level_progress: BTreeMap<String, LevelRecord>,
    pub total_score: i64,
    pub total_stars: u32,
}

impl GameProgress {
    /// Fresh progress: only the catalog's first level unlocked, zero totals.
    #[must_use]
    pub fn fresh(catalog: &Catalog) -> Self {
        Self {
            unlocked_levels: BTreeSet::from([catalog.first().id.to_string()]),
            level_progress: BTreeMap::new(),
            total_score: 0,
            total_stars: 0,
        }
    }

    #[must_use]
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked_levels.contains(id)
    }

    pub fn unlock(&mut self, id: &str) {
        self.unlocked_levels.insert(id.to_string());
    }

    pub fn record(&self, id: &str) -> Option<&LevelRecord> {
        self.level_progress.get(id)
    }

    /// Records a winning run and unlocks the next level in catalog order.
    ///
    /// The stored record and the totals only change when the new star count
    /// strictly beats the old one; the stars earned by this run are
    /// returned either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog has no level with this id.
    pub fn complete_level(
        &mut self,
        catalog: &Catalog,
        id: &str,
        steps: usize,
        elapsed_seconds: u64,
    ) -> Result<u8, ProgressError> {
        let level = catalog
            .get(id)
            .ok_or_else(|| ProgressError::UnknownLevel { id: id.to_string() })?;

        let score = level.scoring.score(steps, elapsed_seconds);
        let stars = level
            .scoring
            .stars(level.problem.max_steps(), steps, elapsed_seconds);

        let previous_stars = self.level_progress.get(id).map_or(0, |record| record.stars);
        if stars > previous_stars {
            self.total_stars += u32::from(stars - previous_stars);
            self.total_score += score;
            self.level_progress.insert(
                id.to_string(),
                LevelRecord {
                    score,
                    steps,
                    stars,
                    elapsed_seconds: level.scoring.counts_time().then_some(elapsed_seconds),
                },
            );
        }

        if let Some(next) = catalog.next_after(id) {
            self.unlock(next.id);
        }

        Ok(stars)
    }

    /// Serializes the record to the opaque blob a collaborator persists.
    ///
    /// # Panics
    ///
    /// Panics if serialization fails, which is impossible for this type:
    /// all keys are strings and all values are plain data.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("progress record serializes to JSON")
    }

    /// Restores progress from a stored blob.
    ///
    /// A missing or corrupt blob is never an error: it falls back to
    /// [`GameProgress::fresh`] for the catalog.
    #[must_use]
    pub fn restore(catalog: &Catalog, blob: Option<&str>) -> Self {
        blob.and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_else(|| Self::fresh(catalog))
    }
}

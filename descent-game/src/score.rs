/// Scoring constants for one game variant.
///
/// The score is `ceiling − steps·step_penalty − seconds·time_penalty`,
/// clamped to `floor`. The star rating comes from the efficiency ratio
/// `(max_steps − steps) / max_steps`; timed variants average it with a
/// bonus for finishing inside a minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringPolicy {
    pub ceiling: i64,
    pub step_penalty: i64,
    pub time_penalty: i64,
    pub floor: i64,
    /// Whether the star rating averages in the time bonus.
    pub timed_stars: bool,
}

impl ScoringPolicy {
    /// Score for a winning run.
    #[must_use]
    pub fn score(&self, steps: usize, elapsed_seconds: u64) -> i64 {
        let raw = self.ceiling
            - steps as i64 * self.step_penalty
            - elapsed_seconds as i64 * self.time_penalty;
        raw.max(self.floor)
    }

    /// Stars earned for a winning run, from 1 to 3.
    ///
    /// Monotonic in `steps`: for a fixed budget, fewer steps never earn
    /// fewer stars.
    #[must_use]
    pub fn stars(&self, max_steps: usize, steps: usize, elapsed_seconds: u64) -> u8 {
        let efficiency = if max_steps == 0 {
            0.0
        } else {
            ((max_steps as f64 - steps as f64) / max_steps as f64).max(0.0)
        };

        let rating = if self.timed_stars {
            let time_bonus = ((60.0 - elapsed_seconds as f64) / 60.0).max(0.0);
            (efficiency + time_bonus) / 2.0
        } else {
            efficiency
        };

        if rating >= 0.8 {
            3
        } else if rating >= 0.5 {
            2
        } else {
            1
        }
    }

    /// Whether elapsed time affects this policy's score or stars.
    #[must_use]
    pub fn counts_time(&self) -> bool {
        self.time_penalty > 0 || self.timed_stars
    }
}

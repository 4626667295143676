//! Scoring module - score, level and speed progression
//!
//! A landing that clears `n` rows earns a flat `100 * n` plus a bonus for
//! clearing several rows at once:
//!
//! | Rows | Flat | Bonus | Total |
//! |------|------|-------|-------|
//! | 1 | 100 | 0 | 100 |
//! | 2 | 200 | 100 | 300 |
//! | 3 | 300 | 200 | 500 |
//! | 4 | 400 | 400 | 800 |
//!
//! Level and drop interval are pure functions of the running score.

use serde::Serialize;

use crate::types::{
    BASE_DROP_INTERVAL_MS, DROP_INTERVAL_STEP_MS, MIN_DROP_INTERVAL_MS, MULTI_LINE_BONUS,
    POINTS_PER_LEVEL, POINTS_PER_LINE,
};

/// Points for clearing `lines` rows with a single landing
///
/// More than four rows (only reachable with a pre-filled field) earn the flat
/// rate without a bonus.
pub fn score_delta(lines: usize) -> u32 {
    let flat = POINTS_PER_LINE.saturating_mul(lines as u32);
    let bonus = MULTI_LINE_BONUS.get(lines).copied().unwrap_or(0);
    flat + bonus
}

/// Level for a score (starts at 1, one level per 1000 points)
pub fn level_for(score: u32) -> u32 {
    score / POINTS_PER_LEVEL + 1
}

/// Drop interval for a level, floored at 100ms
pub fn drop_interval_ms_for(level: u32) -> u32 {
    BASE_DROP_INTERVAL_MS
        .saturating_sub(level.saturating_mul(DROP_INTERVAL_STEP_MS))
        .max(MIN_DROP_INTERVAL_MS)
}

/// Derived progression values for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Progression {
    pub score: u32,
    pub level: u32,
    pub drop_interval_ms: u32,
}

impl Progression {
    pub fn from_score(score: u32) -> Self {
        let level = level_for(score);
        Self {
            score,
            level,
            drop_interval_ms: drop_interval_ms_for(level),
        }
    }

    /// Progression after clearing `lines` rows
    pub fn after_clear(self, lines: usize) -> Self {
        Self::from_score(self.score.saturating_add(score_delta(lines)))
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::from_score(0)
    }
}

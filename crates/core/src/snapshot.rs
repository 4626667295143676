//! Snapshot module - owned copies of session state
//!
//! Renderers and drivers read a [`SessionSnapshot`] instead of borrowing the
//! session, so they can never write to engine-owned state.

use serde::Serialize;

use crate::geometry::Position;
use crate::matrix::Matrix;
use crate::playfield::{merge, ActivePiece};
use crate::scoring::Progression;

/// Owned copy of session state for renderers and drivers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub field: Matrix,
    pub active: Option<ActivePiece>,
    pub progression: Progression,
    pub lines: u32,
    pub started: bool,
    pub paused: bool,
    pub game_over: bool,
}

impl SessionSnapshot {
    pub fn score(&self) -> u32 {
        self.progression.score
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn active_position(&self) -> Option<Position> {
        self.active.as_ref().map(ActivePiece::position)
    }

    /// Field with the active piece drawn in
    pub fn composite(&self) -> Matrix {
        let mut out = self.field.clone();
        if let Some(piece) = &self.active {
            merge(&mut out, piece);
        }
        out
    }

    pub fn playable(&self) -> bool {
        self.started && !self.game_over && !self.paused
    }
}

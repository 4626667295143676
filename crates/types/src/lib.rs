//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! Everything here is plain data: no game rules live in this crate, so the
//! types can be shared by the core engine, simulation drivers and any
//! presentation layer that renders the field.
//!
//! # Field Dimensions
//!
//! Standard playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//!
//! Other sizes are allowed as long as both sides can hold the largest piece
//! (see [`MIN_FIELD_SIDE`]).
//!
//! # Scoring and Progression Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `POINTS_PER_LINE` | 100 | Flat points for every cleared row |
//! | `MULTI_LINE_BONUS` | 0/0/100/200/400 | Extra points indexed by rows cleared at once |
//! | `POINTS_PER_LEVEL` | 1000 | Score needed to advance one level |
//! | `BASE_DROP_INTERVAL_MS` | 1000 | Interval before the per-level reduction |
//! | `DROP_INTERVAL_STEP_MS` | 100 | Reduction per level |
//! | `MIN_DROP_INTERVAL_MS` | 100 | Interval floor |
//!
//! # Cell Values
//!
//! A [`Cell`] is `0` when empty; `1..=7` is the color id of a settled or
//! falling block. Color ids double as occupancy, see [`PieceType::color_id`].
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameAction, PieceType, FIELD_HEIGHT, FIELD_WIDTH};
//!
//! // Parse a piece type (case-insensitive)
//! let piece: PieceType = "t".parse().unwrap();
//! assert_eq!(piece, PieceType::T);
//! assert_eq!(piece.color_id(), 6);
//!
//! // Piece ids outside 1..=7 are rejected
//! assert!(PieceType::try_from(8u8).is_err());
//!
//! // Parse a game action
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert_eq!(FIELD_WIDTH, 10);
//! assert_eq!(FIELD_HEIGHT, 20);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Field width in cells (10 columns)
pub const FIELD_WIDTH: usize = 10;

/// Field height in cells (20 rows)
pub const FIELD_HEIGHT: usize = 20;

/// Smallest accepted field side; the I piece occupies a 4x4 shape.
pub const MIN_FIELD_SIDE: usize = 4;

/// Flat points awarded for every cleared row
pub const POINTS_PER_LINE: u32 = 100;

/// Bonus points indexed by the number of rows cleared by a single landing
pub const MULTI_LINE_BONUS: [u32; 5] = [0, 0, 100, 200, 400];

/// Score required per level step
pub const POINTS_PER_LEVEL: u32 = 1000;

/// Drop interval before the per-level reduction is applied
pub const BASE_DROP_INTERVAL_MS: u32 = 1000;

/// Drop interval reduction per level
pub const DROP_INTERVAL_STEP_MS: u32 = 100;

/// Fastest possible drop interval
pub const MIN_DROP_INTERVAL_MS: u32 = 100;

/// Cell value: 0 = empty, 1..=7 = color id
pub type Cell = u8;

/// Empty cell value
pub const EMPTY: Cell = 0;

/// Errors raised by the engine.
///
/// Rejected player actions are never errors; they are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A write targeted a cell outside the matrix dimensions.
    #[error("cell ({x}, {y}) is outside a {width}x{height} matrix")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    /// A piece id or name that does not name one of the seven piece types.
    #[error("invalid piece type: {0}")]
    InvalidPieceType(String),

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceType {
    /// All piece types in color-id order
    pub const ALL: [PieceType; 7] = [
        PieceType::I,
        PieceType::J,
        PieceType::L,
        PieceType::O,
        PieceType::S,
        PieceType::T,
        PieceType::Z,
    ];

    /// Color id of this piece; also the nonzero value stored in its shape cells.
    pub fn color_id(&self) -> Cell {
        match self {
            PieceType::I => 1,
            PieceType::J => 2,
            PieceType::L => 3,
            PieceType::O => 4,
            PieceType::S => 5,
            PieceType::T => 6,
            PieceType::Z => 7,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceType::I => "i",
            PieceType::J => "j",
            PieceType::L => "l",
            PieceType::O => "o",
            PieceType::S => "s",
            PieceType::T => "t",
            PieceType::Z => "z",
        }
    }
}

impl TryFrom<u8> for PieceType {
    type Error = EngineError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1..=7 => Ok(PieceType::ALL[(id - 1) as usize]),
            _ => Err(EngineError::InvalidPieceType(format!("id {id}"))),
        }
    }
}

impl FromStr for PieceType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::InvalidPieceType(format!("name {s:?}")))
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shift {
    Left,
    Right,
}

impl Shift {
    /// Column delta (-1 or +1)
    pub fn dx(&self) -> i32 {
        match self {
            Shift::Left => -1,
            Shift::Right => 1,
        }
    }
}

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spin {
    Clockwise,
    CounterClockwise,
}

impl Spin {
    /// The opposite direction
    pub fn reversed(&self) -> Self {
        match self {
            Spin::Clockwise => Spin::CounterClockwise,
            Spin::CounterClockwise => Spin::Clockwise,
        }
    }
}

/// Commands accepted by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Pause,
    Resume,
    TogglePause,
    Start,
}

impl GameAction {
    /// Every command, in declaration order
    pub const ALL: [GameAction; 10] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::RotateCw,
        GameAction::RotateCcw,
        GameAction::Pause,
        GameAction::Resume,
        GameAction::TogglePause,
        GameAction::Start,
    ];

    /// Parse action from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "pause" => Some(GameAction::Pause),
            "resume" => Some(GameAction::Resume),
            "togglepause" => Some(GameAction::TogglePause),
            "start" | "restart" => Some(GameAction::Start),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Pause => "pause",
            GameAction::Resume => "resume",
            GameAction::TogglePause => "togglePause",
            GameAction::Start => "start",
        }
    }

    /// Whether this command moves or rotates the active piece
    pub fn is_piece_command(&self) -> bool {
        matches!(
            self,
            GameAction::MoveLeft
                | GameAction::MoveRight
                | GameAction::SoftDrop
                | GameAction::HardDrop
                | GameAction::RotateCw
                | GameAction::RotateCcw
        )
    }
}

//! Core game logic module - pure, deterministic, and testable
//!
//! Everything a falling-block game needs short of drawing and input. There is
//! no I/O here; time is passed in by the caller.
//!
//! # Module Structure
//!
//! - [`matrix`]: fixed-size grid of color ids, used for both pieces and the field
//! - [`catalog`]: the seven canonical piece shapes
//! - [`geometry`]: rotation, extents, collision and the rotation kick scan
//! - [`playfield`]: active piece movement, landing, line sweeping and spawning
//! - [`scoring`]: score, level and drop interval progression
//! - [`session`]: lifecycle, gravity timer and command gating
//! - [`rng`]: piece sources (seeded uniform, scripted)
//! - [`config`]: field size and seed configuration
//! - [`snapshot`]: owned state copies for renderers
//!
//! # Game Rules
//!
//! - Pieces spawn horizontally centered in the top row; a blocked spawn ends the game
//! - Rotation tries the rotated shape in place, then shifted one column right,
//!   one left, two right, and so on until the shift exceeds the shape width;
//!   the shape grid must stay inside the field's columns
//! - A landing clears every full row and scores 100/300/500/800 for 1-4 rows
//! - Level rises every 1000 points, shortening the drop interval by 100ms down to 100ms
//!
//! # Example
//!
//! ```
//! use blockfall_core::{ScriptedSource, Session};
//! use blockfall_core::types::{GameAction, PieceType};
//!
//! let mut game = Session::new(10, 20, ScriptedSource::repeat(PieceType::O));
//! game.start();
//!
//! game.apply_action(GameAction::MoveLeft);
//! game.apply_action(GameAction::HardDrop);
//!
//! // The O piece settled on the floor and a new one spawned
//! assert_eq!(game.field().occupied_count(), 4);
//! assert!(game.active_piece().is_some());
//! ```
//!
//! # Timing
//!
//! Call [`Session::advance`](session::Session::advance) with elapsed
//! milliseconds. Once the accumulated time exceeds the drop interval the
//! active piece falls one row and the timer restarts.

pub mod catalog;
pub mod config;
pub mod geometry;
pub mod matrix;
pub mod playfield;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use catalog::{shape_for, shape_for_id};
pub use config::EngineConfig;
pub use geometry::{collides, kick_shifts, rotate, Position};
pub use matrix::Matrix;
pub use playfield::{merge, spawn_position, sweep_rows, ActivePiece, DropStep, Landing, Playfield};
pub use rng::{PieceSource, ScriptedSource, UniformSource};
pub use scoring::{score_delta, Progression};
pub use session::Session;
pub use snapshot::SessionSnapshot;

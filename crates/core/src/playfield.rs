//! Playfield module - the field, the falling piece and everything that moves it
//!
//! Per-piece state machine:
//!
//! ```text
//! spawn ──> Falling ──(landing: merge + sweep)──> spawn next
//!              │
//!              └── spawn collides ──> GameOver
//! ```
//!
//! Every movement decision goes through [`collides`]. Rejected moves and
//! rotations leave the piece exactly as it was and report `false`.

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::catalog::shape_for;
use crate::geometry::{
    collides, kick_shifts, leftmost_occupied_column, occupied_width, rotate, Position,
};
use crate::matrix::Matrix;
use crate::rng::{PieceSource, UniformSource};
use crate::types::{PieceType, Shift, Spin};

/// The falling piece
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ActivePiece {
    kind: PieceType,
    shape: Matrix,
    position: Position,
}

impl ActivePiece {
    /// Create a piece with a fresh canonical shape
    pub fn new(kind: PieceType, position: Position) -> Self {
        Self {
            kind,
            shape: shape_for(kind),
            position,
        }
    }

    pub fn kind(&self) -> PieceType {
        self.kind
    }

    /// Current (possibly rotated) shape
    pub fn shape(&self) -> &Matrix {
        &self.shape
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Field coordinates and color ids of the occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        let Position { x: ox, y: oy } = self.position;
        self.shape
            .occupied()
            .map(move |(x, y, value)| (ox + x, oy + y, value))
    }
}

/// Outcome of a piece landing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Landing {
    /// Rows removed by the sweep that followed the merge
    pub lines_cleared: usize,
    /// The next piece could not spawn
    pub game_over: bool,
}

/// Outcome of a one-row drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropStep {
    /// No active piece (not started or game over)
    Idle,
    /// The piece moved down one row
    Fell,
    /// The piece could not move and was merged into the field
    Landed(Landing),
}

/// Spawn offset for a shape: centered, corrected for empty leading columns
pub fn spawn_position(field_width: usize, shape: &Matrix) -> Position {
    let left = leftmost_occupied_column(shape);
    let x = (field_width / 2) as i32 - (shape.width() / 2) as i32 - left;
    Position::new(x.max(-left), 0)
}

/// Write a piece's occupied cells into the field
///
/// Cells that map outside the field are skipped.
pub fn merge(field: &mut Matrix, piece: &ActivePiece) {
    for (x, y, value) in piece.cells() {
        if let Err(err) = field.set(x, y, value) {
            trace!(%err, "skipping piece cell outside the field");
        }
    }
}

/// Remove every full row, bottom to top, and return how many were removed
///
/// After a removal the same row index is examined again, because the row
/// above has shifted into it.
pub fn sweep_rows(field: &mut Matrix) -> usize {
    let mut cleared = 0;
    let mut y = field.height();

    while y > 0 {
        if field.is_row_full(y - 1) {
            field.remove_row(y - 1);
            cleared += 1;
        } else {
            y -= 1;
        }
    }

    cleared
}

/// Field plus falling piece
#[derive(Debug, Clone)]
pub struct Playfield<S: PieceSource = UniformSource> {
    field: Matrix,
    active: Option<ActivePiece>,
    source: S,
    game_over: bool,
}

impl<S: PieceSource> Playfield<S> {
    /// Create an empty playfield
    pub fn new(width: usize, height: usize, source: S) -> Self {
        Self::from_field(Matrix::new(width, height), source)
    }

    /// Create a playfield over an existing field layout
    pub fn from_field(field: Matrix, source: S) -> Self {
        Self {
            field,
            active: None,
            source,
            game_over: false,
        }
    }

    pub fn field(&self) -> &Matrix {
        &self.field
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Replace the field with `layout`, drop the active piece and clear game over
    ///
    /// The layout is copied cell by cell; it must have the field's dimensions.
    pub fn reset_to(&mut self, layout: &Matrix) {
        debug_assert_eq!(
            (layout.width(), layout.height()),
            (self.field.width(), self.field.height())
        );
        self.field.clone_from(layout);
        self.active = None;
        self.game_over = false;
    }

    /// Spawn the next piece from the source
    ///
    /// Returns false and enters game over if the new piece collides at its
    /// spawn position; the field is left untouched in that case.
    pub fn spawn(&mut self) -> bool {
        if self.game_over {
            return false;
        }

        let kind = self.source.next_piece();
        let shape = shape_for(kind);
        let position = spawn_position(self.field.width(), &shape);

        if collides(&self.field, &shape, position) {
            info!(%kind, x = position.x, "spawn blocked, game over");
            self.active = None;
            self.game_over = true;
            return false;
        }

        debug!(%kind, x = position.x, "spawned piece");
        self.active = Some(ActivePiece {
            kind,
            shape,
            position,
        });
        true
    }

    /// Put a specific piece at a specific position (puzzle setups, tests)
    ///
    /// Rejected if the piece would collide there.
    pub fn place_piece(&mut self, kind: PieceType, position: Position) -> bool {
        let piece = ActivePiece::new(kind, position);
        if self.game_over || collides(&self.field, &piece.shape, position) {
            return false;
        }
        self.active = Some(piece);
        true
    }

    /// Shift the active piece one column
    pub fn move_horizontal(&mut self, shift: Shift) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };

        let left = leftmost_occupied_column(&piece.shape);
        let width = occupied_width(&piece.shape);
        let target = piece.position.offset(shift.dx(), 0);

        // Bounds first, then settled blocks
        if target.x + left < 0 || target.x + width > self.field.width() as i32 {
            return false;
        }
        if collides(&self.field, &piece.shape, target) {
            return false;
        }

        piece.position = target;
        true
    }

    /// Rotate the active piece, searching sideways for room if needed
    ///
    /// The column is first corrected so the rotated cells start at the old
    /// origin column, then shifts 0, +1, -1, +2, ... are tried. A shift is
    /// accepted when the whole shape grid lies inside the field's columns and
    /// the cells do not collide. If none fits within the shape width the
    /// rotation is undone.
    pub fn rotate(&mut self, spin: Spin) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };

        let original = piece.shape.clone();
        rotate(&mut piece.shape, spin);

        // occupied cells start at the old origin column
        let base = piece.position.offset(-leftmost_occupied_column(&piece.shape), 0);
        let max_x = self.field.width() as i32 - piece.shape.width() as i32;
        for shift in kick_shifts(piece.shape.width()) {
            let target = base.offset(shift, 0);
            // grid bounds, not occupied cells
            if target.x < 0 || target.x > max_x {
                continue;
            }
            if !collides(&self.field, &piece.shape, target) {
                piece.position = target;
                return true;
            }
        }

        trace!(kind = %piece.kind, ?spin, "no room to rotate");
        piece.shape = original;
        false
    }

    /// Move the active piece down one row, landing it if it cannot move
    pub fn soft_drop_one_step(&mut self) -> DropStep {
        let Some(piece) = self.active.as_mut() else {
            return DropStep::Idle;
        };

        let below = piece.position.offset(0, 1);
        if !collides(&self.field, &piece.shape, below) {
            piece.position = below;
            return DropStep::Fell;
        }

        DropStep::Landed(self.land())
    }

    /// Drop the active piece as far as it goes and land it
    pub fn hard_drop(&mut self) -> Option<Landing> {
        let piece = self.active.as_mut()?;

        let mut target = piece.position;
        while !collides(&self.field, &piece.shape, target.offset(0, 1)) {
            target = target.offset(0, 1);
        }
        piece.position = target;

        Some(self.land())
    }

    /// Remove full rows from the field
    pub fn sweep_rows(&mut self) -> usize {
        sweep_rows(&mut self.field)
    }

    /// Merge the active piece, sweep, then spawn the next piece
    fn land(&mut self) -> Landing {
        let Some(piece) = self.active.take() else {
            return Landing::default();
        };

        merge(&mut self.field, &piece);
        let lines_cleared = self.sweep_rows();
        debug!(
            kind = %piece.kind,
            x = piece.position.x,
            y = piece.position.y,
            lines_cleared,
            "piece landed"
        );

        let spawned = self.spawn();
        Landing {
            lines_cleared,
            game_over: !spawned,
        }
    }
}

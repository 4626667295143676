//! Catalog module - canonical piece shapes
//!
//! Each piece type maps to one square shape grid whose nonzero cells hold the
//! piece's color id. The canonical grids are constants; every lookup builds a
//! fresh [`Matrix`], so callers can rotate their copy freely.

use rand::Rng;

use crate::matrix::Matrix;
use crate::types::{Cell, EngineError, PieceType};

/// I piece: 4x4, occupies the second row
const I_SHAPE: [[Cell; 4]; 4] = [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]];

const J_SHAPE: [[Cell; 3]; 3] = [[2, 0, 0], [2, 2, 2], [0, 0, 0]];

const L_SHAPE: [[Cell; 3]; 3] = [[0, 0, 3], [3, 3, 3], [0, 0, 0]];

/// O piece: 3x3 with an empty left column
const O_SHAPE: [[Cell; 3]; 3] = [[0, 4, 4], [0, 4, 4], [0, 0, 0]];

const S_SHAPE: [[Cell; 3]; 3] = [[0, 5, 5], [5, 5, 0], [0, 0, 0]];

const T_SHAPE: [[Cell; 3]; 3] = [[0, 6, 0], [6, 6, 6], [0, 0, 0]];

const Z_SHAPE: [[Cell; 3]; 3] = [[7, 7, 0], [0, 7, 7], [0, 0, 0]];

/// Get a fresh copy of the canonical shape for a piece type
pub fn shape_for(kind: PieceType) -> Matrix {
    match kind {
        PieceType::I => Matrix::from_array(I_SHAPE),
        PieceType::J => Matrix::from_array(J_SHAPE),
        PieceType::L => Matrix::from_array(L_SHAPE),
        PieceType::O => Matrix::from_array(O_SHAPE),
        PieceType::S => Matrix::from_array(S_SHAPE),
        PieceType::T => Matrix::from_array(T_SHAPE),
        PieceType::Z => Matrix::from_array(Z_SHAPE),
    }
}

/// Get the shape for a numeric piece id (1..=7)
///
/// Unknown ids are rejected; no default piece is substituted.
pub fn shape_for_id(id: u8) -> Result<Matrix, EngineError> {
    PieceType::try_from(id).map(shape_for)
}

/// Color id used by the shape's nonzero cells
pub fn color_id_for(kind: PieceType) -> Cell {
    kind.color_id()
}

/// Pick a piece type uniformly at random
pub fn random_type<R: Rng>(rng: &mut R) -> PieceType {
    PieceType::ALL[rng.random_range(0..PieceType::ALL.len())]
}

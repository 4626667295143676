//! Geometry module - pure shape math
//!
//! Rotation of square shape grids, horizontal extents of occupied cells,
//! and the collision predicate. [`collides`] is the only place that decides
//! whether a shape may occupy a set of field cells; every movement path in
//! the playfield goes through it.

use serde::Serialize;

use crate::matrix::Matrix;
use crate::types::{Spin, EMPTY};

/// Offset of a shape's top-left corner relative to the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Same position shifted by (dx, dy)
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Transpose a square matrix in place
fn transpose(shape: &mut Matrix) {
    let n = shape.width();
    for y in 0..n {
        for x in 0..y {
            shape.swap((x, y), (y, x));
        }
    }
}

/// Rotate a square shape 90 degrees in place
///
/// Clockwise is transpose then mirror each row; counter-clockwise is
/// transpose then flip the row order.
///
/// # Panics
///
/// Panics if `shape` is not square.
pub fn rotate(shape: &mut Matrix, spin: Spin) {
    assert!(
        shape.is_square(),
        "cannot rotate a {}x{} shape: rotation needs a square grid",
        shape.width(),
        shape.height()
    );

    transpose(shape);
    match spin {
        Spin::Clockwise => shape.reverse_rows(),
        Spin::CounterClockwise => shape.reverse_row_order(),
    }
}

/// Rotate a square shape clockwise in place
pub fn rotate_clockwise(shape: &mut Matrix) {
    rotate(shape, Spin::Clockwise);
}

/// Rotate a square shape counter-clockwise in place
pub fn rotate_counter_clockwise(shape: &mut Matrix) {
    rotate(shape, Spin::CounterClockwise);
}

/// Smallest column holding a nonzero cell
///
/// Returns the shape width when the shape is empty.
pub fn leftmost_occupied_column(shape: &Matrix) -> i32 {
    shape
        .occupied()
        .map(|(x, _, _)| x)
        .min()
        .unwrap_or(shape.width() as i32)
}

/// One past the largest column holding a nonzero cell (0 for an empty shape)
pub fn occupied_width(shape: &Matrix) -> i32 {
    shape.occupied().map(|(x, _, _)| x + 1).max().unwrap_or(0)
}

/// Check whether `shape` placed at `offset` overlaps walls, floor or settled cells
///
/// A nonzero shape cell collides when its field row is at or below the
/// field's row count or above row 0, when its column is outside
/// `0..width`, or when the field cell under it is already filled.
pub fn collides(field: &Matrix, shape: &Matrix, offset: Position) -> bool {
    shape.occupied().any(|(x, y, _)| {
        let fx = offset.x + x;
        let fy = offset.y + y;
        match field.get(fx, fy) {
            Some(cell) => cell != EMPTY,
            None => true,
        }
    })
}

/// Cumulative horizontal shifts tried after a rotation: 0, +1, -1, +2, -2, ...
///
/// The step grows by one and flips sign after every try; the scan stops as
/// soon as the next step would exceed `limit` (the shape width).
#[derive(Debug, Clone)]
pub struct KickScan {
    shift: i32,
    step: i32,
    limit: i32,
    done: bool,
}

impl Iterator for KickScan {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.done {
            return None;
        }

        let current = self.shift;
        self.shift += self.step;
        self.step = -(self.step + self.step.signum());
        if self.step > self.limit {
            self.done = true;
        }
        Some(current)
    }
}

/// Kick shifts for a shape of the given width
pub fn kick_shifts(limit: usize) -> KickScan {
    KickScan {
        shift: 0,
        step: 1,
        limit: limit as i32,
        done: false,
    }
}

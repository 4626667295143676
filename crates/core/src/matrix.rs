//! Matrix module - rectangular grid of cell values
//!
//! A matrix backs both the playfield and every piece's local shape.
//! Uses flat row-major storage for cache locality; dimensions are fixed at
//! construction so every row always has the same width.
//! Coordinates: (x, y) where x is the column (left to right) and y is the row
//! (top to bottom). Coordinates are signed so callers can probe positions
//! left of or above the grid without casting.

use serde::Serialize;

use crate::types::{Cell, EngineError, EMPTY};

/// Fixed-size grid of small integer cells
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Matrix {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Matrix {
    /// Create a new matrix filled with empty cells
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width * height],
        }
    }

    /// Create a matrix from fixed-size rows
    pub fn from_array<const W: usize, const H: usize>(rows: [[Cell; W]; H]) -> Self {
        Self {
            width: W,
            height: H,
            cells: rows.iter().flatten().copied().collect(),
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether width equals height
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Check if (x, y) lies inside the grid
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    ///
    /// Writes outside the grid are rejected with [`EngineError::OutOfBounds`];
    /// the matrix never clamps.
    pub fn set(&mut self, x: i32, y: i32, value: Cell) -> Result<(), EngineError> {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = value;
                Ok(())
            }
            None => Err(EngineError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            }),
        }
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(v) if v != EMPTY)
    }

    /// Borrow row `y`
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// Iterate over rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        // chunks(0) panics; a zero-width matrix has no cells to yield anyway.
        self.cells.chunks(self.width.max(1))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height {
            return false;
        }
        self.row(y).iter().all(|&cell| cell != EMPTY)
    }

    /// Remove row `y`, shift every row above it down by one and insert an
    /// empty row at the top. Rows below `y` are untouched.
    pub fn remove_row(&mut self, y: usize) {
        if y >= self.height {
            return;
        }

        let width = self.width;

        // copy_within handles the overlapping ranges
        self.cells.copy_within(0..y * width, width);
        self.cells[..width].fill(EMPTY);
    }

    /// Swap two cells given in flat coordinates (both must be in bounds)
    pub(crate) fn swap(&mut self, a: (usize, usize), b: (usize, usize)) {
        let ia = a.1 * self.width + a.0;
        let ib = b.1 * self.width + b.0;
        self.cells.swap(ia, ib);
    }

    /// Reverse the cells of every row (mirror left to right)
    pub(crate) fn reverse_rows(&mut self) {
        let width = self.width.max(1);
        for row in self.cells.chunks_mut(width) {
            row.reverse();
        }
    }

    /// Reverse the order of the rows (flip top to bottom)
    pub(crate) fn reverse_row_order(&mut self) {
        let (width, height) = (self.width, self.height);
        for y in 0..height / 2 {
            let (top, bottom) = self.cells.split_at_mut((height - 1 - y) * width);
            top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
        }
    }

    /// Iterate over nonzero cells as (x, y, value)
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell != EMPTY)
            .map(move |(idx, &cell)| ((idx % width) as i32, (idx / width) as i32, cell))
    }

    /// Count nonzero cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != EMPTY).count()
    }

    /// Reset every cell to empty
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

//! Playfield grid, cells and collision queries

use ratatui::style::Color;

/// Standard playfield dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// The color pair carried by an occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colors {
    /// Color while falling or settled
    pub base: Color,
    /// Color while the piece sits in its lock delay
    pub locking: Color,
}

impl Colors {
    pub const fn new(base: Color, locking: Color) -> Self {
        Self { base, locking }
    }
}

/// A cell of the authoritative grid - either empty or filled with a color pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Colors),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Occupied(_))
    }
}

/// Anything a grid can hold: needs an empty default and an emptiness test.
pub trait Tile: Copy + Default {
    fn is_vacant(&self) -> bool;
}

impl Tile for Cell {
    fn is_vacant(&self) -> bool {
        self.is_empty()
    }
}

/// A cell placed at absolute grid coordinates. `y` may be negative (above the field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedCell<T = Cell> {
    pub x: i32,
    pub y: i32,
    pub cell: T,
}

/// True iff (x, y) lies on the visible field
pub fn within_bounds(x: i32, y: i32) -> bool {
    x >= 0 && x < BOARD_WIDTH as i32 && y >= 0 && y < BOARD_HEIGHT as i32
}

/// Fixed 20x10 grid, row-major, row 0 on top
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T: Tile = Cell> {
    rows: [[T; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl<T: Tile> Default for Grid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Tile> Grid<T> {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            rows: [[T::default(); BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Get the cell at (x, y). Returns None off the field.
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        if !within_bounds(x, y) {
            return None;
        }
        Some(self.rows[y as usize][x as usize])
    }

    /// Set a cell. Returns false off the field.
    pub fn set(&mut self, x: i32, y: i32, cell: T) -> bool {
        if !within_bounds(x, y) {
            return false;
        }
        self.rows[y as usize][x as usize] = cell;
        true
    }

    /// Whether (x, y) is on the field and holds a non-empty cell
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|cell| !cell.is_vacant())
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> &[[T; BOARD_WIDTH]; BOARD_HEIGHT] {
        &self.rows
    }

    /// Write placed cells into a copy of this grid, skipping anything off the field
    pub fn with_cells(&self, cells: impl IntoIterator<Item = PlacedCell<T>>) -> Self {
        let mut grid = self.clone();
        for placed in cells {
            grid.set(placed.x, placed.y, placed.cell);
        }
        grid
    }

    /// Check if the whole grid is empty
    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_vacant()))
    }

    /// Check if a row has no empty cell
    fn is_row_complete(row: &[T; BOARD_WIDTH]) -> bool {
        row.iter().all(|cell| !cell.is_vacant())
    }

    /// Remove complete rows, compact the rest downward and refill the top
    /// with empty rows. Returns the number of rows removed.
    pub fn clear_complete_rows(&mut self) -> usize {
        let mut write_row = BOARD_HEIGHT;

        for read_row in (0..BOARD_HEIGHT).rev() {
            if !Self::is_row_complete(&self.rows[read_row]) {
                write_row -= 1;
                if write_row != read_row {
                    self.rows[write_row] = self.rows[read_row];
                }
            }
        }

        let cleared = write_row;
        for row in &mut self.rows[..cleared] {
            *row = [T::default(); BOARD_WIDTH];
        }
        cleared
    }
}

/// Cell-wise merge: `first` wins wherever it is non-empty, `second` fills the gaps.
/// Used to stack environment, active piece and ghost into one render grid.
pub fn merge_grids<T: Tile>(first: &Grid<T>, second: &Grid<T>) -> Grid<T> {
    let mut merged = first.clone();
    for (merged_row, second_row) in merged.rows.iter_mut().zip(second.rows.iter()) {
        for (cell, below) in merged_row.iter_mut().zip(second_row.iter()) {
            if cell.is_vacant() {
                *cell = *below;
            }
        }
    }
    merged
}

//! Piece placements: which cells a piece occupies and the atomic moves on it

use crate::board::{Cell, Grid, PlacedCell, BOARD_HEIGHT, BOARD_WIDTH};
use crate::tetromino::{PieceKind, RotationDirection, MATRIX_SIZE};

/// Column where every piece spawns
pub const SPAWN_X: i32 = 3;

/// A piece kind with a rotation index and the grid offset of its 4x4 matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub kind: PieceKind,
    pub rotation: usize,
    /// Column of the matrix's left edge
    pub x: i32,
    /// Row of the matrix's top edge; negative while spawning
    pub y: i32,
}

impl Placement {
    pub fn new(kind: PieceKind, rotation: usize, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation,
            x,
            y,
        }
    }

    /// Standard spawn placement for a kind
    pub fn spawn(kind: PieceKind, rotation: usize) -> Self {
        Self::new(kind, rotation, SPAWN_X, kind.spawn_row())
    }

    /// Absolute positions of every filled cell, including those above the field
    pub fn cells(self) -> impl Iterator<Item = PlacedCell> {
        let cell = Cell::Occupied(self.kind.colors());
        (0..MATRIX_SIZE).flat_map(move |row| {
            (0..MATRIX_SIZE).filter_map(move |col| {
                self.kind
                    .is_filled(self.rotation, row, col)
                    .then(|| PlacedCell {
                        x: self.x + col as i32,
                        y: self.y + row as i32,
                        cell,
                    })
            })
        })
    }

    pub fn nudged_down(self) -> Self {
        Self { y: self.y + 1, ..self }
    }

    pub fn nudged_left(self) -> Self {
        Self { x: self.x - 1, ..self }
    }

    pub fn nudged_right(self) -> Self {
        Self { x: self.x + 1, ..self }
    }

    /// Shift horizontally by `dx` columns
    pub fn shifted(self, dx: i32) -> Self {
        Self {
            x: self.x + dx,
            ..self
        }
    }

    /// Advance the rotation index one step, wrapping at both ends
    pub fn rotated(self, direction: RotationDirection) -> Self {
        Self {
            rotation: cycle(self.rotation, self.kind.rotation_count(), direction.step()),
            ..self
        }
    }

    /// A placement fits when every cell is inside the columns, above the floor,
    /// and (for cells on the field) not on top of an occupied grid cell.
    /// Cells above the field only have to respect the side walls.
    pub fn fits(&self, grid: &Grid) -> bool {
        self.cells().all(|c| {
            c.x >= 0
                && c.x < BOARD_WIDTH as i32
                && c.y < BOARD_HEIGHT as i32
                && (c.y < 0 || !grid.is_occupied(c.x, c.y))
        })
    }

    /// Whether any on-field cell sits on an occupied grid cell
    pub fn overlaps(&self, grid: &Grid) -> bool {
        self.cells().any(|c| grid.is_occupied(c.x, c.y))
    }

    /// Lowest placement reachable by repeated downward nudges
    pub fn dropped(self, grid: &Grid) -> Self {
        let mut landed = self;
        while landed.nudged_down().fits(grid) {
            landed = landed.nudged_down();
        }
        landed
    }
}

/// Step a rotation index by `step` within `0..count`, wrapping around
pub fn cycle(index: usize, count: usize, step: i32) -> usize {
    let count = count.max(1) as i32;
    (index as i32 + step).rem_euclid(count) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Colors;
    use proptest::prelude::*;
    use ratatui::style::Color;

    const GRAY: Cell = Cell::Occupied(Colors::new(Color::Gray, Color::DarkGray));

    #[test]
    fn test_spawn_position() {
        let piece = Placement::spawn(PieceKind::T, 0);
        assert_eq!((piece.x, piece.y), (3, -2));
        let piece = Placement::spawn(PieceKind::I, 0);
        assert_eq!((piece.x, piece.y), (3, -1));
    }

    #[test]
    fn test_cells_translate_matrix() {
        let piece = Placement::new(PieceKind::O, 0, 4, 10);
        let mut positions: Vec<_> = piece.cells().map(|c| (c.x, c.y)).collect();
        positions.sort();
        assert_eq!(positions, vec![(5, 12), (5, 13), (6, 12), (6, 13)]);
    }

    #[test]
    fn test_cells_include_off_field_rows() {
        let piece = Placement::new(PieceKind::I, 1, 3, -3);
        assert_eq!(piece.cells().filter(|c| c.y < 0).count(), 3);
    }

    #[test]
    fn test_cycle_wraps_both_ends() {
        assert_eq!(cycle(3, 4, 1), 0);
        assert_eq!(cycle(0, 4, -1), 3);
        assert_eq!(cycle(1, 2, 1), 0);
        assert_eq!(cycle(0, 1, 1), 0);
        assert_eq!(cycle(0, 1, -1), 0);
    }

    #[test]
    fn test_rotated_uses_piece_rotation_count() {
        let piece = Placement::spawn(PieceKind::S, 1);
        assert_eq!(piece.rotated(RotationDirection::Clockwise).rotation, 0);
        assert_eq!(piece.rotated(RotationDirection::CounterClockwise).rotation, 0);
    }

    #[test]
    fn test_fits_rejects_walls_and_floor() {
        let grid = Grid::new();
        assert!(Placement::new(PieceKind::I, 0, 0, 5).fits(&grid));
        assert!(!Placement::new(PieceKind::I, 0, -1, 5).fits(&grid));
        assert!(!Placement::new(PieceKind::I, 0, 7, 5).fits(&grid));
        assert!(!Placement::new(PieceKind::I, 0, 3, 19).fits(&grid));
    }

    #[test]
    fn test_fits_ignores_grid_above_field() {
        let mut grid = Grid::new();
        grid.set(5, 0, GRAY);
        // I vertical at column 5, rows -3..=0 overlaps only at row 0
        assert!(!Placement::new(PieceKind::I, 1, 3, -3).fits(&grid));
        assert!(Placement::new(PieceKind::I, 1, 3, -4).fits(&grid));
    }

    #[test]
    fn test_fits_rejects_stack_overlap() {
        let mut grid = Grid::new();
        grid.set(4, 10, GRAY);
        assert!(!Placement::new(PieceKind::O, 0, 3, 8).fits(&grid));
        assert!(Placement::new(PieceKind::O, 0, 5, 8).fits(&grid));
    }

    #[test]
    fn test_dropped_lands_on_floor() {
        let landed = Placement::spawn(PieceKind::I, 0).dropped(&Grid::new());
        assert_eq!(landed.y, 18);
        assert!(landed.cells().all(|c| c.y == 19 && (3..=6).contains(&c.x)));
    }

    #[test]
    fn test_dropped_lands_on_stack() {
        let mut grid = Grid::new();
        grid.set(4, 15, GRAY);
        let landed = Placement::spawn(PieceKind::O, 0).dropped(&grid);
        // O occupies matrix rows 2-3, so its bottom cells rest on row 14
        assert_eq!(landed.y, 11);
    }

    fn arb_kind() -> impl Strategy<Value = PieceKind> {
        (0usize..7).prop_map(|i| PieceKind::all()[i])
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        prop::collection::vec(prop::bool::weighted(0.2), BOARD_WIDTH * BOARD_HEIGHT).prop_map(
            |bits| {
                let mut grid = Grid::new();
                for (i, filled) in bits.into_iter().enumerate() {
                    if filled {
                        grid.set((i % BOARD_WIDTH) as i32, (i / BOARD_WIDTH) as i32, GRAY);
                    }
                }
                grid
            },
        )
    }

    proptest! {
        #[test]
        fn fits_iff_no_cell_is_outside_or_on_the_stack(
            kind in arb_kind(),
            rotation in 0usize..4,
            x in -5i32..12,
            y in -6i32..23,
            grid in arb_grid(),
        ) {
            let piece = Placement::new(kind, rotation, x, y);
            let matrix = kind.matrix(rotation);
            let mut blocked = false;
            for (row, cells) in matrix.iter().enumerate() {
                for (col, cell) in cells.iter().enumerate() {
                    if cell.is_empty() {
                        continue;
                    }
                    let (cx, cy) = (x + col as i32, y + row as i32);
                    let outside = cx < 0 || cx >= BOARD_WIDTH as i32 || cy >= BOARD_HEIGHT as i32;
                    blocked |= outside || grid.is_occupied(cx, cy);
                }
            }
            prop_assert_eq!(piece.fits(&grid), !blocked);
        }
    }
}

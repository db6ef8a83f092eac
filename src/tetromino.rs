//! Tetromino catalog
//!
//! The seven piece kinds, each an ordered list of 4x4 rotation matrices.
//! The catalog is immutable and total over the seven kinds.

use crate::board::{Cell, Colors};
use ratatui::style::Color;

/// Side length of every rotation matrix
pub const MATRIX_SIZE: usize = 4;

/// A rotation state: 4x4 cells, row-major, row 0 on top
pub type Matrix = [[Cell; MATRIX_SIZE]; MATRIX_SIZE];

/// A rotation state as bit rows; bit 3 is column 0
type Mask = [u8; MATRIX_SIZE];

/// The 7 piece kinds, in canonical catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

const I_ROTATIONS: [Mask; 2] = [
    [0b0000, 0b1111, 0b0000, 0b0000],
    [0b0010, 0b0010, 0b0010, 0b0010],
];

const O_ROTATIONS: [Mask; 1] = [[0b0000, 0b0000, 0b0110, 0b0110]];

const T_ROTATIONS: [Mask; 4] = [
    [0b0000, 0b0000, 0b0100, 0b1110],
    [0b0000, 0b0100, 0b0110, 0b0100],
    [0b0000, 0b0000, 0b1110, 0b0100],
    [0b0000, 0b0100, 0b1100, 0b0100],
];

const S_ROTATIONS: [Mask; 2] = [
    [0b0000, 0b0000, 0b0110, 0b1100],
    [0b0000, 0b1000, 0b1100, 0b0100],
];

const Z_ROTATIONS: [Mask; 2] = [
    [0b0000, 0b0000, 0b1100, 0b0110],
    [0b0000, 0b0010, 0b0110, 0b0100],
];

const J_ROTATIONS: [Mask; 4] = [
    [0b0000, 0b0000, 0b1110, 0b0010],
    [0b0000, 0b0100, 0b0100, 0b1100],
    [0b0000, 0b0000, 0b1000, 0b1110],
    [0b0000, 0b1100, 0b1000, 0b1000],
];

const L_ROTATIONS: [Mask; 4] = [
    [0b0000, 0b0000, 0b1110, 0b1000],
    [0b0000, 0b1100, 0b0100, 0b0100],
    [0b0000, 0b0000, 0b0010, 0b1110],
    [0b0000, 0b1000, 0b1000, 0b1100],
];

impl PieceKind {
    /// All kinds in canonical order (index 1 is O, index 3 is S)
    pub fn all() -> [PieceKind; 7] {
        [
            PieceKind::I,
            PieceKind::O,
            PieceKind::T,
            PieceKind::S,
            PieceKind::Z,
            PieceKind::J,
            PieceKind::L,
        ]
    }

    /// Get the color pair used for this piece's cells
    pub fn colors(&self) -> Colors {
        match self {
            PieceKind::I => Colors::new(Color::Red, Color::Rgb(139, 0, 0)),
            PieceKind::O => Colors::new(Color::Yellow, Color::Rgb(165, 42, 42)),
            PieceKind::T => Colors::new(Color::Cyan, Color::Rgb(0, 139, 139)),
            PieceKind::S => Colors::new(Color::Magenta, Color::Rgb(128, 0, 128)),
            PieceKind::Z => Colors::new(Color::Green, Color::Rgb(0, 100, 0)),
            PieceKind::J => Colors::new(Color::LightBlue, Color::Blue),
            PieceKind::L => Colors::new(Color::Rgb(255, 165, 0), Color::Rgb(165, 42, 42)),
        }
    }

    fn masks(&self) -> &'static [Mask] {
        match self {
            PieceKind::I => &I_ROTATIONS,
            PieceKind::O => &O_ROTATIONS,
            PieceKind::T => &T_ROTATIONS,
            PieceKind::S => &S_ROTATIONS,
            PieceKind::Z => &Z_ROTATIONS,
            PieceKind::J => &J_ROTATIONS,
            PieceKind::L => &L_ROTATIONS,
        }
    }

    /// Number of distinct rotation states (1 for O, 2 for I/S/Z, 4 otherwise)
    pub fn rotation_count(&self) -> usize {
        self.masks().len()
    }

    /// Whether the matrix cell at (row, col) is filled for a rotation.
    /// Rotation indices wrap, so any index is accepted.
    pub fn is_filled(&self, rotation: usize, row: usize, col: usize) -> bool {
        let masks = self.masks();
        let mask = masks[rotation % masks.len()];
        row < MATRIX_SIZE && col < MATRIX_SIZE && mask[row] & (0b1000 >> col) != 0
    }

    /// Materialize one rotation state as a 4x4 matrix of cells
    pub fn matrix(&self, rotation: usize) -> Matrix {
        let filled = Cell::Occupied(self.colors());
        let mut matrix = [[Cell::Empty; MATRIX_SIZE]; MATRIX_SIZE];
        for (row, cells) in matrix.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                if self.is_filled(rotation, row, col) {
                    *cell = filled;
                }
            }
        }
        matrix
    }

    /// Spawn row: the I matrix sits one row higher in its box than the others
    pub fn spawn_row(&self) -> i32 {
        match self {
            PieceKind::I => -1,
            _ => -2,
        }
    }

    /// Single-letter name
    pub fn name(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// Step applied to the rotation index
    pub fn step(&self) -> i32 {
        match self {
            RotationDirection::Clockwise => 1,
            RotationDirection::CounterClockwise => -1,
        }
    }
}

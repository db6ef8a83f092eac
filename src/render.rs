//! Read-only view of a state for drawing
//!
//! The authoritative grid only knows empty and occupied. The view grid also
//! marks the active piece while it sits in its lock delay, and the ghost piece.

use crate::board::{merge_grids, Cell, Colors, Grid, PlacedCell, Tile};
use crate::game::GameState;
use crate::piece::Placement;
use ratatui::style::{Color, Style, Stylize};

/// A cell as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewCell {
    #[default]
    Empty,
    Filled {
        colors: Colors,
        is_locking: bool,
        is_ghost: bool,
    },
}

impl Tile for ViewCell {
    fn is_vacant(&self) -> bool {
        matches!(self, ViewCell::Empty)
    }
}

impl ViewCell {
    fn settled(colors: Colors) -> Self {
        ViewCell::Filled {
            colors,
            is_locking: false,
            is_ghost: false,
        }
    }

    /// Display color: the locking color during lock delay, else the base color
    pub fn color(&self) -> Option<Color> {
        match *self {
            ViewCell::Empty => None,
            ViewCell::Filled {
                colors, is_locking, ..
            } => Some(if is_locking { colors.locking } else { colors.base }),
        }
    }

    /// Terminal style for the cell; ghost cells are dimmed
    pub fn style(&self) -> Style {
        match (*self, self.color()) {
            (ViewCell::Filled { is_ghost: true, .. }, Some(color)) => Style::default().fg(color).dim(),
            (_, Some(color)) => Style::default().fg(color),
            (_, None) => Style::default(),
        }
    }
}

fn piece_cells(
    piece: Placement,
    is_locking: bool,
    is_ghost: bool,
) -> impl Iterator<Item = PlacedCell<ViewCell>> {
    let colors = piece.kind.colors();
    piece.cells().map(move |placed| PlacedCell {
        x: placed.x,
        y: placed.y,
        cell: ViewCell::Filled {
            colors,
            is_locking,
            is_ghost,
        },
    })
}

/// Compose the environment, the active piece and the ghost into one grid.
/// The active piece covers the environment; both cover the ghost.
pub fn view(state: &GameState) -> Grid<ViewCell> {
    let environment = Grid::new().with_cells(state.environment.rows().iter().enumerate().flat_map(
        |(y, row)| {
            row.iter().enumerate().filter_map(move |(x, cell)| match *cell {
                Cell::Empty => None,
                Cell::Occupied(colors) => Some(PlacedCell {
                    x: x as i32,
                    y: y as i32,
                    cell: ViewCell::settled(colors),
                }),
            })
        },
    ));

    let active = state
        .active
        .map(|piece| Grid::new().with_cells(piece_cells(piece, state.is_locking, false)))
        .unwrap_or_default();
    let ghost = state
        .ghost
        .map(|piece| Grid::new().with_cells(piece_cells(piece, false, true)))
        .unwrap_or_default();

    merge_grids(&merge_grids(&active, &environment), &ghost)
}

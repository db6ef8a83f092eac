//! Wall kick offsets
//!
//! When a rotation (or a hold swap) cannot be placed where it is, the same
//! placement is retried one column to the right, then one column to the left.
//! The order is the same for both rotation directions.

use crate::board::Grid;
use crate::piece::Placement;

/// Column offsets tried in order: in place, right, left
pub const WALL_KICKS: [i32; 3] = [0, 1, -1];

/// Candidate placements for a target, in kick order
pub fn kick_candidates(target: Placement) -> impl Iterator<Item = Placement> {
    WALL_KICKS.into_iter().map(move |dx| target.shifted(dx))
}

/// First candidate that fits the grid, if any
pub fn first_fit(target: Placement, grid: &Grid) -> Option<Placement> {
    kick_candidates(target).find(|candidate| candidate.fits(grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Colors};
    use crate::tetromino::PieceKind;
    use ratatui::style::Color;

    #[test]
    fn test_first_kick_is_identity() {
        let target = Placement::new(PieceKind::T, 0, 4, 4);
        let first = kick_candidates(target).next();
        assert_eq!(first, Some(target));
    }

    #[test]
    fn test_kick_order_right_before_left() {
        let target = Placement::new(PieceKind::T, 0, 4, 4);
        let xs: Vec<_> = kick_candidates(target).map(|p| p.x).collect();
        assert_eq!(xs, vec![4, 5, 3]);
    }

    #[test]
    fn test_first_fit_kicks_off_left_wall() {
        // Vertical I with its column at x = -1 is outside; one step right fits
        let target = Placement::new(PieceKind::I, 1, -3, 5);
        assert_eq!(first_fit(target, &Grid::new()).map(|p| p.x), Some(-2));
    }

    #[test]
    fn test_first_fit_none_when_boxed_in() {
        let mut grid = Grid::new();
        let wall = Cell::Occupied(Colors::new(Color::Gray, Color::Gray));
        for y in 0..20 {
            for x in [3, 4, 5, 6, 7] {
                grid.set(x, y, wall);
            }
        }
        let target = Placement::new(PieceKind::I, 1, 3, 5);
        assert_eq!(first_fit(target, &grid), None);
    }
}

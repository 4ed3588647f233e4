use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::*;

/// Pieces in a row needed to win.
pub const LINE_LENGTH: usize = 4;

/// Direction of a winning line, in scan order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinAxis {
    Vertical,
    RisingDiagonal,
    Horizontal,
    FallingDiagonal,
}

impl WinAxis {
    pub const ALL: [WinAxis; 4] = [
        Self::Vertical,
        Self::RisingDiagonal,
        Self::Horizontal,
        Self::FallingDiagonal,
    ];

    /// `(column, row)` step; rows grow downward.
    const fn step(self) -> (i8, i8) {
        match self {
            Self::Vertical => (0, 1),
            Self::RisingDiagonal => (1, -1),
            Self::Horizontal => (1, 0),
            Self::FallingDiagonal => (1, 1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningPlay {
    positions: SmallVec<[Coord2; LINE_LENGTH]>,
    axis: WinAxis,
    player: Player,
}

impl WinningPlay {
    /// `(column, row)` of each piece in the line, starting from the scan origin.
    pub fn positions(&self) -> &[Coord2] {
        &self.positions
    }

    pub fn axis(&self) -> WinAxis {
        self.axis
    }

    pub fn player(&self) -> Player {
        self.player
    }
}

/// Scans the whole grid cell by cell, each axis in turn, returning the first full line.
pub(crate) fn find_winning_play(grid: &Array2<PieceColor>) -> Option<WinningPlay> {
    let (columns, rows) = grid.dim();
    for row in 0..rows {
        for column in 0..columns {
            let Some(player) = grid[[column, row]].player() else {
                continue;
            };
            let origin = (column as Coord, row as Coord);
            for axis in WinAxis::ALL {
                if let Some(positions) = walk_line(grid, origin, axis, player) {
                    return Some(WinningPlay {
                        positions,
                        axis,
                        player,
                    });
                }
            }
        }
    }
    None
}

fn walk_line(
    grid: &Array2<PieceColor>,
    origin: Coord2,
    axis: WinAxis,
    player: Player,
) -> Option<SmallVec<[Coord2; LINE_LENGTH]>> {
    let (columns, rows) = grid.dim();
    let (dx, dy) = axis.step();

    let mut positions = SmallVec::new();
    positions.push(origin);
    let mut current = origin;
    for _ in 1..LINE_LENGTH {
        let column = current.0.checked_add_signed(dx)?;
        let row = current.1.checked_add_signed(dy)?;
        if usize::from(column) >= columns || usize::from(row) >= rows {
            return None;
        }
        if grid[[usize::from(column), usize::from(row)]] != PieceColor::from(player) {
            return None;
        }
        current = (column, row);
        positions.push(current);
    }
    Some(positions)
}

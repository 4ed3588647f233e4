use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::*;

/// Player-visible state of one cell. Mines only show once revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
}

impl From<Cell> for CellView {
    fn from(cell: Cell) -> Self {
        match (cell.state(), cell.is_mine()) {
            (CellState::Hidden, _) => Self::Hidden,
            (CellState::Flagged, _) => Self::Flagged,
            (CellState::Revealed, true) => Self::Mine,
            (CellState::Revealed, false) => Self::Revealed(cell.adjacent_mines()),
        }
    }
}

/// Read-only snapshot of a [`Board`] for rendering or serialization.
///
/// `cells` is indexed `[x - 1, y - 1]`; prefer [`Observation::cell`] with grid coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ObservationData")]
pub struct Observation {
    pub size: Coord2,
    pub mine_count: CellCount,
    pub mines_remaining: isize,
    pub status: GameStatus,
    pub elapsed_secs: u64,
    pub triggered_mine: Option<Coord2>,
    pub cells: Array2<CellView>,
}

#[derive(Deserialize)]
struct ObservationData {
    size: Coord2,
    mine_count: CellCount,
    mines_remaining: isize,
    status: GameStatus,
    elapsed_secs: u64,
    triggered_mine: Option<Coord2>,
    cells: Array2<CellView>,
}

impl TryFrom<ObservationData> for Observation {
    type Error = GameError;

    fn try_from(data: ObservationData) -> Result<Self> {
        let obs = Self {
            size: data.size,
            mine_count: data.mine_count,
            mines_remaining: data.mines_remaining,
            status: data.status,
            elapsed_secs: data.elapsed_secs,
            triggered_mine: data.triggered_mine,
            cells: data.cells,
        };
        obs.validate()?;
        Ok(obs)
    }
}

impl Observation {
    pub fn from_board(board: &Board) -> Self {
        let (width, height) = board.size();
        let mut cells =
            Array2::from_elem((usize::from(width), usize::from(height)), CellView::Hidden);
        for ((x, y), cell) in board.cells() {
            cells[[usize::from(x) - 1, usize::from(y) - 1]] = cell.into();
        }

        Self {
            size: board.size(),
            mine_count: board.total_mines(),
            mines_remaining: board.mines_remaining(),
            status: board.status(),
            elapsed_secs: board.elapsed().as_secs(),
            triggered_mine: board.triggered_mine(),
            cells,
        }
    }

    /// Checks that `cells` matches `size` and the mine count fits on the board.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.size;
        if self.cells.dim() != (usize::from(width), usize::from(height)) {
            return Err(GameError::InvalidBoardShape);
        }
        if self.mine_count > mult(width, height) {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    pub fn cell(&self, (x, y): Coord2) -> Option<CellView> {
        let index = (usize::from(x).checked_sub(1)?, usize::from(y).checked_sub(1)?);
        self.cells.get(index).copied()
    }
}

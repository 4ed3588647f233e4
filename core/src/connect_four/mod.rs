use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::*;

pub use piece::*;
pub use win::*;

mod piece;
mod win;

pub const COLUMNS: Coord = 7;
pub const ROWS: Coord = 6;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Column full or game already won
    NoChange,
    Placed { row: Coord },
    Won { row: Coord },
}

impl DropOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectFourStatus {
    InProgress,
    Won(Player),
    /// Every column is full and nobody has four in a row
    Draw,
}

/// A 7x6 Connect Four board. Positions are `(column, row)`, row 0 at the top.
///
/// The board is its own snapshot: clone or serialize it to hand state to a caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConnectFourData")]
pub struct ConnectFour {
    grid: Array2<PieceColor>,
    current_turn: Player,
    winning_play: Option<WinningPlay>,
}

/// Unchecked serialized form of [`ConnectFour`].
#[derive(Deserialize)]
struct ConnectFourData {
    grid: Array2<PieceColor>,
    current_turn: Player,
    winning_play: Option<WinningPlay>,
}

impl TryFrom<ConnectFourData> for ConnectFour {
    type Error = GameError;

    fn try_from(data: ConnectFourData) -> Result<Self> {
        if data.grid.dim() != (usize::from(COLUMNS), usize::from(ROWS)) {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self {
            grid: data.grid,
            current_turn: data.current_turn,
            winning_play: data.winning_play,
        })
    }
}

impl ConnectFour {
    pub fn new() -> Self {
        Self {
            grid: Array2::default((usize::from(COLUMNS), usize::from(ROWS))),
            current_turn: Player::Red,
            winning_play: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
        log::debug!("Connect Four board reset");
    }

    pub fn current_turn(&self) -> Player {
        self.current_turn
    }

    pub fn winning_play(&self) -> Option<&WinningPlay> {
        self.winning_play.as_ref()
    }

    pub fn status(&self) -> ConnectFourStatus {
        if let Some(play) = &self.winning_play {
            ConnectFourStatus::Won(play.player())
        } else if (0..COLUMNS).all(|column| self.lowest_empty_row(column).is_none()) {
            ConnectFourStatus::Draw
        } else {
            ConnectFourStatus::InProgress
        }
    }

    pub fn piece_at(&self, (column, row): Coord2) -> Result<PieceColor> {
        if column >= COLUMNS || row >= ROWS {
            return Err(GameError::InvalidCoords);
        }
        Ok(self.grid[[usize::from(column), usize::from(row)]])
    }

    /// Rows from top to bottom, each listed left to right.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = PieceColor> + '_> + '_ {
        self.grid
            .axis_iter(Axis(1))
            .map(|row| row.into_iter().copied())
    }

    pub fn is_column_full(&self, column: Coord) -> Result<bool> {
        let column = validate_column(column)?;
        Ok(self.lowest_empty_row(column).is_none())
    }

    /// Drops the current player's piece into `column`; it settles in the lowest empty row.
    pub fn drop_piece(&mut self, column: Coord) -> Result<DropOutcome> {
        let column = validate_column(column)?;

        if self.winning_play.is_some() {
            log::debug!("Ignoring drop in column {}, game already won", column);
            return Ok(DropOutcome::NoChange);
        }
        let Some(row) = self.lowest_empty_row(column) else {
            log::debug!("Ignoring drop in full column {}", column);
            return Ok(DropOutcome::NoChange);
        };

        let player = self.current_turn;
        self.grid[[usize::from(column), usize::from(row)]] = player.into();
        log::debug!("{:?} dropped at {:?}", player, (column, row));

        if let Some(play) = find_winning_play(&self.grid) {
            log::debug!(
                "{:?} wins along {:?} at {:?}",
                play.player(),
                play.axis(),
                play.positions()
            );
            self.winning_play = Some(play);
            Ok(DropOutcome::Won { row })
        } else {
            self.current_turn = player.opponent();
            Ok(DropOutcome::Placed { row })
        }
    }

    fn lowest_empty_row(&self, column: Coord) -> Option<Coord> {
        (0..ROWS)
            .rev()
            .find(|&row| self.grid[[usize::from(column), usize::from(row)]].is_blank())
    }
}

impl Default for ConnectFour {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_column(column: Coord) -> Result<Coord> {
    if column < COLUMNS {
        Ok(column)
    } else {
        Err(GameError::InvalidColumn)
    }
}

use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board dimensions must be positive")]
    EmptyBoard,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Invalid column")]
    InvalidColumn,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

/// Broad category of a [`GameError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad dimensions, grid shape or mine density.
    InvalidConfiguration,
    /// Coordinates or column out of bounds.
    InvalidInput,
    /// Move attempted on a board that no longer accepts it.
    InvalidState,
}

impl GameError {
    pub const fn kind(self) -> ErrorKind {
        use GameError::*;
        match self {
            EmptyBoard | TooManyMines | InvalidBoardShape => ErrorKind::InvalidConfiguration,
            InvalidCoords | InvalidColumn => ErrorKind::InvalidInput,
            AlreadyEnded => ErrorKind::InvalidState,
        }
    }
}

pub type Result<T> = core::result::Result<T, GameError>;

use serde::{Deserialize, Serialize};

/// A side that takes turns dropping pieces.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[default]
    Red,
    Yellow,
}

impl Player {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Yellow,
            Self::Yellow => Self::Red,
        }
    }
}

/// Content of one board slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceColor {
    #[default]
    Blank,
    Red,
    Yellow,
}

impl PieceColor {
    pub const fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }

    pub const fn player(self) -> Option<Player> {
        match self {
            Self::Blank => None,
            Self::Red => Some(Player::Red),
            Self::Yellow => Some(Player::Yellow),
        }
    }
}

impl From<Player> for PieceColor {
    fn from(player: Player) -> Self {
        match player {
            Player::Red => Self::Red,
            Player::Yellow => Self::Yellow,
        }
    }
}

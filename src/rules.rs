use serde::{Deserialize, Serialize};


// Pieces removed from the stronger player's (Gote's) camp in a handicap game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Handicap {
    Lance,
    Bishop,
    Rook,
    RookAndLance,
    TwoPieces,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum StartingPosition {
    Standard,
    Handicap(Handicap),
    Sfen(String),
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ShogiRules {
    pub starting_position: StartingPosition,
}

impl ShogiRules {
    pub fn standard() -> Self {
        Self { starting_position: StartingPosition::Standard }
    }

    pub fn from_sfen(sfen: &str) -> Self {
        Self { starting_position: StartingPosition::Sfen(sfen.to_owned()) }
    }
}

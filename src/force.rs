use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;


// Sente (先手) moves first and is player 1; Gote (後手) is player 2.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter, Serialize,
    Deserialize,
)]
pub enum Force {
    Sente,
    Gote,
}

impl Force {
    pub fn opponent(self) -> Force {
        match self {
            Force::Sente => Force::Gote,
            Force::Gote => Force::Sente,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Force::Sente => 1,
            Force::Gote => 2,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Force::Sente),
            2 => Some(Force::Gote),
            _ => None,
        }
    }

    // Rank index delta of a single step forward. Rank 1 (index 0) is Gote's back rank.
    pub fn forward(self) -> i8 {
        match self {
            Force::Sente => -1,
            Force::Gote => 1,
        }
    }
}

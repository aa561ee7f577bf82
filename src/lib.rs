#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod board;
pub mod coord;
pub mod error;
pub mod force;
pub mod game;
pub mod grid;
pub mod hand;
pub mod movement;
pub mod notation;
pub mod outcome;
pub mod piece;
pub mod player;
pub mod rules;
pub mod sfen;
pub mod starter;
pub mod test_util;
pub mod util;

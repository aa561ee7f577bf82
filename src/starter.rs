use crate::board::Position;
use crate::coord::Coord;
use crate::rules::{Handicap, StartingPosition};
use crate::sfen::parse_sfen;


pub const STANDARD_SFEN: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

// Squares emptied in Gote's camp. Gote is the handicap giver (上手) and moves first.
fn handicap_squares(handicap: Handicap) -> &'static [(u8, u8)] {
    match handicap {
        Handicap::Lance => &[(1, 1)],
        Handicap::Bishop => &[(2, 2)],
        Handicap::Rook => &[(8, 2)],
        Handicap::RookAndLance => &[(8, 2), (1, 1)],
        Handicap::TwoPieces => &[(8, 2), (2, 2)],
    }
}

pub fn standard_position() -> Position {
    // The constant is covered by tests, so parsing cannot fail here.
    parse_sfen(STANDARD_SFEN).unwrap_or_else(|err| panic!("bad built-in SFEN: {err}"))
}

pub fn handicap_position(handicap: Handicap) -> Position {
    let mut position = standard_position();
    for &(file, rank) in handicap_squares(handicap) {
        position.grid_mut().remove(Coord::at(file, rank));
    }
    position.pass_turn();
    position
}

pub fn generate_starting_position(
    starting_position: &StartingPosition,
) -> Result<Position, String> {
    match starting_position {
        StartingPosition::Standard => Ok(standard_position()),
        StartingPosition::Handicap(handicap) => Ok(handicap_position(*handicap)),
        StartingPosition::Sfen(sfen) => parse_sfen(sfen),
    }
}

// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use itertools::Itertools;
use shogi_rules::board::Position;
use shogi_rules::coord::{Coord, SquareId};
use shogi_rules::force::Force;
use shogi_rules::game::ShogiMatch;
use shogi_rules::piece::{Piece, PieceKind};
use shogi_rules::rules::ShogiRules;
use shogi_rules::sfen::parse_sfen;
use shogi_rules::test_util::sample_players;


#[derive(Clone, Copy, Debug)]
pub struct PieceMatcher {
    pub kind: PieceKind,
    pub force: Force,
}

pub trait PieceIs {
    fn is(self, matcher: PieceMatcher) -> bool;
}

impl PieceIs for Option<Piece> {
    fn is(self, matcher: PieceMatcher) -> bool {
        self.is_some_and(|piece| piece.kind == matcher.kind && piece.force == matcher.force)
    }
}

#[macro_export]
macro_rules! piece {
    ($force:ident $kind:ident) => {
        common::PieceMatcher {
            force: shogi_rules::force::Force::$force,
            kind: shogi_rules::piece::PieceKind::$kind,
        }
    };
}

#[allow(dead_code)]
pub fn sq(s: &str) -> SquareId { SquareId::parse(s).unwrap() }

#[allow(dead_code)]
pub fn at(s: &str) -> Coord { Coord::from_id(sq(s)).unwrap() }

// Board drawn from Sente's side: nine rows (rank 1 first) of nine tokens (file 9 first). A token
// is "." for an empty square or an SFEN piece such as "p", "K" or "+R".
#[allow(dead_code)]
pub fn parse_board(board_str: &str, active_force: Force, hand: &str) -> Position {
    let rows = board_str
        .split('\n')
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.split_ascii_whitespace().collect_vec())
        .collect_vec();
    assert_eq!(rows.len(), 9);
    assert!(rows.iter().all(|row| row.len() == 9));
    let board = rows
        .iter()
        .map(|row| {
            row.iter()
                .chunk_by(|token| **token == ".")
                .into_iter()
                .map(|(empty, mut group)| {
                    if empty { group.count().to_string() } else { group.join("") }
                })
                .join("")
        })
        .join("/");
    let side = match active_force {
        Force::Sente => "b",
        Force::Gote => "w",
    };
    parse_sfen(&format!("{} {} {}", board, side, hand)).unwrap()
}

#[allow(dead_code)]
pub fn match_from_position(position: Position) -> ShogiMatch {
    ShogiMatch::new_with_position(ShogiRules::standard(), sample_players(), position)
}

#[allow(dead_code)]
pub fn standard_match() -> ShogiMatch {
    ShogiMatch::new(ShogiRules::standard(), sample_players()).unwrap()
}

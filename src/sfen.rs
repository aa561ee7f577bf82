// SFEN: the shogi variant of FEN used by USI engines.
//
//   <board> <side to move> [<hand> [<move number>]]
//
// The board lists ranks 1 to 9, each from file 9 to file 1. Sente pieces are uppercase, Gote
// pieces lowercase, "+" marks a promoted piece. The hand is "-" or a list of pieces with
// optional counts, e.g. "2Pb".

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::board::Position;
use crate::coord::{Coord, File, NUM_RANKS, Rank};
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::{Piece, PieceId, PieceKind, piece_from_ascii, piece_to_ascii};
use crate::util::as_single_char;


// Conventional order of hand pieces in SFEN.
const HAND_ORDER: [PieceKind; 7] = [
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Gold,
    PieceKind::Silver,
    PieceKind::Knight,
    PieceKind::Lance,
    PieceKind::Pawn,
];

fn force_to_sfen(force: Force) -> char {
    match force {
        Force::Sente => 'b',
        Force::Gote => 'w',
    }
}
fn force_from_sfen(s: &str) -> Result<Force, String> {
    let ch = as_single_char(s).ok_or_else(|| format!("invalid side to move: {}", s))?;
    match ch {
        'b' => Ok(Force::Sente),
        'w' => Ok(Force::Gote),
        _ => Err(format!("invalid side to move: {}", ch)),
    }
}

fn piece_to_sfen(piece: Piece) -> String {
    let ch = piece_to_ascii(piece.kind, piece.force);
    if piece.kind.is_promoted() { format!("+{}", ch) } else { ch.to_string() }
}

fn parse_rank(
    rank: Rank, notation: &str, grid: &mut Grid, next_id: &mut PieceId,
) -> Result<(), String> {
    let mut files = File::all().rev();
    let mut promoted = false;
    for ch in notation.chars() {
        if ch == '+' {
            if promoted {
                return Err(format!("double promotion marker in rank {}", rank.to_number()));
            }
            promoted = true;
            continue;
        }
        if let Some(empty) = ch.to_digit(10) {
            if promoted || empty == 0 {
                return Err(format!("invalid rank notation: {}", notation));
            }
            for _ in 0..empty {
                files.next().ok_or_else(|| format!("too many files in rank {}", rank.to_number()))?;
            }
            continue;
        }
        let (base, force) = piece_from_ascii(ch).ok_or_else(|| format!("invalid piece: {}", ch))?;
        let kind = if promoted {
            base.promoted().ok_or_else(|| format!("piece cannot be promoted: {}", ch))?
        } else {
            base
        };
        promoted = false;
        let file =
            files.next().ok_or_else(|| format!("too many files in rank {}", rank.to_number()))?;
        grid.place(Coord::new(file, rank), Piece::new(next_id.inc(), kind, force));
    }
    if promoted {
        return Err(format!("dangling promotion marker in rank {}", rank.to_number()));
    }
    if files.next().is_some() {
        return Err(format!("too few files in rank {}", rank.to_number()));
    }
    Ok(())
}

fn parse_hand(
    notation: &str, position: &mut Position, next_id: &mut PieceId,
) -> Result<(), String> {
    if notation == "-" {
        return Ok(());
    }
    let mut count: Option<u32> = None;
    for ch in notation.chars() {
        if let Some(digit) = ch.to_digit(10) {
            count = count
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|c| c.checked_add(digit))
                .map(Some)
                .ok_or_else(|| format!("invalid hand piece count in {}", notation))?;
            continue;
        }
        let (kind, force) =
            piece_from_ascii(ch).ok_or_else(|| format!("invalid hand piece: {}", ch))?;
        if kind == PieceKind::King {
            return Err("king cannot be in hand".to_owned());
        }
        let count = count.take().unwrap_or(1);
        if count == 0 || count > 18 {
            return Err(format!("invalid hand piece count: {}", count));
        }
        for _ in 0..count {
            position.hand_mut(force).push(Piece::new(next_id.inc(), kind, force));
        }
    }
    if count.is_some() {
        return Err(format!("hand ends with a count: {}", notation));
    }
    Ok(())
}

fn validate_kings(grid: &Grid) -> Result<(), String> {
    for force in Force::iter() {
        let kings = grid
            .pieces()
            .filter(|(_, piece)| piece.kind == PieceKind::King && piece.force == force)
            .count();
        if kings > 1 {
            return Err(format!("multiple kings for player {}", force.number()));
        }
    }
    Ok(())
}

// Piece ids are assigned in reading order: board first, then Sente's and Gote's hand pieces as
// they are listed.
pub fn parse_sfen(sfen: &str) -> Result<Position, String> {
    let tokens = sfen.split_whitespace().collect_vec();
    let (board_notation, side_notation, hand_notation) = match tokens.as_slice() {
        [board, side] => (*board, *side, "-"),
        [board, side, hand] => (*board, *side, *hand),
        [board, side, hand, move_number] => {
            move_number
                .parse::<u32>()
                .map_err(|_| format!("invalid move number: {}", move_number))?;
            (*board, *side, *hand)
        }
        _ => return Err(format!("expected 2 to 4 fields, found {}", tokens.len())),
    };

    let ranks = board_notation.split('/').collect_vec();
    if ranks.len() != NUM_RANKS as usize {
        return Err(format!("expected {} ranks, found {}", NUM_RANKS, ranks.len()));
    }
    let mut next_id = PieceId::new();
    let mut grid = Grid::new();
    for (rank, notation) in Rank::all().zip(ranks) {
        parse_rank(rank, notation, &mut grid, &mut next_id)?;
    }
    validate_kings(&grid)?;

    let active_force = force_from_sfen(side_notation)?;
    let mut position = Position::with_empty_hands(grid, active_force);
    parse_hand(hand_notation, &mut position, &mut next_id)?;
    Ok(position)
}

fn hand_to_sfen(position: &Position) -> String {
    let mut s = String::new();
    for force in Force::iter() {
        let hand = position.hand(force);
        for kind in HAND_ORDER {
            match hand.count(kind) {
                0 => {}
                1 => s.push(piece_to_ascii(kind, force)),
                n => s.push_str(&format!("{}{}", n, piece_to_ascii(kind, force))),
            }
        }
    }
    if s.is_empty() { "-".to_owned() } else { s }
}

pub fn position_to_sfen(position: &Position, move_number: u32) -> String {
    let grid = position.grid();
    let board_notation = Rank::all()
        .map(|rank| {
            let mut rank_notation = String::new();
            let mut empty_count: u8 = 0;
            for file in File::all().rev() {
                match grid[Coord::new(file, rank)] {
                    Some(piece) => {
                        if empty_count > 0 {
                            rank_notation.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        rank_notation.push_str(&piece_to_sfen(piece));
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                rank_notation.push_str(&empty_count.to_string());
            }
            rank_notation
        })
        .join("/");
    format!(
        "{} {} {} {}",
        board_notation,
        force_to_sfen(position.active_force()),
        hand_to_sfen(position),
        move_number
    )
}

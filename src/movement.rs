// Destination generation. Everything here is pseudo-legal: a destination may still leave the
// mover's own king in check, which is the business of `board`.

use itertools::Itertools;

use crate::coord::{Coord, SubjectiveRank, between};
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::{Piece, PieceKind};


// Offsets are (file, forward) pairs: positive "forward" points towards the opponent.
type Offset = (i8, i8);

const ORTHOGONAL: [Offset; 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [Offset; 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];
const ALL_NEIGHBOURS: [Offset; 8] =
    [(0, 1), (0, -1), (1, 0), (-1, 0), (1, 1), (-1, 1), (1, -1), (-1, -1)];
const GOLD_STEPS: [Offset; 6] = [(0, 1), (1, 1), (-1, 1), (1, 0), (-1, 0), (0, -1)];
const SILVER_STEPS: [Offset; 5] = [(0, 1), (1, 1), (-1, 1), (1, -1), (-1, -1)];
const KNIGHT_JUMPS: [Offset; 2] = [(1, 2), (-1, 2)];
const FORWARD: [Offset; 1] = [(0, 1)];


fn apply_offset(from: Coord, force: Force, (d_file, d_forward): Offset) -> Option<Coord> {
    from.offset(d_file, d_forward * force.forward())
}

// Squares exactly one application of each offset away (knight jumps count as one).
pub fn squares_at_offsets(from: Coord, force: Force, offsets: &[Offset]) -> Vec<Coord> {
    offsets.iter().filter_map(|&offset| apply_offset(from, force, offset)).collect()
}

// All squares along the direction up to the edge of the board, ignoring occupancy.
pub fn squares_in_direction(from: Coord, force: Force, offset: Offset) -> Vec<Coord> {
    let mut squares = Vec::new();
    let mut pos = from;
    while let Some(next) = apply_offset(pos, force, offset) {
        squares.push(next);
        pos = next;
    }
    squares
}

pub fn not_own(grid: &Grid, force: Force, squares: Vec<Coord>) -> Vec<Coord> {
    squares.into_iter().filter(|&to| !grid.is_occupied_by(to, force)).collect()
}

// Keeps the squares with nothing strictly between `from` and them: a sliding piece stops at
// the first obstacle (which it may capture if it is not its own).
pub fn unblocked(grid: &Grid, from: Coord, squares: Vec<Coord>) -> Vec<Coord> {
    squares
        .into_iter()
        .filter(|&to| between(from, to).into_iter().all(|pos| grid.is_empty(pos)))
        .collect()
}

fn steps(grid: &Grid, from: Coord, force: Force, offsets: &[Offset]) -> Vec<Coord> {
    not_own(grid, force, squares_at_offsets(from, force, offsets))
}

fn slides(grid: &Grid, from: Coord, force: Force, directions: &[Offset]) -> Vec<Coord> {
    let candidates = directions
        .iter()
        .flat_map(|&dir| squares_in_direction(from, force, dir))
        .collect_vec();
    unblocked(grid, from, not_own(grid, force, candidates))
}

// Where the piece standing on `from` (or about to stand there) could go.
pub fn piece_destinations(grid: &Grid, piece: Piece, from: Coord) -> Vec<Coord> {
    use PieceKind::*;
    let force = piece.force;
    match piece.kind {
        Pawn => steps(grid, from, force, &FORWARD),
        Knight => steps(grid, from, force, &KNIGHT_JUMPS),
        Silver => steps(grid, from, force, &SILVER_STEPS),
        Gold | Tokin | PromotedLance | PromotedKnight | PromotedSilver => {
            steps(grid, from, force, &GOLD_STEPS)
        }
        King => steps(grid, from, force, &ALL_NEIGHBOURS),
        Lance => slides(grid, from, force, &FORWARD),
        Bishop => slides(grid, from, force, &DIAGONAL),
        Rook => slides(grid, from, force, &ORTHOGONAL),
        Horse => {
            let mut squares = slides(grid, from, force, &DIAGONAL);
            squares.extend(steps(grid, from, force, &ORTHOGONAL));
            squares
        }
        Dragon => {
            let mut squares = slides(grid, from, force, &ORTHOGONAL);
            squares.extend(steps(grid, from, force, &DIAGONAL));
            squares
        }
    }
}

pub fn destinations(grid: &Grid, from: Coord) -> Vec<Coord> {
    match grid[from] {
        Some(piece) => piece_destinations(grid, piece, from),
        None => Vec::new(),
    }
}

pub fn can_move_from(grid: &Grid, from: Coord) -> bool { !destinations(grid, from).is_empty() }

pub fn can_move_to(grid: &Grid, from: Coord, to: Coord) -> bool {
    destinations(grid, from).contains(&to)
}

// Whether a piece of this kind standing on the square would ever be able to move again.
// Pawns and lances are stuck on the last rank, knights on the last two.
pub fn has_moves_from_rank(kind: PieceKind, force: Force, to: Coord) -> bool {
    let rank = to.subjective_rank(force);
    match kind {
        PieceKind::Pawn | PieceKind::Lance => rank < SubjectiveRank::last(),
        PieceKind::Knight => rank.ranks_to_last() >= 2,
        _ => true,
    }
}

// Squares where the piece must promote on arrival.
pub fn in_compulsory_promotion_zone(kind: PieceKind, force: Force, to: Coord) -> bool {
    kind.can_promote() && !has_moves_from_rank(kind, force, to)
}

// Move notation. Two systems are understood:
//
//   USI:            7g7f, 8h2b+, P*5e
//   Western/Hodges: P-76, S68-77, Bx22+, N-23=, P*55, +R-22
//
// Parsing needs a position: drops name a piece kind rather than a piece, and Hodges moves may
// omit the starting square when only one piece of that kind can reach the destination.

use std::fmt;

use itertools::Itertools;
use lazy_static::lazy_static;
use log::warn;
use regex_lite::Regex;

use crate::board::Position;
use crate::coord::{Coord, SquareId};
use crate::game::LastAction;
use crate::piece::{PieceId, PieceKind};
use crate::util::as_single_char;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    // `promote` is `None` when the notation does not say; the engine then promotes only where
    // it is compulsory.
    Move { from: Coord, to: Coord, promote: Option<bool> },
    Drop { piece_id: PieceId, to: Coord },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotationError {
    Malformed(String),
    PieceNotInHand(PieceKind),
    NoPieceCanMove,
    AmbiguousNotation,
    CaptureNotationRequiresCapture,
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotationError::Malformed(s) => write!(f, "cannot parse \"{}\"", s),
            NotationError::PieceNotInHand(kind) => {
                write!(f, "no {} in hand", kind.to_ascii())
            }
            NotationError::NoPieceCanMove => write!(f, "no piece can make that move"),
            NotationError::AmbiguousNotation => {
                write!(f, "more than one piece can make that move, add the starting square")
            }
            NotationError::CaptureNotationRequiresCapture => {
                write!(f, "capture notation used, but there is nothing to capture")
            }
        }
    }
}

lazy_static! {
    static ref USI_MOVE_RE: Regex = Regex::new(r"^([1-9][a-i])([1-9][a-i])(\+)?$").unwrap();
    static ref USI_DROP_RE: Regex = Regex::new(r"^([PLNSGBR])\*([1-9][a-i])$").unwrap();
    static ref HODGES_MOVE_RE: Regex =
        Regex::new(r"^(\+?[PLNSGBRK])([1-9]{2})?([-x])([1-9]{2})([+=])?$").unwrap();
    static ref HODGES_DROP_RE: Regex = Regex::new(r"^([PLNSGBR])\*([1-9]{2})$").unwrap();
}

fn malformed(notation: &str) -> NotationError { NotationError::Malformed(notation.to_owned()) }

fn hodges_square(s: &str) -> Option<Coord> { SquareId::parse(s).and_then(Coord::from_id) }

fn piece_kind(s: &str) -> Option<PieceKind> {
    match s.strip_prefix('+') {
        Some(base) => PieceKind::from_ascii(as_single_char(base)?)?.promoted(),
        None => PieceKind::from_ascii(as_single_char(s)?),
    }
}

fn promotion_suffix(s: Option<&str>) -> Option<bool> {
    match s {
        Some("+") => Some(true),
        Some("=") => Some(false),
        _ => None,
    }
}

fn drop_command(position: &Position, kind: PieceKind, to: Coord) -> Result<Command, NotationError> {
    let force = position.active_force();
    let piece = position
        .hand(force)
        .pieces()
        .iter()
        .find(|piece| piece.kind == kind)
        .ok_or(NotationError::PieceNotInHand(kind))?;
    Ok(Command::Drop { piece_id: piece.id, to })
}

fn resolve_move(
    position: &Position, kind: PieceKind, from: Option<Coord>, capturing: bool, to: Coord,
) -> Result<Coord, NotationError> {
    let force = position.active_force();
    let candidates = position
        .grid()
        .pieces()
        .filter(|&(coord, piece)| {
            piece.force == force
                && piece.kind == kind
                && from.is_none_or(|from| from == coord)
                && position.can_move_to(coord, to)
        })
        .map(|(coord, _)| coord)
        .collect_vec();
    let from = match candidates.as_slice() {
        [] => return Err(NotationError::NoPieceCanMove),
        [from] => *from,
        _ => return Err(NotationError::AmbiguousNotation),
    };
    if capturing && !position.grid().is_occupied_by(to, force.opponent()) {
        return Err(NotationError::CaptureNotationRequiresCapture);
    }
    Ok(from)
}

fn parse_usi(position: &Position, notation: &str) -> Option<Result<Command, NotationError>> {
    if let Some(cap) = USI_MOVE_RE.captures(notation) {
        let from = Coord::from_usi(cap.get(1)?.as_str())?;
        let to = Coord::from_usi(cap.get(2)?.as_str())?;
        let promote = cap.get(3).map(|_| true);
        return Some(Ok(Command::Move { from, to, promote }));
    }
    if let Some(cap) = USI_DROP_RE.captures(notation) {
        let kind = piece_kind(cap.get(1)?.as_str())?;
        let to = Coord::from_usi(cap.get(2)?.as_str())?;
        return Some(drop_command(position, kind, to));
    }
    None
}

fn parse_hodges(position: &Position, notation: &str) -> Option<Result<Command, NotationError>> {
    if let Some(cap) = HODGES_MOVE_RE.captures(notation) {
        let kind = piece_kind(cap.get(1)?.as_str())?;
        let from = match cap.get(2) {
            Some(m) => Some(hodges_square(m.as_str())?),
            None => None,
        };
        let capturing = cap.get(3)?.as_str() == "x";
        let to = hodges_square(cap.get(4)?.as_str())?;
        let promote = promotion_suffix(cap.get(5).map(|m| m.as_str()));
        return Some(
            resolve_move(position, kind, from, capturing, to)
                .map(|from| Command::Move { from, to, promote }),
        );
    }
    if let Some(cap) = HODGES_DROP_RE.captures(notation) {
        let kind = piece_kind(cap.get(1)?.as_str())?;
        let to = hodges_square(cap.get(2)?.as_str())?;
        return Some(drop_command(position, kind, to));
    }
    None
}

// Commands are resolved for the side to move.
pub fn parse_command(position: &Position, notation: &str) -> Result<Command, NotationError> {
    let notation = notation.trim();
    let result = parse_usi(position, notation)
        .or_else(|| parse_hodges(position, notation))
        .unwrap_or_else(|| Err(malformed(notation)));
    if let Err(err) = &result {
        warn!("Rejected notation \"{}\": {}", notation, err);
    }
    result
}

fn square_to_usi(id: SquareId) -> String {
    Coord::from_id(id).map_or_else(|| id.to_string(), Coord::to_usi)
}

pub fn format_usi(action: &LastAction) -> String {
    match *action {
        LastAction::Move { from, to, promoted, .. } => {
            let suffix = if promoted { "+" } else { "" };
            format!("{}{}{}", square_to_usi(from), square_to_usi(to), suffix)
        }
        LastAction::Drop { kind, to, .. } => format!("{}*{}", kind.to_ascii(), square_to_usi(to)),
    }
}

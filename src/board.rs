use std::collections::HashSet;

use enum_map::{EnumMap, enum_map};
use itertools::Itertools;
use log::error;
use serde::{Deserialize, Serialize};

use crate::coord::{Coord, SquareId, between};
use crate::force::Force;
use crate::grid::{Grid, Square};
use crate::hand::Hand;
use crate::internal_error_message;
use crate::movement::{self, has_moves_from_rank};
use crate::piece::{Piece, PieceId, PieceKind};


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PieceLocation {
    Board(Coord),
    Hand(Force),
}

// The complete game state that the rules depend on: board, hands and side to move.
//
// Hypothetical moves (check and mate analysis) are evaluated on clones; nothing in the
// analysis mutates `self`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Position {
    grid: Grid,
    hands: EnumMap<Force, Hand>,
    active_force: Force,
}

impl Position {
    pub fn new(grid: Grid, hands: EnumMap<Force, Hand>, active_force: Force) -> Self {
        Position { grid, hands, active_force }
    }

    pub fn with_empty_hands(grid: Grid, active_force: Force) -> Self {
        Self::new(grid, enum_map! { force => Hand::new(force) }, active_force)
    }

    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn grid_mut(&mut self) -> &mut Grid { &mut self.grid }
    pub fn hand(&self, force: Force) -> &Hand { &self.hands[force] }
    pub fn hand_mut(&mut self, force: Force) -> &mut Hand { &mut self.hands[force] }
    pub fn hands(&self) -> &EnumMap<Force, Hand> { &self.hands }
    pub fn active_force(&self) -> Force { self.active_force }

    pub fn square(&self, id: SquareId) -> Option<Square> { self.grid.square(id) }

    pub fn locate_piece(&self, id: PieceId) -> Option<PieceLocation> {
        if let Some(coord) = self.grid.find_piece(id) {
            return Some(PieceLocation::Board(coord));
        }
        self.hands
            .iter()
            .find(|(_, hand)| hand.get(id).is_some())
            .map(|(force, _)| PieceLocation::Hand(force))
    }

    pub fn piece(&self, id: PieceId) -> Option<Piece> {
        match self.locate_piece(id)? {
            PieceLocation::Board(coord) => self.grid[coord],
            PieceLocation::Hand(force) => self.hands[force].get(id).copied(),
        }
    }

    pub fn king(&self, force: Force) -> Option<Coord> { self.grid.find_king(force) }

    pub fn destinations(&self, from: Coord) -> Vec<Coord> {
        movement::destinations(&self.grid, from)
    }
    pub fn can_move_from(&self, from: Coord) -> bool { movement::can_move_from(&self.grid, from) }
    pub fn can_move_to(&self, from: Coord, to: Coord) -> bool {
        movement::can_move_to(&self.grid, from, to)
    }

    // Union of destinations of every piece of `force` except its king. Leaving the king out
    // means two kings never "attack" each other through this function.
    pub fn threatened_by(&self, force: Force) -> HashSet<Coord> {
        self.grid
            .pieces()
            .filter(|(_, piece)| piece.force == force && piece.kind != PieceKind::King)
            .flat_map(|(coord, piece)| movement::piece_destinations(&self.grid, piece, coord))
            .collect()
    }

    // Opposing pieces (kings excluded) that currently attack the king of `force`.
    pub fn threats_to_king(&self, force: Force) -> Vec<Coord> {
        let Some(king) = self.king(force) else {
            return Vec::new();
        };
        self.grid
            .pieces()
            .filter(|(_, piece)| piece.force != force && piece.kind != PieceKind::King)
            .filter(|&(coord, piece)| {
                movement::piece_destinations(&self.grid, piece, coord).contains(&king)
            })
            .map(|(coord, _)| coord)
            .collect()
    }

    pub fn in_check(&self, force: Force) -> bool {
        match self.king(force) {
            Some(king) => self.threatened_by(force.opponent()).contains(&king),
            None => false,
        }
    }

    // A piece is pinned when it stands between its king and an opposing sliding piece that
    // would reach the king if the piece moved away.
    pub fn is_pinned(&self, coord: Coord) -> bool {
        let Some(piece) = self.grid[coord] else {
            return false;
        };
        let Some(king) = self.king(piece.force) else {
            return false;
        };
        let mut without_piece = self.grid.clone();
        without_piece.remove(coord);
        self.grid
            .pieces()
            .filter(|(_, slider)| slider.force != piece.force && slider.kind.is_sliding())
            .filter(|&(slider_coord, _)| between(slider_coord, king).contains(&coord))
            .any(|(slider_coord, slider)| {
                movement::piece_destinations(&without_piece, slider, slider_coord).contains(&king)
            })
    }

    pub fn pinned_pieces(&self, force: Force) -> Vec<Coord> {
        self.grid
            .pieces()
            .filter(|(_, piece)| piece.force == force)
            .map(|(coord, _)| coord)
            .filter(|&coord| self.is_pinned(coord))
            .collect()
    }

    pub fn move_leaves_king_in_check(&self, from: Coord, to: Coord) -> bool {
        match self.grid[from] {
            Some(piece) => self.simulate_move(from, to).in_check(piece.force),
            None => false,
        }
    }

    pub fn drop_leaves_king_in_check(&self, force: Force, piece_id: PieceId, to: Coord) -> bool {
        self.simulate_drop(force, piece_id, to)
            .is_some_and(|position| position.in_check(force))
    }

    pub fn drop_gives_checkmate(&self, force: Force, piece_id: PieceId, to: Coord) -> bool {
        self.simulate_drop(force, piece_id, to)
            .is_some_and(|position| position.in_checkmate(force.opponent()))
    }

    // Drop restrictions that follow from the board alone: the square must be empty, the piece
    // must be able to move from there, and a pawn cannot join an unpromoted pawn in its file.
    pub fn drop_is_placeable(&self, kind: PieceKind, force: Force, to: Coord) -> bool {
        self.grid.is_empty(to)
            && has_moves_from_rank(kind, force, to)
            && !(kind == PieceKind::Pawn && self.grid.has_unpromoted_pawn(to.file, force))
    }

    pub fn in_checkmate(&self, force: Force) -> bool {
        if !self.in_check(force) {
            return false;
        }
        let Some(king) = self.king(force) else {
            return false;
        };

        let king_escapes =
            self.destinations(king).into_iter().any(|to| !self.move_leaves_king_in_check(king, to));
        if king_escapes {
            return false;
        }

        let defenders = self
            .grid
            .pieces()
            .filter(|(_, piece)| piece.force == force && piece.kind != PieceKind::King)
            .map(|(coord, _)| coord)
            .filter(|&coord| !self.is_pinned(coord))
            .collect_vec();
        let defender_resolves_check = |to: Coord| {
            defenders.iter().any(|&from| {
                self.can_move_to(from, to) && !self.move_leaves_king_in_check(from, to)
            })
        };

        let threats = self.threats_to_king(force);
        if threats.iter().any(|&threat| defender_resolves_check(threat)) {
            return false;
        }

        let drop_resolves_check = |to: Coord| {
            self.hands[force].distinct_kinds().any(|piece| {
                self.drop_is_placeable(piece.kind, force, to)
                    && !self.drop_leaves_king_in_check(force, piece.id, to)
            })
        };
        for &threat in &threats {
            let is_sliding = self.grid[threat].is_some_and(|piece| piece.kind.is_sliding());
            if !is_sliding {
                continue;
            }
            for square in between(threat, king) {
                if defender_resolves_check(square) || drop_resolves_check(square) {
                    return false;
                }
            }
        }
        true
    }

    // Relocates a piece. A piece on the destination goes to the mover's hand.
    // Returns the captured piece as it stood on the board.
    pub fn move_piece(&mut self, from: Coord, to: Coord) -> Option<Piece> {
        let Some(piece) = self.grid.remove(from) else {
            error!("{}", internal_error_message!("no piece to move at {}", from.id()));
            return None;
        };
        let captured = self.grid.place(to, piece);
        if let Some(captured) = captured {
            self.hands[piece.force].push(captured);
        }
        captured
    }

    // Drops a piece from the hand of the side to move. Returns false if the piece is not in
    // that hand or the square is occupied.
    pub fn drop_piece(&mut self, piece_id: PieceId, to: Coord) -> bool {
        self.drop_from_hand(self.active_force, piece_id, to)
    }

    fn drop_from_hand(&mut self, force: Force, piece_id: PieceId, to: Coord) -> bool {
        if !self.grid.is_empty(to) {
            return false;
        }
        match self.hands[force].pop(piece_id) {
            Some(piece) => {
                self.grid.place(to, piece);
                true
            }
            None => false,
        }
    }

    pub fn promote(&mut self, coord: Coord) -> bool {
        self.grid[coord].as_mut().is_some_and(|piece| piece.promote())
    }

    pub fn demote(&mut self, coord: Coord) -> bool {
        self.grid[coord].as_mut().is_some_and(|piece| piece.demote())
    }

    pub fn pass_turn(&mut self) { self.active_force = self.active_force.opponent(); }

    fn simulate_move(&self, from: Coord, to: Coord) -> Position {
        let mut scratch = self.clone();
        scratch.move_piece(from, to);
        scratch
    }

    fn simulate_drop(&self, force: Force, piece_id: PieceId, to: Coord) -> Option<Position> {
        let mut scratch = self.clone();
        scratch.drop_from_hand(force, piece_id, to).then_some(scratch)
    }
}

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::force::Force;
use crate::piece::{Piece, PieceId, PieceKind};


// Captured pieces available for dropping. Always holds base (unpromoted) kinds owned by `force`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Hand {
    force: Force,
    pieces: Vec<Piece>,
}

impl Hand {
    pub fn new(force: Force) -> Self { Hand { force, pieces: Vec::new() } }

    pub fn force(&self) -> Force { self.force }
    pub fn pieces(&self) -> &[Piece] { &self.pieces }
    pub fn is_empty(&self) -> bool { self.pieces.is_empty() }
    pub fn len(&self) -> usize { self.pieces.len() }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.id == id)
    }

    pub fn count(&self, kind: PieceKind) -> usize {
        self.pieces.iter().filter(|piece| piece.kind == kind).count()
    }

    // One representative piece per kind, in the order the kinds were first acquired.
    pub fn distinct_kinds(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().unique_by(|piece| piece.kind)
    }

    // A captured piece changes sides and loses its promotion.
    pub fn push(&mut self, mut piece: Piece) {
        piece.demote();
        piece.force = self.force;
        self.pieces.push(piece);
    }

    pub fn pop(&mut self, id: PieceId) -> Option<Piece> {
        let idx = self.pieces.iter().position(|piece| piece.id == id)?;
        Some(self.pieces.remove(idx))
    }
}

use std::fmt;
use std::ops;

use ndarray::{Array, Array2};
use serde::{Deserialize, Serialize};

use crate::coord::{Coord, File, NUM_FILES, NUM_RANKS, SquareId};
use crate::force::Force;
use crate::piece::{Piece, PieceId, PieceKind};


// A read-only view of one board square.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Square {
    pub id: SquareId,
    pub coord: Coord,
    pub piece: Option<Piece>,
}

// The 81 squares. Each holds at most one piece.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    data: Array2<Option<Piece>>,
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            data: Array::from_elem((NUM_RANKS as usize, NUM_FILES as usize), None),
        }
    }

    pub fn square(&self, id: SquareId) -> Option<Square> {
        let coord = Coord::from_id(id)?;
        Some(Square { id, coord, piece: self[coord] })
    }

    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        Coord::all().map(|coord| Square { id: coord.id(), coord, piece: self[coord] })
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::all().filter_map(|coord| self[coord].map(|piece| (coord, piece)))
    }

    pub fn is_empty(&self, coord: Coord) -> bool { self[coord].is_none() }

    pub fn is_occupied_by(&self, coord: Coord, force: Force) -> bool {
        self[coord].is_some_and(|piece| piece.force == force)
    }

    // Puts the piece on the square and returns the piece that was there before.
    pub fn place(&mut self, coord: Coord, piece: Piece) -> Option<Piece> {
        self[coord].replace(piece)
    }

    pub fn remove(&mut self, coord: Coord) -> Option<Piece> { self[coord].take() }

    pub fn find_piece(&self, id: PieceId) -> Option<Coord> {
        self.pieces().find(|(_, piece)| piece.id == id).map(|(coord, _)| coord)
    }

    pub fn find_king(&self, force: Force) -> Option<Coord> {
        self.pieces()
            .find(|(_, piece)| piece.kind == PieceKind::King && piece.force == force)
            .map(|(coord, _)| coord)
    }

    pub fn has_unpromoted_pawn(&self, file: File, force: Force) -> bool {
        self.pieces().any(|(coord, piece)| {
            coord.file == file && piece.force == force && piece.kind == PieceKind::Pawn
        })
    }
}

impl ops::Index<Coord> for Grid {
    type Output = Option<Piece>;
    fn index(&self, pos: Coord) -> &Self::Output { &self.data[coord_to_index(pos)] }
}

impl ops::IndexMut<Coord> for Grid {
    fn index_mut(&mut self, pos: Coord) -> &mut Self::Output {
        &mut self.data[coord_to_index(pos)]
    }
}

// Coords are always in bounds, so plain indexing cannot fail.
fn coord_to_index(pos: Coord) -> [usize; 2] {
    [pos.rank.to_zero_based() as usize, pos.file.to_zero_based() as usize]
}

fn debug_format_piece(piece: &Piece) -> String {
    format!("[{}]-{:?}-{:?}", piece.id.0, piece.force, piece.kind)
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid ")?;
        f.debug_map()
            .entries(self.pieces().map(|(coord, piece)| (coord.id().0, debug_format_piece(&piece))))
            .finish()
    }
}

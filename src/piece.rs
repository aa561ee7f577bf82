use derive_new::new;
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::force::Force;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Lance,
    Knight,
    Silver,
    Gold,
    Bishop,
    Rook,
    King,
    Tokin,
    PromotedLance,
    PromotedKnight,
    PromotedSilver,
    Horse,
    Dragon,
}

// Identity of a physical piece. Stays the same when the piece is captured, promoted or dropped.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PieceId(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, new, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub force: Force,
}

impl PieceId {
    pub fn new() -> Self { PieceId(0) }
    // Returns the current value and advances the counter.
    pub fn inc(&mut self) -> PieceId {
        let id = *self;
        self.0 += 1;
        id
    }
}

impl PieceKind {
    pub fn promoted(self) -> Option<Self> {
        use PieceKind::*;
        match self {
            Pawn => Some(Tokin),
            Lance => Some(PromotedLance),
            Knight => Some(PromotedKnight),
            Silver => Some(PromotedSilver),
            Bishop => Some(Horse),
            Rook => Some(Dragon),
            Gold | King | Tokin | PromotedLance | PromotedKnight | PromotedSilver | Horse
            | Dragon => None,
        }
    }

    // The base kind. This is what a piece turns into when captured.
    pub fn demoted(self) -> Self {
        use PieceKind::*;
        match self {
            Tokin => Pawn,
            PromotedLance => Lance,
            PromotedKnight => Knight,
            PromotedSilver => Silver,
            Horse => Bishop,
            Dragon => Rook,
            Pawn | Lance | Knight | Silver | Gold | Bishop | Rook | King => self,
        }
    }

    pub fn is_promoted(self) -> bool { self.demoted() != self }
    pub fn can_promote(self) -> bool { self.promoted().is_some() }

    // Pieces that move any number of squares along a line and can therefore be blocked.
    pub fn is_sliding(self) -> bool {
        use PieceKind::*;
        match self {
            Lance | Bishop | Rook | Horse | Dragon => true,
            Pawn | Knight | Silver | Gold | King | Tokin | PromotedLance | PromotedKnight
            | PromotedSilver => false,
        }
    }

    pub fn to_ascii(self) -> char {
        use PieceKind::*;
        match self.demoted() {
            Pawn => 'P',
            Lance => 'L',
            Knight => 'N',
            Silver => 'S',
            Gold => 'G',
            Bishop => 'B',
            Rook => 'R',
            King => 'K',
            _ => unreachable!("`demoted` returns base kinds"),
        }
    }

    // SFEN/USI spelling, with a "+" prefix for promoted kinds.
    pub fn to_sfen(self) -> String {
        if self.is_promoted() {
            format!("+{}", self.to_ascii())
        } else {
            self.to_ascii().to_string()
        }
    }

    pub fn from_ascii(ch: char) -> Option<Self> {
        Self::iter().find(|kind| !kind.is_promoted() && kind.to_ascii() == ch)
    }

    pub fn to_kanji(self) -> char {
        use PieceKind::*;
        match self {
            Pawn => '歩',
            Lance => '香',
            Knight => '桂',
            Silver => '銀',
            Gold => '金',
            Bishop => '角',
            Rook => '飛',
            King => '玉',
            Tokin => 'と',
            PromotedLance => '杏',
            PromotedKnight => '圭',
            PromotedSilver => '全',
            Horse => '馬',
            Dragon => '龍',
        }
    }
}

impl Piece {
    // Returns false if the piece has no promoted form or is already promoted.
    pub fn promote(&mut self) -> bool {
        match self.kind.promoted() {
            Some(kind) => {
                self.kind = kind;
                true
            }
            None => false,
        }
    }

    pub fn demote(&mut self) -> bool {
        let kind = self.kind.demoted();
        let changed = kind != self.kind;
        self.kind = kind;
        changed
    }
}

// Uppercase for Sente, lowercase for Gote. Promotion is not encoded.
pub fn piece_to_ascii(kind: PieceKind, force: Force) -> char {
    let ch = kind.to_ascii();
    match force {
        Force::Sente => ch,
        Force::Gote => ch.to_ascii_lowercase(),
    }
}

pub fn piece_from_ascii(ch: char) -> Option<(PieceKind, Force)> {
    let kind = PieceKind::from_ascii(ch.to_ascii_uppercase())?;
    let force = if ch.is_ascii_uppercase() { Force::Sente } else { Force::Gote };
    Some((kind, force))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_round_trip() {
        for kind in PieceKind::iter() {
            if let Some(promoted) = kind.promoted() {
                assert!(!kind.is_promoted());
                assert!(promoted.is_promoted());
                assert_eq!(promoted.demoted(), kind);
                assert_eq!(promoted.promoted(), None);
            }
        }
        assert_eq!(PieceKind::iter().filter(|kind| kind.can_promote()).count(), 6);
        assert!(!PieceKind::Gold.can_promote());
        assert!(!PieceKind::King.can_promote());
    }

    #[test]
    fn promote_and_demote_piece() {
        let mut piece = Piece::new(PieceId(3), PieceKind::Silver, Force::Gote);
        assert!(piece.promote());
        assert_eq!(piece.kind, PieceKind::PromotedSilver);
        assert!(!piece.promote());
        assert!(piece.demote());
        assert_eq!(piece.kind, PieceKind::Silver);
        assert!(!piece.demote());
    }

    #[test]
    fn ascii() {
        assert_eq!(piece_from_ascii('N'), Some((PieceKind::Knight, Force::Sente)));
        assert_eq!(piece_from_ascii('r'), Some((PieceKind::Rook, Force::Gote)));
        assert_eq!(piece_from_ascii('x'), None);
        assert_eq!(piece_to_ascii(PieceKind::Horse, Force::Gote), 'b');
        assert_eq!(PieceKind::Dragon.to_sfen(), "+R");
        assert_eq!(PieceKind::Gold.to_sfen(), "G");
    }
}

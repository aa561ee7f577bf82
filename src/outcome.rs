// Decision trees that classify a touch before anything is mutated. The first matching rule
// wins, so the order of checks inside each function is part of the rules.

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::board::Position;
use crate::coord::{Coord, SquareId};
use crate::force::Force;
use crate::movement::{has_moves_from_rank, in_compulsory_promotion_zone};
use crate::piece::{PieceId, PieceKind};


#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Verdict {
    pub name: String,
    pub message: String,
}

pub trait Outcome: Copy + Into<&'static str> {
    fn message(self) -> &'static str;

    fn name(self) -> &'static str { self.into() }

    fn verdict(self) -> Verdict {
        Verdict {
            name: self.name().to_owned(),
            message: self.message().to_owned(),
        }
    }
}

// What the classifiers need to know about the match besides the position.
#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    pub position: &'a Position,
    pub game_over: bool,
    pub promotion_pending: bool,
    pub player: Force,
}

impl Context<'_> {
    fn players_turn(&self) -> bool { self.player == self.position.active_force() }
}


#[derive(Clone, Copy, PartialEq, Eq, Debug, IntoStaticStr)]
pub enum SelectOutcome {
    GameOver,
    NotPlayersTurn,
    PromotionChoicePending,
    SquareNotFound,
    SquareEmpty,
    PieceNotOwned,
    NoLegalMoves,
    MovePossible,
}

impl Outcome for SelectOutcome {
    fn message(self) -> &'static str {
        use SelectOutcome::*;
        match self {
            GameOver => "The game is over.",
            NotPlayersTurn => "It is not your turn.",
            PromotionChoicePending => "Choose whether to promote first.",
            SquareNotFound => "There is no such square.",
            SquareEmpty => "There is no piece on that square.",
            PieceNotOwned => "That piece belongs to your opponent.",
            NoLegalMoves => "That piece cannot move.",
            MovePossible => "Piece selected.",
        }
    }
}

pub fn classify_select(ctx: Context, square: SquareId) -> SelectOutcome {
    if ctx.game_over {
        return SelectOutcome::GameOver;
    }
    if !ctx.players_turn() {
        return SelectOutcome::NotPlayersTurn;
    }
    if ctx.promotion_pending {
        return SelectOutcome::PromotionChoicePending;
    }
    let Some(square) = ctx.position.square(square) else {
        return SelectOutcome::SquareNotFound;
    };
    let Some(piece) = square.piece else {
        return SelectOutcome::SquareEmpty;
    };
    if piece.force != ctx.player {
        return SelectOutcome::PieceNotOwned;
    }
    if !ctx.position.can_move_from(square.coord) {
        return SelectOutcome::NoLegalMoves;
    }
    SelectOutcome::MovePossible
}


#[derive(Clone, Copy, PartialEq, Eq, Debug, IntoStaticStr)]
pub enum MoveOutcome {
    GameOver,
    NotPlayersTurn,
    MoveCancelled,
    SelectionChanged,
    KingLeftInCheck,
    MoveInvalid,
    PieceMovedToCompulsoryPromotionZone,
    PieceMovedToPromotionZone,
    MoveValid,
}

impl Outcome for MoveOutcome {
    fn message(self) -> &'static str {
        use MoveOutcome::*;
        match self {
            GameOver => "The game is over.",
            NotPlayersTurn => "It is not your turn.",
            MoveCancelled => "Selection cleared.",
            SelectionChanged => "Piece selected.",
            KingLeftInCheck => "That move would leave your king in check.",
            MoveInvalid => "That piece cannot move there.",
            PieceMovedToCompulsoryPromotionZone => {
                "The piece must promote there and has been promoted."
            }
            PieceMovedToPromotionZone => "The piece may promote. Choose whether to promote.",
            MoveValid => "Move made.",
        }
    }
}

// A promotable piece may promote when it enters, leaves or moves within the promotion zone.
pub fn may_promote(kind: PieceKind, force: Force, from: Coord, to: Coord) -> bool {
    kind.can_promote() && (from.in_promotion_zone(force) || to.in_promotion_zone(force))
}

pub fn classify_move(ctx: Context, from: Coord, square: SquareId) -> MoveOutcome {
    if ctx.game_over {
        return MoveOutcome::GameOver;
    }
    if !ctx.players_turn() {
        return MoveOutcome::NotPlayersTurn;
    }
    let (Some(to), Some(piece)) = (Coord::from_id(square), ctx.position.grid()[from]) else {
        return MoveOutcome::MoveInvalid;
    };
    if to == from {
        return MoveOutcome::MoveCancelled;
    }
    if ctx.position.grid().is_occupied_by(to, ctx.player) && ctx.position.can_move_from(to) {
        return MoveOutcome::SelectionChanged;
    }
    if ctx.position.move_leaves_king_in_check(from, to) {
        return MoveOutcome::KingLeftInCheck;
    }
    if !ctx.position.can_move_to(from, to) {
        return MoveOutcome::MoveInvalid;
    }
    if in_compulsory_promotion_zone(piece.kind, piece.force, to) {
        return MoveOutcome::PieceMovedToCompulsoryPromotionZone;
    }
    if may_promote(piece.kind, piece.force, from, to) {
        return MoveOutcome::PieceMovedToPromotionZone;
    }
    MoveOutcome::MoveValid
}


#[derive(Clone, Copy, PartialEq, Eq, Debug, IntoStaticStr)]
pub enum DropOutcome {
    GameOver,
    NotPlayersTurn,
    PieceNotInHand,
    SquareNotFound,
    SquareOccupied,
    NoLegalMoves,
    TwoPawnsInFile,
    KingLeftInCheck,
    PawnDropMate,
    DropValid,
}

impl Outcome for DropOutcome {
    fn message(self) -> &'static str {
        use DropOutcome::*;
        match self {
            GameOver => "The game is over.",
            NotPlayersTurn => "It is not your turn.",
            PieceNotInHand => "That piece is not in your hand.",
            SquareNotFound => "There is no such square.",
            SquareOccupied => "Pieces can only be dropped on empty squares.",
            NoLegalMoves => "The piece would have no legal moves from there.",
            TwoPawnsInFile => "You already have an unpromoted pawn in that file.",
            KingLeftInCheck => "That drop would leave your king in check.",
            PawnDropMate => "A pawn drop may not give checkmate.",
            DropValid => "Piece dropped.",
        }
    }
}

pub fn classify_drop(ctx: Context, piece_id: PieceId, square: SquareId) -> DropOutcome {
    if ctx.game_over {
        return DropOutcome::GameOver;
    }
    if !ctx.players_turn() {
        return DropOutcome::NotPlayersTurn;
    }
    let Some(piece) = ctx.position.hand(ctx.player).get(piece_id).copied() else {
        return DropOutcome::PieceNotInHand;
    };
    let Some(to) = Coord::from_id(square) else {
        return DropOutcome::SquareNotFound;
    };
    let position = ctx.position;
    if !position.grid().is_empty(to) {
        return DropOutcome::SquareOccupied;
    }
    if !has_moves_from_rank(piece.kind, piece.force, to) {
        return DropOutcome::NoLegalMoves;
    }
    if piece.kind == PieceKind::Pawn && position.grid().has_unpromoted_pawn(to.file, piece.force) {
        return DropOutcome::TwoPawnsInFile;
    }
    if position.drop_leaves_king_in_check(ctx.player, piece_id, to) {
        return DropOutcome::KingLeftInCheck;
    }
    if piece.kind == PieceKind::Pawn && position.drop_gives_checkmate(ctx.player, piece_id, to) {
        return DropOutcome::PawnDropMate;
    }
    DropOutcome::DropValid
}


#[derive(Clone, Copy, PartialEq, Eq, Debug, IntoStaticStr)]
pub enum HandPickOutcome {
    GameOver,
    NotPlayersTurn,
    PromotionChoicePending,
    PieceNotInHand,
    PieceDeselected,
    PieceSelected,
}

impl Outcome for HandPickOutcome {
    fn message(self) -> &'static str {
        use HandPickOutcome::*;
        match self {
            GameOver => "The game is over.",
            NotPlayersTurn => "It is not your turn.",
            PromotionChoicePending => "Choose whether to promote first.",
            PieceNotInHand => "That piece is not in your hand.",
            PieceDeselected => "Selection cleared.",
            PieceSelected => "Piece selected. Choose a square to drop it on.",
        }
    }
}

pub fn classify_hand_pick(
    ctx: Context, piece_id: PieceId, selected: Option<PieceId>,
) -> HandPickOutcome {
    if ctx.game_over {
        return HandPickOutcome::GameOver;
    }
    if !ctx.players_turn() {
        return HandPickOutcome::NotPlayersTurn;
    }
    if ctx.promotion_pending {
        return HandPickOutcome::PromotionChoicePending;
    }
    if ctx.position.hand(ctx.player).get(piece_id).is_none() {
        return HandPickOutcome::PieceNotInHand;
    }
    if selected == Some(piece_id) {
        return HandPickOutcome::PieceDeselected;
    }
    HandPickOutcome::PieceSelected
}


#[derive(Clone, Copy, PartialEq, Eq, Debug, IntoStaticStr)]
pub enum PromotionOutcome {
    GameOver,
    NotPlayersTurn,
    NoPieceToPromote,
    PromotionAccepted,
    PromotionDeclined,
}

impl Outcome for PromotionOutcome {
    fn message(self) -> &'static str {
        use PromotionOutcome::*;
        match self {
            GameOver => "The game is over.",
            NotPlayersTurn => "It is not your turn.",
            NoPieceToPromote => "There is no piece waiting for a promotion choice.",
            PromotionAccepted => "Piece promoted.",
            PromotionDeclined => "Promotion declined.",
        }
    }
}

pub fn classify_promotion(ctx: Context, accept: bool) -> PromotionOutcome {
    if ctx.game_over {
        return PromotionOutcome::GameOver;
    }
    if !ctx.players_turn() {
        return PromotionOutcome::NotPlayersTurn;
    }
    if !ctx.promotion_pending {
        return PromotionOutcome::NoPieceToPromote;
    }
    if accept {
        PromotionOutcome::PromotionAccepted
    } else {
        PromotionOutcome::PromotionDeclined
    }
}


// Notation may state the promotion choice up front ("8h2b+", "P-93="). The stated choice has
// to agree with the rules before any touch is made.
#[derive(Clone, Copy, PartialEq, Eq, Debug, IntoStaticStr)]
pub enum PromotionRequestOutcome {
    PromotionNotAllowed,
    PromotionRequired,
    PromotionRequestValid,
}

impl Outcome for PromotionRequestOutcome {
    fn message(self) -> &'static str {
        use PromotionRequestOutcome::*;
        match self {
            PromotionNotAllowed => "That move does not allow promotion.",
            PromotionRequired => "The piece must promote on that square.",
            PromotionRequestValid => "Promotion choice accepted.",
        }
    }
}

// An empty `from` is left to the move classifiers to report.
pub fn classify_promotion_request(
    position: &Position, from: Coord, to: Coord, promote: Option<bool>,
) -> PromotionRequestOutcome {
    let Some(piece) = position.grid()[from] else {
        return PromotionRequestOutcome::PromotionRequestValid;
    };
    match promote {
        Some(true) if !may_promote(piece.kind, piece.force, from, to) => {
            PromotionRequestOutcome::PromotionNotAllowed
        }
        Some(false) if in_compulsory_promotion_zone(piece.kind, piece.force, to) => {
            PromotionRequestOutcome::PromotionRequired
        }
        None | Some(_) => PromotionRequestOutcome::PromotionRequestValid,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sfen::parse_sfen;
    use crate::starter::standard_position;

    fn ctx(position: &Position, player: Force) -> Context<'_> {
        Context {
            position,
            game_over: false,
            promotion_pending: false,
            player,
        }
    }

    fn sq(s: &str) -> SquareId { SquareId::parse(s).unwrap() }

    #[test]
    fn outcome_names() {
        assert_eq!(SelectOutcome::MovePossible.name(), "MovePossible");
        assert_eq!(
            MoveOutcome::PieceMovedToPromotionZone.verdict().name,
            "PieceMovedToPromotionZone"
        );
        assert_eq!(DropOutcome::PawnDropMate.name(), "PawnDropMate");
    }

    #[test]
    fn select_tree() {
        let position = standard_position();
        let sente = ctx(&position, Force::Sente);
        assert_eq!(classify_select(sente, sq("97")), SelectOutcome::MovePossible);
        assert_eq!(classify_select(sente, sq("55")), SelectOutcome::SquareEmpty);
        assert_eq!(classify_select(sente, sq("93")), SelectOutcome::PieceNotOwned);
        // Knight hemmed in by its own pawns.
        assert_eq!(classify_select(sente, sq("89")), SelectOutcome::NoLegalMoves);
        assert_eq!(classify_select(sente, SquareId(0)), SelectOutcome::SquareNotFound);
        assert_eq!(
            classify_select(ctx(&position, Force::Gote), sq("93")),
            SelectOutcome::NotPlayersTurn
        );
        let over = Context { game_over: true, ..sente };
        assert_eq!(classify_select(over, sq("97")), SelectOutcome::GameOver);
        let pending = Context { promotion_pending: true, ..sente };
        assert_eq!(classify_select(pending, sq("97")), SelectOutcome::PromotionChoicePending);
    }

    #[test]
    fn move_tree() {
        let position = standard_position();
        let sente = ctx(&position, Force::Sente);
        let from = Coord::at(7, 7);
        assert_eq!(classify_move(sente, from, sq("76")), MoveOutcome::MoveValid);
        assert_eq!(classify_move(sente, from, sq("75")), MoveOutcome::MoveInvalid);
        assert_eq!(classify_move(sente, from, sq("77")), MoveOutcome::MoveCancelled);
        assert_eq!(classify_move(sente, from, sq("27")), MoveOutcome::SelectionChanged);
    }

    #[test]
    fn move_promotion_zones() {
        let position = parse_sfen("4k4/9/9/P8/9/9/9/9/N3K4 b - 1").unwrap();
        let sente = ctx(&position, Force::Sente);
        assert_eq!(
            classify_move(sente, Coord::at(9, 4), sq("93")),
            MoveOutcome::PieceMovedToPromotionZone
        );

        let position = parse_sfen("4k4/P8/9/9/9/9/9/9/4K4 b - 1").unwrap();
        let sente = ctx(&position, Force::Sente);
        assert_eq!(
            classify_move(sente, Coord::at(9, 2), sq("91")),
            MoveOutcome::PieceMovedToCompulsoryPromotionZone
        );
    }

    #[test]
    fn lance_and_knight_compulsory_zones() {
        let position = parse_sfen("4k4/9/L8/9/9/9/9/9/4K4 b - 1").unwrap();
        let sente = ctx(&position, Force::Sente);
        let lance = Coord::at(9, 3);
        assert_eq!(classify_move(sente, lance, sq("92")), MoveOutcome::PieceMovedToPromotionZone);
        assert_eq!(
            classify_move(sente, lance, sq("91")),
            MoveOutcome::PieceMovedToCompulsoryPromotionZone
        );

        // Knights are stuck on the last two ranks, Gote's are ranks 8 and 9.
        let position = parse_sfen("4k4/9/9/N8/9/9/9/9/4K4 b - 1").unwrap();
        assert_eq!(
            classify_move(ctx(&position, Force::Sente), Coord::at(9, 4), sq("82")),
            MoveOutcome::PieceMovedToCompulsoryPromotionZone
        );
        let position = parse_sfen("4k4/9/9/9/9/1n7/9/9/4K4 w - 1").unwrap();
        assert_eq!(
            classify_move(ctx(&position, Force::Gote), Coord::at(8, 6), sq("78")),
            MoveOutcome::PieceMovedToCompulsoryPromotionZone
        );
    }

    #[test]
    fn stated_promotion_choice() {
        let position = parse_sfen("4k4/9/9/P8/9/9/9/N8/4K4 b - 1").unwrap();
        let pawn = Coord::at(9, 4);
        let request = |from, to: u8, promote| {
            classify_promotion_request(&position, from, Coord::at(to / 10, to % 10), promote)
        };
        assert_eq!(request(pawn, 93, Some(true)), PromotionRequestOutcome::PromotionRequestValid);
        assert_eq!(request(pawn, 93, Some(false)), PromotionRequestOutcome::PromotionRequestValid);
        assert_eq!(request(pawn, 93, None), PromotionRequestOutcome::PromotionRequestValid);
        // The knight on 98 cannot reach the zone in one move.
        assert_eq!(
            request(Coord::at(9, 8), 86, Some(true)),
            PromotionRequestOutcome::PromotionNotAllowed
        );
        assert_eq!(
            request(Coord::at(5, 9), 58, Some(true)),
            PromotionRequestOutcome::PromotionNotAllowed
        );

        let position = parse_sfen("4k4/P8/9/9/9/9/9/9/4K4 b - 1").unwrap();
        assert_eq!(
            classify_promotion_request(&position, Coord::at(9, 2), Coord::at(9, 1), Some(false)),
            PromotionRequestOutcome::PromotionRequired
        );
    }

    #[test]
    fn move_out_of_zone_may_promote() {
        let position = parse_sfen("4k4/9/S8/9/9/9/9/9/4K4 b - 1").unwrap();
        let sente = ctx(&position, Force::Sente);
        assert_eq!(
            classify_move(sente, Coord::at(9, 3), sq("84")),
            MoveOutcome::PieceMovedToPromotionZone
        );
    }

    #[test]
    fn move_exposing_king() {
        // Gold on 5h is pinned by the rook on 5a.
        let position = parse_sfen("4r4/9/9/9/9/9/9/4G4/4K4 b - 1").unwrap();
        let sente = ctx(&position, Force::Sente);
        assert_eq!(classify_move(sente, Coord::at(5, 8), sq("47")), MoveOutcome::KingLeftInCheck);
        assert_eq!(classify_move(sente, Coord::at(5, 8), sq("57")), MoveOutcome::MoveValid);
    }

    #[test]
    fn drop_tree() {
        let position = parse_sfen("4k4/9/9/9/9/9/4P4/9/4K4 b PN 1").unwrap();
        let sente = ctx(&position, Force::Sente);
        let hand = position.hand(Force::Sente);
        let pawn = hand.pieces().iter().find(|p| p.kind == PieceKind::Pawn).unwrap().id;
        let knight = hand.pieces().iter().find(|p| p.kind == PieceKind::Knight).unwrap().id;
        assert_eq!(classify_drop(sente, pawn, sq("57")), DropOutcome::SquareOccupied);
        assert_eq!(classify_drop(sente, pawn, sq("55")), DropOutcome::TwoPawnsInFile);
        assert_eq!(classify_drop(sente, pawn, sq("41")), DropOutcome::NoLegalMoves);
        assert_eq!(classify_drop(sente, knight, sq("42")), DropOutcome::NoLegalMoves);
        assert_eq!(classify_drop(sente, pawn, sq("45")), DropOutcome::DropValid);
        assert_eq!(classify_drop(sente, PieceId(99), sq("45")), DropOutcome::PieceNotInHand);
    }

    #[test]
    fn drop_must_answer_check() {
        // Sente king on 59 is in check from the rook on 51.
        let position = parse_sfen("4r3k/9/9/9/9/9/9/9/4K4 b G 1").unwrap();
        assert!(position.in_check(Force::Sente));
        let sente = ctx(&position, Force::Sente);
        let gold = position.hand(Force::Sente).pieces()[0].id;
        assert_eq!(classify_drop(sente, gold, sq("45")), DropOutcome::KingLeftInCheck);
        assert_eq!(classify_drop(sente, gold, sq("55")), DropOutcome::DropValid);
    }

    #[test]
    fn pawn_drop_mate_is_rejected() {
        // Gote king in the corner next to its own lance. A pawn dropped on 12 is defended by
        // the gold, which also covers 22.
        let position = parse_sfen("7lk/9/7G1/9/9/9/9/9/4K4 b P 1").unwrap();
        let sente = ctx(&position, Force::Sente);
        let pawn = position.hand(Force::Sente).pieces()[0].id;
        assert_eq!(classify_drop(sente, pawn, sq("12")), DropOutcome::PawnDropMate);
    }

    #[test]
    fn hand_pick_and_promotion_trees() {
        let position = parse_sfen("4k4/9/9/9/9/9/9/9/4K4 b G 1").unwrap();
        let sente = ctx(&position, Force::Sente);
        let gold = position.hand(Force::Sente).pieces()[0].id;
        assert_eq!(classify_hand_pick(sente, gold, None), HandPickOutcome::PieceSelected);
        assert_eq!(classify_hand_pick(sente, gold, Some(gold)), HandPickOutcome::PieceDeselected);
        assert_eq!(
            classify_hand_pick(ctx(&position, Force::Gote), gold, None),
            HandPickOutcome::NotPlayersTurn
        );
        assert_eq!(classify_promotion(sente, true), PromotionOutcome::NoPieceToPromote);
        let pending = Context { promotion_pending: true, ..sente };
        assert_eq!(classify_promotion(pending, true), PromotionOutcome::PromotionAccepted);
        assert_eq!(classify_promotion(pending, false), PromotionOutcome::PromotionDeclined);
    }
}

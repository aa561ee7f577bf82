// The match: a position plus everything that happens between two touches of the board.
//
// Each command runs a classifier from `outcome`, performs the mutation the outcome calls for,
// and leaves a human-readable message in `notification`. Commands return whether they changed
// anything.

use enum_map::EnumMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::coord::{Coord, SquareId};
use crate::force::Force;
use crate::notation::{Command, format_usi};
use crate::outcome::{
    self, Context, DropOutcome, HandPickOutcome, MoveOutcome, Outcome, PromotionOutcome,
    PromotionRequestOutcome, SelectOutcome, Verdict,
};
use crate::piece::{PieceId, PieceKind};
use crate::player::Player;
use crate::rules::ShogiRules;
use crate::starter::generate_starting_position;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GameStatus {
    Active,
    Checkmate { winner: Force },
}

impl GameStatus {
    pub fn is_active(self) -> bool { self == GameStatus::Active }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Selection {
    Square(Coord),
    HandPiece(PieceId),
}

// A move that landed where promotion is optional. The piece already stands on `to`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PendingPromotion {
    pub from: Coord,
    pub to: Coord,
}

// What the UI needs to replay the last accepted action.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LastAction {
    Move {
        piece_id: PieceId,
        from: SquareId,
        to: SquareId,
        captured: Option<PieceId>,
        promoted: bool,
    },
    Drop {
        piece_id: PieceId,
        kind: PieceKind,
        to: SquareId,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum MatchState {
    Idle,
    SquareSelected,
    HandPieceSelected,
    AwaitingPromotionChoice,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TurnRecord {
    pub force: Force,
    pub notation: String,
}

#[derive(Clone, Debug)]
pub struct ShogiMatch {
    rules: ShogiRules,
    players: EnumMap<Force, Player>,
    position: Position,
    status: GameStatus,
    selection: Option<Selection>,
    pending_promotion: Option<PendingPromotion>,
    last_action: Option<LastAction>,
    turn_log: Vec<TurnRecord>,
    notification: String,
    last_verdict: Option<Verdict>,
}

impl ShogiMatch {
    pub fn new(rules: ShogiRules, players: EnumMap<Force, Player>) -> Result<Self, String> {
        let position = generate_starting_position(&rules.starting_position)?;
        Ok(Self::new_with_position(rules, players, position))
    }

    pub fn new_with_position(
        rules: ShogiRules, players: EnumMap<Force, Player>, position: Position,
    ) -> Self {
        let mut shogi_match = ShogiMatch {
            rules,
            players,
            position,
            status: GameStatus::Active,
            selection: None,
            pending_promotion: None,
            last_action: None,
            turn_log: Vec::new(),
            notification: String::new(),
            last_verdict: None,
        };
        // The starting position may already be decided, e.g. a mating problem that has been
        // solved.
        shogi_match.update_status();
        shogi_match
    }

    pub fn rules(&self) -> &ShogiRules { &self.rules }
    pub fn players(&self) -> &EnumMap<Force, Player> { &self.players }
    pub fn player(&self, force: Force) -> &Player { &self.players[force] }
    pub fn position(&self) -> &Position { &self.position }
    pub fn status(&self) -> GameStatus { self.status }
    pub fn is_active(&self) -> bool { self.status.is_active() }
    pub fn active_force(&self) -> Force { self.position.active_force() }
    pub fn selection(&self) -> Option<Selection> { self.selection }
    pub fn pending_promotion(&self) -> Option<PendingPromotion> { self.pending_promotion }
    pub fn last_action(&self) -> Option<LastAction> { self.last_action }
    pub fn turn_log(&self) -> &[TurnRecord] { &self.turn_log }
    pub fn notification(&self) -> &str { &self.notification }
    pub fn last_verdict(&self) -> Option<&Verdict> { self.last_verdict.as_ref() }

    pub fn state(&self) -> MatchState {
        if self.pending_promotion.is_some() {
            return MatchState::AwaitingPromotionChoice;
        }
        match self.selection {
            None => MatchState::Idle,
            Some(Selection::Square(_)) => MatchState::SquareSelected,
            Some(Selection::HandPiece(_)) => MatchState::HandPieceSelected,
        }
    }

    pub fn touch_square(&mut self, player: Force, square: SquareId) -> bool {
        match self.selection {
            None => self.select_square(player, square),
            Some(Selection::Square(from)) => self.move_to_square(player, from, square),
            Some(Selection::HandPiece(piece_id)) => self.drop_on_square(player, piece_id, square),
        }
    }

    pub fn touch_piece_in_hand(&mut self, player: Force, piece_id: PieceId) -> bool {
        let selected = match self.selection {
            Some(Selection::HandPiece(id)) => Some(id),
            _ => None,
        };
        let outcome = outcome::classify_hand_pick(self.context(player), piece_id, selected);
        self.report(outcome);
        match outcome {
            HandPickOutcome::PieceSelected => {
                self.selection = Some(Selection::HandPiece(piece_id));
                true
            }
            HandPickOutcome::PieceDeselected => {
                self.selection = None;
                true
            }
            HandPickOutcome::GameOver
            | HandPickOutcome::NotPlayersTurn
            | HandPickOutcome::PromotionChoicePending
            | HandPickOutcome::PieceNotInHand => false,
        }
    }

    pub fn touch_promotion_option(&mut self, player: Force, accept: bool) -> bool {
        let outcome = outcome::classify_promotion(self.context(player), accept);
        self.report(outcome);
        let Some(pending) = self.pending_promotion else {
            return false;
        };
        match outcome {
            PromotionOutcome::PromotionAccepted => {
                self.position.promote(pending.to);
                if let Some(LastAction::Move { promoted, .. }) = &mut self.last_action {
                    *promoted = true;
                }
            }
            PromotionOutcome::PromotionDeclined => {}
            PromotionOutcome::GameOver
            | PromotionOutcome::NotPlayersTurn
            | PromotionOutcome::NoPieceToPromote => return false,
        }
        self.pending_promotion = None;
        self.finish_turn();
        true
    }

    // Runs a parsed notation command through the touch commands. Either the whole turn is
    // applied or nothing changes apart from the selection being cleared.
    pub fn apply_command(&mut self, player: Force, command: &Command) -> bool {
        if self.pending_promotion.is_some() {
            self.report(SelectOutcome::PromotionChoicePending);
            return false;
        }
        self.selection = None;
        let turns_before = self.turn_log.len();
        let applied = match *command {
            Command::Move { from, to, promote } => {
                let request =
                    outcome::classify_promotion_request(&self.position, from, to, promote);
                if request != PromotionRequestOutcome::PromotionRequestValid {
                    self.report(request);
                    return false;
                }
                self.touch_square(player, from.id())
                    && self.touch_square(player, to.id())
                    && (self.turn_log.len() > turns_before
                        || self.touch_promotion_option(player, promote.unwrap_or(false)))
            }
            Command::Drop { piece_id, to } => {
                self.touch_piece_in_hand(player, piece_id) && self.touch_square(player, to.id())
            }
        };
        let applied = applied && self.turn_log.len() > turns_before;
        if !applied {
            self.selection = None;
        }
        applied
    }

    fn context(&self, player: Force) -> Context<'_> {
        Context {
            position: &self.position,
            game_over: !self.status.is_active(),
            promotion_pending: self.pending_promotion.is_some(),
            player,
        }
    }

    fn report<O: Outcome>(&mut self, outcome: O) {
        let verdict = outcome.verdict();
        self.notification = verdict.message.clone();
        self.last_verdict = Some(verdict);
    }

    fn select_square(&mut self, player: Force, square: SquareId) -> bool {
        let outcome = outcome::classify_select(self.context(player), square);
        self.report(outcome);
        match outcome {
            SelectOutcome::MovePossible => {
                self.selection = Coord::from_id(square).map(Selection::Square);
                self.selection.is_some()
            }
            SelectOutcome::GameOver
            | SelectOutcome::NotPlayersTurn
            | SelectOutcome::PromotionChoicePending
            | SelectOutcome::SquareNotFound
            | SelectOutcome::SquareEmpty
            | SelectOutcome::PieceNotOwned
            | SelectOutcome::NoLegalMoves => false,
        }
    }

    fn move_to_square(&mut self, player: Force, from: Coord, square: SquareId) -> bool {
        let outcome = outcome::classify_move(self.context(player), from, square);
        self.report(outcome);
        let to = match outcome {
            MoveOutcome::MoveCancelled => {
                self.selection = None;
                return true;
            }
            MoveOutcome::SelectionChanged => {
                self.selection = Coord::from_id(square).map(Selection::Square);
                return true;
            }
            MoveOutcome::GameOver
            | MoveOutcome::NotPlayersTurn
            | MoveOutcome::KingLeftInCheck
            | MoveOutcome::MoveInvalid => return false,
            MoveOutcome::PieceMovedToCompulsoryPromotionZone
            | MoveOutcome::PieceMovedToPromotionZone
            | MoveOutcome::MoveValid => match Coord::from_id(square) {
                Some(to) => to,
                None => return false,
            },
        };
        let Some(piece) = self.position.grid()[from] else {
            return false;
        };
        let captured = self.position.move_piece(from, to).map(|piece| piece.id);
        let promoted = outcome == MoveOutcome::PieceMovedToCompulsoryPromotionZone
            && self.position.promote(to);
        self.selection = None;
        self.last_action = Some(LastAction::Move {
            piece_id: piece.id,
            from: from.id(),
            to: to.id(),
            captured,
            promoted,
        });
        if outcome == MoveOutcome::PieceMovedToPromotionZone {
            self.pending_promotion = Some(PendingPromotion { from, to });
        } else {
            self.finish_turn();
        }
        true
    }

    fn drop_on_square(&mut self, player: Force, piece_id: PieceId, square: SquareId) -> bool {
        let outcome = outcome::classify_drop(self.context(player), piece_id, square);
        self.report(outcome);
        match outcome {
            DropOutcome::DropValid => {}
            DropOutcome::GameOver
            | DropOutcome::NotPlayersTurn
            | DropOutcome::PieceNotInHand
            | DropOutcome::SquareNotFound
            | DropOutcome::SquareOccupied
            | DropOutcome::NoLegalMoves
            | DropOutcome::TwoPawnsInFile
            | DropOutcome::KingLeftInCheck
            | DropOutcome::PawnDropMate => return false,
        }
        let (Some(to), Some(piece)) =
            (Coord::from_id(square), self.position.hand(player).get(piece_id).copied())
        else {
            return false;
        };
        if !self.position.drop_piece(piece_id, to) {
            return false;
        }
        self.selection = None;
        self.last_action = Some(LastAction::Drop { piece_id, kind: piece.kind, to: to.id() });
        self.finish_turn();
        true
    }

    fn finish_turn(&mut self) {
        let force = self.position.active_force();
        if let Some(action) = &self.last_action {
            let notation = format_usi(action);
            debug!("Player {} played {}", force.number(), notation);
            self.turn_log.push(TurnRecord { force, notation });
        }
        self.position.pass_turn();
        self.selection = None;
        self.update_status();
    }

    fn update_status(&mut self) {
        let to_move = self.position.active_force();
        if self.position.in_checkmate(to_move) {
            let winner = to_move.opponent();
            self.status = GameStatus::Checkmate { winner };
            info!("Checkmate: player {} ({}) wins", winner.number(), self.players[winner].name);
            self.notification.push_str(" Checkmate.");
        } else if self.position.in_check(to_move) {
            self.notification.push_str(" Check.");
        }
        self.notification = self.notification.trim_start().to_owned();
    }
}

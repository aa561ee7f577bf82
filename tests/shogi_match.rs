mod common;

use common::{PieceIs, at, match_from_position, parse_board, sq, standard_match};
use pretty_assertions::assert_eq;
use shogi_rules::board::PieceLocation;
use shogi_rules::force::Force;
use shogi_rules::game::{GameStatus, LastAction, MatchState, Selection, ShogiMatch};
use shogi_rules::notation::parse_command;
use shogi_rules::piece::PieceKind;
use shogi_rules::rules::{Handicap, ShogiRules, StartingPosition};
use shogi_rules::sfen::position_to_sfen;
use shogi_rules::test_util::{replay_log, sample_players};


fn verdict(shogi_match: &ShogiMatch) -> String {
    shogi_match.last_verdict().map(|v| v.name.clone()).unwrap_or_default()
}

#[test]
fn first_pawn_move() {
    let mut m = standard_match();
    assert!(m.touch_square(Force::Sente, sq("97")));
    assert_eq!(verdict(&m), "MovePossible");
    assert_eq!(m.selection(), Some(Selection::Square(at("97"))));

    assert!(m.touch_square(Force::Sente, sq("96")));
    assert_eq!(verdict(&m), "MoveValid");
    assert!(m.position().grid()[at("96")].is(piece!(Sente Pawn)));
    assert!(m.position().grid().is_empty(at("97")));
    assert_eq!(m.active_force(), Force::Gote);
    assert_eq!(m.state(), MatchState::Idle);
    assert_eq!(m.turn_log()[0].notation, "9g9f");
}

#[test]
fn wrong_player_is_rejected() {
    let mut m = standard_match();
    assert!(!m.touch_square(Force::Gote, sq("93")));
    assert_eq!(verdict(&m), "NotPlayersTurn");
    assert_eq!(m.state(), MatchState::Idle);
}

#[test]
fn pawn_promotion_accepted() {
    let position = parse_board(
        "
        . . . . k . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . P . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . K . . . .
        ",
        Force::Sente,
        "-",
    );
    let mut m = match_from_position(position);
    assert!(m.touch_square(Force::Sente, sq("34")));
    assert!(m.touch_square(Force::Sente, sq("33")));
    assert_eq!(verdict(&m), "PieceMovedToPromotionZone");
    assert_eq!(m.state(), MatchState::AwaitingPromotionChoice);
    assert_eq!(m.active_force(), Force::Sente);

    // Nothing else is accepted while the choice is pending.
    assert!(!m.touch_square(Force::Sente, sq("59")));
    assert!(!m.touch_promotion_option(Force::Gote, true));

    assert!(m.touch_promotion_option(Force::Sente, true));
    assert_eq!(verdict(&m), "PromotionAccepted");
    assert!(m.position().grid()[at("33")].is(piece!(Sente Tokin)));
    assert_eq!(m.active_force(), Force::Gote);
    assert!(matches!(m.last_action(), Some(LastAction::Move { promoted: true, .. })));
    assert_eq!(m.turn_log()[0].notation, "3d3c+");
}

#[test]
fn promotion_option_without_pending_move() {
    let mut m = standard_match();
    assert!(!m.touch_promotion_option(Force::Sente, true));
    assert_eq!(verdict(&m), "NoPieceToPromote");
}

#[test]
fn rook_mate_in_the_corner() {
    let position = parse_board(
        "
        . . . . . . . . k
        . . . . . . . . .
        . . . . . . . G .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . R . . . . . . .
        K . . . . . . . .
        ",
        Force::Sente,
        "-",
    );
    let mut m = match_from_position(position);
    replay_log(&mut m, "R-81=").unwrap();
    assert!(m.position().in_check(Force::Gote));
    assert!(m.position().in_checkmate(Force::Gote));
    assert_eq!(m.status(), GameStatus::Checkmate { winner: Force::Sente });
    assert!(m.notification().ends_with("Checkmate."));

    assert!(!m.touch_square(Force::Gote, sq("11")));
    assert_eq!(verdict(&m), "GameOver");
}

#[test]
fn pawn_drop_mate_is_illegal_but_pawn_move_mate_is_not() {
    let drop_position = parse_board(
        "
        . . . . . . . l k
        . . . . . . . . .
        . . . . . . . G .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . K . . . .
        ",
        Force::Sente,
        "P",
    );
    let mut m = match_from_position(drop_position);
    let pawn = m.position().hand(Force::Sente).pieces()[0].id;
    assert!(m.touch_piece_in_hand(Force::Sente, pawn));
    assert!(!m.touch_square(Force::Sente, sq("12")));
    assert_eq!(verdict(&m), "PawnDropMate");
    assert_eq!(m.selection(), Some(Selection::HandPiece(pawn)));
    assert_eq!(m.active_force(), Force::Sente);

    // Dropping elsewhere is fine.
    assert!(m.touch_square(Force::Sente, sq("14")));
    assert_eq!(verdict(&m), "DropValid");

    let move_position = parse_board(
        "
        . . . . . . . l k
        . . . . . . . . .
        . . . . . . . G P
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . K . . . .
        ",
        Force::Sente,
        "-",
    );
    let mut m = match_from_position(move_position);
    replay_log(&mut m, "P-12=").unwrap();
    assert_eq!(m.status(), GameStatus::Checkmate { winner: Force::Sente });
}

#[test]
fn capture_changes_owner_and_demotes() {
    let mut m = standard_match();
    replay_log(&mut m, "7g7f 3c3d 8h2b+").unwrap();
    let horse = m.position().grid()[at("22")].unwrap();
    assert_eq!(horse.kind, PieceKind::Horse);
    assert_eq!(horse.force, Force::Sente);
    let captured_bishop = match m.last_action() {
        Some(LastAction::Move { captured: Some(id), promoted: true, .. }) => id,
        action => panic!("unexpected last action: {:?}", action),
    };
    let in_hand = m.position().piece(captured_bishop).unwrap();
    assert_eq!(in_hand.kind, PieceKind::Bishop);
    assert_eq!(in_hand.force, Force::Sente);
    assert_eq!(m.position().locate_piece(captured_bishop), Some(PieceLocation::Hand(Force::Sente)));

    // Recapture: the horse returns to being a bishop, now owned by Gote.
    replay_log(&mut m, "3a2b").unwrap();
    assert!(m.position().grid()[at("22")].is(piece!(Gote Silver)));
    assert_eq!(m.position().hand(Force::Gote).count(PieceKind::Bishop), 1);
    assert_eq!(m.position().hand(Force::Gote).count(PieceKind::Horse), 0);
    assert_eq!(
        m.position().piece(horse.id).map(|piece| (piece.kind, piece.force)),
        Some((PieceKind::Bishop, Force::Gote))
    );

    replay_log(&mut m, "B*45").unwrap();
    assert!(m.position().grid()[at("45")].is(piece!(Sente Bishop)));
    assert_eq!(
        position_to_sfen(m.position(), 6),
        "lnsgkg1nl/1r5s1/pppppp1pp/6p2/5B3/2P6/PP1PPPPPP/7R1/LNSGKGSNL w b 6"
    );
}

#[test]
fn drop_needs_piece_in_hand() {
    let mut m = standard_match();
    replay_log(&mut m, "7g7f 3c3d 8h2b+ 3a2b").unwrap();
    let err = replay_log(&mut m, "P*75").unwrap_err();
    assert_eq!(err, "P*75: no P in hand");
    assert_eq!(m.turn_log().len(), 4);
}

#[test]
fn nifu_through_the_match() {
    let position = parse_board(
        "
        . . . . k . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . P . . . .
        . . . . . . . . .
        . . . . K . . . .
        ",
        Force::Sente,
        "P",
    );
    let mut m = match_from_position(position);
    let command = parse_command(m.position(), "P*55").unwrap();
    assert!(!m.apply_command(Force::Sente, &command));
    assert_eq!(verdict(&m), "TwoPawnsInFile");
    assert_eq!(m.state(), MatchState::Idle);
    assert_eq!(m.position().hand(Force::Sente).len(), 1);
}

#[test]
fn checkmate_implies_check() {
    let boards = [
        "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b -",
        "8k/9/7G1/9/9/9/9/9/R3K4 w -",
        "7lk/9/7GP/9/9/9/9/9/4K4 w -",
        "7lk/7P1/7G1/9/9/9/9/9/4K4 w -",
        "4k4/4G4/4P4/9/9/9/9/9/4K4 w -",
    ];
    for sfen in boards {
        let position = shogi_rules::sfen::parse_sfen(sfen).unwrap();
        for force in [Force::Sente, Force::Gote] {
            if position.in_checkmate(force) {
                assert!(position.in_check(force), "{}", sfen);
            }
        }
    }
}

#[test]
fn handicap_game_starts_with_gote() {
    let rules = ShogiRules {
        starting_position: StartingPosition::Handicap(Handicap::Bishop),
    };
    let mut m = ShogiMatch::new(rules, sample_players()).unwrap();
    assert_eq!(m.active_force(), Force::Gote);
    assert!(m.position().grid().is_empty(at("22")));
    assert!(!m.touch_square(Force::Sente, sq("77")));
    replay_log(&mut m, "3c3d 7g7f").unwrap();
    assert_eq!(m.active_force(), Force::Gote);
}

#[test]
fn replay_stops_at_illegal_turn() {
    let mut m = standard_match();
    let err = replay_log(&mut m, "7g7f 3c3d 7f7d").unwrap_err();
    assert!(err.starts_with("7f7d"), "{}", err);
    assert_eq!(m.turn_log().len(), 2);
    assert_eq!(m.active_force(), Force::Sente);
    assert_eq!(m.state(), MatchState::Idle);

    assert!(replay_log(&mut m, "hello").is_err());
}

#[test]
fn king_cannot_walk_into_check() {
    let position = parse_board(
        "
        . . . . k . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . r . . . . .
        . . . . K . . . .
        ",
        Force::Sente,
        "-",
    );
    let mut m = match_from_position(position);
    assert!(m.touch_square(Force::Sente, sq("59")));
    assert!(!m.touch_square(Force::Sente, sq("58")));
    assert_eq!(verdict(&m), "KingLeftInCheck");
    assert!(m.touch_square(Force::Sente, sq("68")));
    assert_eq!(verdict(&m), "MoveValid");
    assert_eq!(m.position().hand(Force::Sente).count(PieceKind::Rook), 1);
}

#[test]
fn last_action_serializes() {
    let mut m = standard_match();
    replay_log(&mut m, "7g7f").unwrap();
    let json = serde_json::to_value(m.last_action().unwrap()).unwrap();
    assert_eq!(json["Move"]["from"], serde_json::json!(77));
    assert_eq!(json["Move"]["to"], serde_json::json!(76));
    assert_eq!(json["Move"]["captured"], serde_json::Value::Null);
}

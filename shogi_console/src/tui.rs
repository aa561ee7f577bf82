use console::Style;
use itertools::Itertools;
use shogi_rules::board::Position;
use shogi_rules::coord::{Coord, File, Rank};
use shogi_rules::force::Force;
use shogi_rules::game::{GameStatus, LastAction, MatchState, Selection, ShogiMatch};
use shogi_rules::piece::{Piece, PieceKind, piece_to_ascii};


const HAND_ORDER: [PieceKind; 7] = [
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Gold,
    PieceKind::Silver,
    PieceKind::Knight,
    PieceKind::Lance,
    PieceKind::Pawn,
];

#[derive(Clone, Copy, Default, Debug)]
pub struct Highlight {
    pub selected: Option<Coord>,
    pub last_move: Option<Coord>,
}

fn format_square(s: &str) -> String { format!("{:^3}", s) }

fn piece_label(piece: Piece) -> String {
    let prefix = if piece.kind.is_promoted() { '+' } else { ' ' };
    format!("{}{} ", prefix, piece_to_ascii(piece.kind, piece.force))
}

fn render_square(position: &Position, coord: Coord, highlight: Highlight) -> String {
    let (label, mut style) = match position.grid()[coord] {
        Some(piece) => {
            let style = match piece.force {
                Force::Sente => Style::new(),
                Force::Gote => Style::new().red(),
            };
            (piece_label(piece), style)
        }
        None => (format_square("."), Style::new().dim()),
    };
    if highlight.selected == Some(coord) {
        style = style.reverse();
    } else if highlight.last_move == Some(coord) {
        style = style.underlined();
    }
    style.apply_to(label).to_string()
}

// Sente's view: file 9 on the left, rank 1 at the top.
pub fn render_position(position: &Position, highlight: Highlight) -> String {
    let header = File::all().rev().map(|file| format_square(&file.to_char().to_string())).join("");
    let mut lines = vec![header.trim_end().to_owned()];
    for rank in Rank::all() {
        let squares = File::all()
            .rev()
            .map(|file| render_square(position, Coord::new(file, rank), highlight))
            .join("");
        lines.push(format!("{}{}", squares, rank.to_char()));
    }
    lines.join("\n")
}

pub fn render_hand(position: &Position, force: Force) -> String {
    let hand = position.hand(force);
    let stacks = HAND_ORDER
        .iter()
        .filter_map(|&kind| match hand.count(kind) {
            0 => None,
            1 => Some(piece_to_ascii(kind, force).to_string()),
            n => Some(format!("{}{}", n, piece_to_ascii(kind, force))),
        })
        .join(" ");
    if stacks.is_empty() { "-".to_owned() } else { stacks }
}

fn render_player_line(shogi_match: &ShogiMatch, force: Force) -> String {
    let to_move = shogi_match.is_active() && shogi_match.active_force() == force;
    let name = format!(
        "Player {} ({})",
        force.number(),
        shogi_match.player(force).name
    );
    let name = if to_move { Style::new().bold().apply_to(name).to_string() } else { name };
    format!("{}  hand: {}", name, render_hand(shogi_match.position(), force))
}

fn render_status(shogi_match: &ShogiMatch) -> String {
    match shogi_match.status() {
        GameStatus::Checkmate { winner } => format!(
            "Checkmate. Player {} ({}) wins.",
            winner.number(),
            shogi_match.player(winner).name
        ),
        GameStatus::Active => match shogi_match.state() {
            MatchState::AwaitingPromotionChoice => "Promote? (promote / decline)".to_owned(),
            MatchState::Idle | MatchState::SquareSelected | MatchState::HandPieceSelected => {
                format!("Player {} to move.", shogi_match.active_force().number())
            }
        },
    }
}

pub fn render_match(shogi_match: &ShogiMatch) -> String {
    let highlight = Highlight {
        selected: match shogi_match.selection() {
            Some(Selection::Square(coord)) => Some(coord),
            Some(Selection::HandPiece(_)) | None => None,
        },
        last_move: shogi_match.last_action().and_then(|action| match action {
            LastAction::Move { to, .. } | LastAction::Drop { to, .. } => Coord::from_id(to),
        }),
    };
    format!(
        "{}\n{}\n{}\n{}",
        render_player_line(shogi_match, Force::Gote),
        render_position(shogi_match.position(), highlight),
        render_player_line(shogi_match, Force::Sente),
        render_status(shogi_match),
    )
}

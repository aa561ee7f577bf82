// Test utilities shared by unit tests, integration tests and the console's replay command.

use enum_map::{EnumMap, enum_map};
use lazy_static::lazy_static;
use regex_lite::Regex;

use crate::force::Force;
use crate::game::ShogiMatch;
use crate::notation::parse_command;
use crate::player::Player;


lazy_static! {
    static ref TURN_NUMBER_RE: Regex = Regex::new(r"^(?:[0-9]+\.)?(.*)$").unwrap();
}

pub fn sample_players() -> EnumMap<Force, Player> {
    enum_map! {
        Force::Sente => Player::new("Alice".to_owned()),
        Force::Gote => Player::new("Bob".to_owned()),
    }
}

// Plays a whitespace-separated list of turns, e.g. "1.7g7f 2.3c3d P-26". Each turn is played by
// the side to move. Stops at the first turn that is rejected.
pub fn replay_log(shogi_match: &mut ShogiMatch, log: &str) -> Result<(), String> {
    for word in log.split_whitespace() {
        let turn_notation = TURN_NUMBER_RE
            .captures(word)
            .and_then(|caps| caps.get(1))
            .map_or(word, |m| m.as_str());
        if turn_notation.is_empty() {
            continue;
        }
        let player = shogi_match.active_force();
        let command = parse_command(shogi_match.position(), turn_notation)
            .map_err(|err| format!("{}: {}", turn_notation, err))?;
        if !shogi_match.apply_command(player, &command) {
            return Err(format!("{}: {}", turn_notation, shogi_match.notification()));
        }
    }
    Ok(())
}

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod config;
mod tui;

use std::io::{self, BufRead};

use anyhow::Context;
use clap::{Command, arg};
use config::{MatchConfig, read_config_file};
use log::info;
use shogi_rules::coord::SquareId;
use shogi_rules::force::Force;
use shogi_rules::game::ShogiMatch;
use shogi_rules::notation::parse_command;
use shogi_rules::piece::PieceKind;
use shogi_rules::sfen::{parse_sfen, position_to_sfen};
use shogi_rules::test_util::replay_log;


fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config_arg = || {
        arg!(-c --"config" <config_file> "Path to a yaml-serialized MatchConfig").required(false)
    };
    let matches = Command::new("Shogi")
        .version(clap::crate_version!())
        .about("Shogi rule engine console app")
        .subcommand_required(true)
        .subcommand(
            Command::new("play")
                .about("Play a match on the terminal, reading turns from stdin")
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("show")
                .about("Render a position given in SFEN")
                .arg(arg!(<sfen> "Position in SFEN, quoted")),
        )
        .subcommand(
            Command::new("replay")
                .about("Replay a list of turns and print the final position")
                .arg(config_arg())
                .arg(arg!(<turns> "Whitespace-separated turns, e.g. \"7g7f 3c3d\"")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("play", sub_matches)) => {
            run_play(load_config(sub_matches.get_one::<String>("config"))?)
        }
        Some(("show", sub_matches)) => {
            let sfen = sub_matches.get_one::<String>("sfen").context("Missing SFEN")?;
            run_show(sfen)
        }
        Some(("replay", sub_matches)) => {
            let turns = sub_matches.get_one::<String>("turns").context("Missing turns")?;
            run_replay(load_config(sub_matches.get_one::<String>("config"))?, turns)
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}

fn load_config(filename: Option<&String>) -> anyhow::Result<MatchConfig> {
    match filename {
        Some(filename) => read_config_file(filename),
        None => Ok(MatchConfig::default()),
    }
}

fn new_match(config: &MatchConfig) -> anyhow::Result<ShogiMatch> {
    ShogiMatch::new(config.rules.clone(), config.players())
        .map_err(anyhow::Error::msg)
        .context("Invalid starting position")
}

fn run_show(sfen: &str) -> anyhow::Result<()> {
    let position = parse_sfen(sfen).map_err(anyhow::Error::msg).context("Invalid SFEN")?;
    println!("{}", tui::render_position(&position, tui::Highlight::default()));
    println!("hand 1: {}", tui::render_hand(&position, Force::Sente));
    println!("hand 2: {}", tui::render_hand(&position, Force::Gote));
    Ok(())
}

fn run_replay(config: MatchConfig, turns: &str) -> anyhow::Result<()> {
    let mut shogi_match = new_match(&config)?;
    let result = replay_log(&mut shogi_match, turns);
    println!("{}", tui::render_match(&shogi_match));
    if let Some(action) = shogi_match.last_action() {
        println!("{}", serde_json::to_string(&action)?);
    }
    let move_number = shogi_match.turn_log().len() as u32 + 1;
    println!("{}", position_to_sfen(shogi_match.position(), move_number));
    result.map_err(anyhow::Error::msg).context("Replay stopped")
}

// Besides move notation, the loop understands the touch commands directly:
//   touch <square>    e.g. "touch 77"
//   hand <kind>       e.g. "hand P"
//   promote | decline
//   sfen | quit
fn run_play(config: MatchConfig) -> anyhow::Result<()> {
    let mut shogi_match = new_match(&config)?;
    println!("{}", tui::render_match(&shogi_match));
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        let words = line.split_whitespace().collect::<Vec<_>>();
        let player = shogi_match.active_force();
        let changed = match words.as_slice() {
            [] => continue,
            ["quit"] => break,
            ["sfen"] => {
                let move_number = shogi_match.turn_log().len() as u32 + 1;
                println!("{}", position_to_sfen(shogi_match.position(), move_number));
                continue;
            }
            ["touch", square] => match SquareId::parse(square) {
                Some(square) => shogi_match.touch_square(player, square),
                None => {
                    println!("Not a square: {square}");
                    continue;
                }
            },
            ["hand", kind] => {
                let piece = kind
                    .chars()
                    .next()
                    .and_then(PieceKind::from_ascii)
                    .and_then(|kind| {
                        let hand = shogi_match.position().hand(player);
                        hand.pieces().iter().find(|piece| piece.kind == kind).copied()
                    });
                match piece {
                    Some(piece) => shogi_match.touch_piece_in_hand(player, piece.id),
                    None => {
                        println!("No such piece in hand: {kind}");
                        continue;
                    }
                }
            }
            ["promote"] => shogi_match.touch_promotion_option(player, true),
            ["decline"] => shogi_match.touch_promotion_option(player, false),
            _ => match parse_command(shogi_match.position(), &line) {
                Ok(command) => shogi_match.apply_command(player, &command),
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            },
        };
        if changed {
            println!("{}", tui::render_match(&shogi_match));
        }
        println!("{}", shogi_match.notification());
        if !shogi_match.is_active() {
            info!("Match finished after {} turns", shogi_match.turn_log().len());
            break;
        }
    }
    Ok(())
}

use anyhow::Context;
use enum_map::{EnumMap, enum_map};
use serde::{Deserialize, Serialize};
use shogi_rules::force::Force;
use shogi_rules::player::Player;
use shogi_rules::rules::ShogiRules;


// Everything a console match needs. Every field is optional in the YAML file, e.g.
//
//   sente_name: Alice
//   rules:
//     starting_position: !Handicap TwoPieces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub rules: ShogiRules,
    pub sente_name: String,
    pub gote_name: String,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            rules: ShogiRules::standard(),
            sente_name: "Sente".to_owned(),
            gote_name: "Gote".to_owned(),
        }
    }
}

impl MatchConfig {
    pub fn players(&self) -> EnumMap<Force, Player> {
        enum_map! {
            Force::Sente => Player::new(self.sente_name.clone()),
            Force::Gote => Player::new(self.gote_name.clone()),
        }
    }
}

pub fn read_config_file(filename: &str) -> anyhow::Result<MatchConfig> {
    let contents = std::fs::read_to_string(filename)
        .with_context(|| format!("Failed to read config file '{filename}'."))?;
    parse_config(&contents).with_context(|| format!("Failed to parse config file '{filename}'."))
}

pub fn parse_config(contents: &str) -> anyhow::Result<MatchConfig> {
    Ok(serde_yaml::from_str(contents)?)
}


#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use shogi_rules::rules::{Handicap, StartingPosition};

    use super::*;

    #[test]
    fn partial_config() {
        let config = parse_config(indoc! {"
            sente_name: Alice
            rules:
              starting_position: !Handicap TwoPieces
        "})
        .unwrap();
        assert_eq!(config.sente_name, "Alice");
        assert_eq!(config.gote_name, "Gote");
        assert_eq!(
            config.rules.starting_position,
            StartingPosition::Handicap(Handicap::TwoPieces)
        );
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(parse_config("{}").unwrap(), MatchConfig::default());
    }

    #[test]
    fn unknown_handicap_is_an_error() {
        assert!(parse_config("rules: { starting_position: !Handicap Queen }").is_err());
    }
}

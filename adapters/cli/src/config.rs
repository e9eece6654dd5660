//! Command-line arguments and the optional TOML settings file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use color_wars_system_autoplay::Strategy;
use color_wars_world::GameConfig;
use serde::Deserialize;

const DEFAULT_WIDTH: u32 = 5;
const DEFAULT_HEIGHT: u32 = 5;
const DEFAULT_SEED: u64 = 0x5eed;
const DEFAULT_PLAYERS: [&str; 2] = ["red", "blue"];

/// Turn-based territory capture on a grid.
#[derive(Debug, Parser)]
#[command(name = "color-wars", version)]
pub(crate) struct Cli {
    /// TOML file providing defaults for the options below.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Number of grid columns.
    #[arg(long)]
    pub(crate) width: Option<u32>,
    /// Number of grid rows.
    #[arg(long)]
    pub(crate) height: Option<u32>,
    /// Comma-separated player names in turn order.
    #[arg(long, value_delimiter = ',')]
    pub(crate) players: Option<Vec<String>>,
    /// File of moves (`x y` per line, or `reset`) to replay instead of reading stdin.
    #[arg(long, conflicts_with = "autoplay")]
    pub(crate) script: Option<PathBuf>,
    /// Let the built-in autoplayer move for every player.
    #[arg(long)]
    pub(crate) autoplay: bool,
    /// Seed for the autoplayer.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Move selection strategy for the autoplayer.
    #[arg(long, value_enum)]
    pub(crate) strategy: Option<StrategyArg>,
    /// Upper bound on autoplayed moves.
    #[arg(long, default_value_t = 500)]
    pub(crate) max_moves: usize,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub(crate) verbose: u8,
}

/// Autoplay strategies selectable from the command line or the settings file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StrategyArg {
    /// Any legal cell.
    Random,
    /// The strongest owned cell.
    Greedy,
}

impl From<StrategyArg> for Strategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Random => Strategy::Random,
            StrategyArg::Greedy => Strategy::Greedy,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    width: Option<u32>,
    height: Option<u32>,
    players: Option<Vec<String>>,
    seed: Option<u64>,
    strategy: Option<StrategyArg>,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("settings file is not valid toml")
    }
}

/// Effective settings after merging flags over the settings file over defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) names: Vec<String>,
    pub(crate) seed: u64,
    pub(crate) strategy: Strategy,
    pub(crate) max_moves: usize,
}

impl Settings {
    pub(crate) fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(cli, file))
    }

    fn merge(cli: &Cli, file: FileConfig) -> Self {
        let names = cli
            .players
            .clone()
            .or(file.players)
            .unwrap_or_else(|| DEFAULT_PLAYERS.iter().map(|name| (*name).to_owned()).collect());
        let strategy = cli
            .strategy
            .or(file.strategy)
            .unwrap_or(StrategyArg::Greedy);

        Self {
            width: cli.width.or(file.width).unwrap_or(DEFAULT_WIDTH),
            height: cli.height.or(file.height).unwrap_or(DEFAULT_HEIGHT),
            names,
            seed: cli.seed.or(file.seed).unwrap_or(DEFAULT_SEED),
            strategy: strategy.into(),
            max_moves: cli.max_moves,
        }
    }

    pub(crate) fn game_config(&self) -> Result<GameConfig> {
        let count = u32::try_from(self.names.len()).context("too many players")?;
        Ok(GameConfig::with_player_count(self.width, self.height, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["color-wars"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).expect("arguments parse")
    }

    #[test]
    fn defaults_apply_without_flags_or_file() {
        let settings = Settings::merge(&cli(&[]), FileConfig::default());

        assert_eq!(settings.width, DEFAULT_WIDTH);
        assert_eq!(settings.height, DEFAULT_HEIGHT);
        assert_eq!(settings.names, vec!["red".to_owned(), "blue".to_owned()]);
        assert_eq!(settings.strategy, Strategy::Greedy);
    }

    #[test]
    fn flags_override_the_settings_file() {
        let file = FileConfig::parse(
            r#"
            width = 8
            height = 6
            players = ["north", "south", "east"]
            strategy = "random"
            "#,
        )
        .expect("valid toml");

        let settings = Settings::merge(&cli(&["--width", "3", "--players", "a,b"]), file);

        assert_eq!(settings.width, 3);
        assert_eq!(settings.height, 6);
        assert_eq!(settings.names, vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(settings.strategy, Strategy::Random);
    }

    #[test]
    fn unknown_settings_keys_are_rejected() {
        assert!(FileConfig::parse("colour = \"red\"").is_err());
    }

    #[test]
    fn script_conflicts_with_autoplay() {
        let parsed = Cli::try_parse_from(["color-wars", "--autoplay", "--script", "moves.txt"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn game_config_numbers_players_in_order() {
        let settings = Settings::merge(&cli(&["--players", "x,y,z"]), FileConfig::default());
        let config = settings.game_config().expect("player count fits");

        assert_eq!(config.players().len(), 3);
        assert_eq!(config.width(), DEFAULT_WIDTH);
    }
}

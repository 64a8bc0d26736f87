use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use sprt_core::{attribution::IdentityPair, sprt::SprtParameters};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pgnsprt", version, about = "Run SPRT on games from PGN files")]
pub struct Args {
    /// PGN files. Standard input is read when none are given
    #[arg(value_name = "PGN")]
    pub pgn_files: Vec<PathBuf>,

    /// Player counted as the opponent ("them")
    #[arg(long)]
    pub player0: Option<String>,
    /// Player whose results are counted ("us")
    #[arg(long)]
    pub player1: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub elo0: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub elo1: Option<f64>,
    #[arg(long)]
    pub alpha: Option<f64>,
    #[arg(long)]
    pub beta: Option<f64>,

    /// Stop successfully once this many games are counted. 0 disables the cap
    #[arg(long)]
    pub games: Option<u32>,

    /// YAML file with default values for any of the options above
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print a JSON summary after the run
    #[arg(long)]
    pub json: bool,

    #[arg(long)]
    pub no_color: bool,
}

/// Contents of a `--config` file. Every field is optional.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub player0: Option<String>,
    pub player1: Option<String>,
    pub elo0: Option<f64>,
    pub elo1: Option<f64>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub games: Option<u32>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&yaml).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(yaml: &str) -> anyhow::Result<Self> {
        // an empty document deserializes as unit, not as a map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Everything a run needs, after merging flags, the config file and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub players: IdentityPair,
    pub params: SprtParameters,
    pub games_cap: Option<u32>,
}

fn non_empty(name: Option<String>) -> Option<String> {
    name.filter(|n| !n.is_empty())
}

impl RunConfig {
    /// Command-line flags win over the config file, which wins over built-in defaults.
    pub fn merge(args: &Args, file: &ConfigFile) -> anyhow::Result<Self> {
        let defaults = SprtParameters::default();
        let params = SprtParameters {
            elo0: args.elo0.or(file.elo0).unwrap_or(defaults.elo0),
            elo1: args.elo1.or(file.elo1).unwrap_or(defaults.elo1),
            alpha: args.alpha.or(file.alpha).unwrap_or(defaults.alpha),
            beta: args.beta.or(file.beta).unwrap_or(defaults.beta),
        };
        params.validate().context("invalid SPRT parameters")?;

        let us = non_empty(args.player1.clone().or_else(|| file.player1.clone()));
        let them = non_empty(args.player0.clone().or_else(|| file.player0.clone()));
        if us.is_some() && us == them {
            anyhow::bail!("player0 and player1 must be different players");
        }

        Ok(Self {
            players: IdentityPair::seeded(us, them),
            params,
            games_cap: args.games.or(file.games).filter(|&games| games > 0),
        })
    }

    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let file = match &args.config {
            Some(path) => ConfigFile::read(path)?,
            None => ConfigFile::default(),
        };
        Self::merge(args, &file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pgnsprt").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::from_args(&parse_args(&[])).unwrap();
        assert_eq!(config.params, SprtParameters::default());
        assert_eq!(config.players, IdentityPair::new());
        assert_eq!(config.games_cap, None);
    }

    #[test]
    fn test_flags() {
        let args = parse_args(&[
            "--player0", "old", "--player1", "new", "--elo0", "-5", "--elo1", "10.5", "--alpha",
            "0.1", "--beta", "0.2", "--games", "500", "a.pgn", "b.pgn",
        ]);
        assert_eq!(args.pgn_files, vec![PathBuf::from("a.pgn"), PathBuf::from("b.pgn")]);

        let config = RunConfig::from_args(&args).unwrap();
        assert_eq!(config.params, SprtParameters::new(-5.0, 10.5, 0.1, 0.2));
        assert_eq!(config.players.us(), Some("new"));
        assert_eq!(config.players.them(), Some("old"));
        assert_eq!(config.games_cap, Some(500));
    }

    #[test]
    fn test_empty_player_and_zero_games_mean_unset() {
        let args = parse_args(&["--player0", "", "--games", "0"]);
        let config = RunConfig::from_args(&args).unwrap();
        assert_eq!(config.players.them(), None);
        assert_eq!(config.games_cap, None);
    }

    #[test]
    fn test_flags_override_config_file() {
        let file = ConfigFile::parse("elo1: 10\nalpha: 0.01\nplayer1: dev\ngames: 100\n").unwrap();
        let args = parse_args(&["--alpha", "0.02"]);

        let config = RunConfig::merge(&args, &file).unwrap();
        assert_eq!(config.params, SprtParameters::new(0.0, 10.0, 0.02, 0.05));
        assert_eq!(config.players.us(), Some("dev"));
        assert_eq!(config.games_cap, Some(100));
    }

    #[test]
    fn test_config_file_rejects_unknown_keys() {
        assert!(ConfigFile::parse("elo2: 4\n").is_err());
        assert_eq!(ConfigFile::parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(RunConfig::from_args(&parse_args(&["--alpha", "1.5"])).is_err());
        assert!(RunConfig::from_args(&parse_args(&["--beta", "0"])).is_err());
        assert!(
            RunConfig::from_args(&parse_args(&["--player0", "same", "--player1", "same"]))
                .is_err()
        );
    }
}

//! CLI argument definitions and parsing.

pub mod types;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use types::{GameId, Season, Week};

use crate::engine::validation::PoolRules;

/// Database location shared by every command that touches storage
#[derive(Debug, Args)]
pub struct DbArgs {
    /// SQLite database path (or set `CFB_PICKEM_DB` env var).
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,
}

/// Pick rule overrides
#[derive(Debug, Args)]
pub struct RuleArgs {
    /// Picks allowed per week on regular games.
    #[clap(long, default_value_t = PoolRules::default().weekly_pick_limit)]
    pub weekly_limit: usize,
}

impl RuleArgs {
    pub fn rules(&self) -> PoolRules {
        PoolRules {
            weekly_pick_limit: self.weekly_limit,
            ..PoolRules::default()
        }
    }
}

#[derive(Debug, Parser)]
#[clap(name = "cfb-pickem", about = "College football pick'em pool")]
pub struct Cli {
    #[clap(flatten)]
    pub db: DbArgs,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a pool member
    AddUser {
        name: String,
    },

    /// Classify a game from its teams and notes without storing anything
    Classify {
        #[clap(long)]
        home: String,

        #[clap(long)]
        away: String,

        /// Upstream notes, e.g. "Rose Bowl Game presented by Prudential".
        #[clap(long)]
        notes: Option<String>,

        /// Season year (e.g. 2025).
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        #[clap(long, short, default_value_t = Week::default())]
        week: Week,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Fetch a week of games and lines from CollegeFootballData and store them.
    ///
    /// Re-classifies every game and forces double-downs onto existing picks
    /// when a game's category requires one.
    Sync {
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        #[clap(long, short, default_value_t = Week::default())]
        week: Week,

        /// Fetch postseason games (upstream numbers bowl weeks from 1).
        #[clap(long)]
        postseason: bool,

        /// Load games from a saved `/games` JSON file instead of the API.
        #[clap(long)]
        file: Option<PathBuf>,

        /// API key (or set `CFBD_API_KEY` env var).
        #[clap(long)]
        api_key: Option<String>,

        #[clap(long)]
        json: bool,
    },

    /// Show a week's games, categories and results against the spread
    Games {
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        #[clap(long, short, default_value_t = Week::default())]
        week: Week,

        #[clap(long)]
        json: bool,
    },

    /// Pick a team against the spread; the current line is locked in
    Pick {
        /// Pool member name.
        #[clap(long, short)]
        user: String,

        #[clap(long, short)]
        game: GameId,

        #[clap(long, short)]
        team: String,

        #[clap(long)]
        double_down: bool,

        #[clap(flatten)]
        rules: RuleArgs,
    },

    /// Remove a pick before kickoff
    Unpick {
        #[clap(long, short)]
        user: String,

        #[clap(long, short)]
        game: GameId,

        #[clap(flatten)]
        rules: RuleArgs,
    },

    /// Score final games and apply missing-pick penalties
    Score {
        #[clap(long)]
        json: bool,
    },

    /// Re-score one game after an upstream score correction
    Rescore {
        #[clap(long, short)]
        game: GameId,

        #[clap(long)]
        json: bool,
    },

    /// Rebuild every total score from pick points
    Recompute {
        #[clap(long)]
        json: bool,
    },

    /// Users ranked by total score
    Leaderboard {
        #[clap(long)]
        json: bool,
    },
}

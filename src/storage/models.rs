//! Data models for the storage layer

use crate::engine::classifier::{GameCategory, GameSignals};
use crate::engine::scoring::{PickResult, ScoredPick};
use crate::{GameId, PickId, Season, UserId, Week};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pool member and their running score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub total_score: i64,
}

/// One scheduled contest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: GameId,
    pub external_id: u64,
    pub season: Season,
    pub week: Week,
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>,
    /// Home-team perspective: negative means home favored.
    pub spread: Option<f64>,
    pub over_under: Option<f64>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub completed: bool,
    pub notes: Option<String>,
    pub category: GameCategory,
}

impl Game {
    /// Completed with both scores present.
    pub fn is_final(&self) -> bool {
        self.completed && self.home_score.is_some() && self.away_score.is_some()
    }

    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.start_time
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    pub fn signals(&self) -> GameSignals<'_> {
        GameSignals {
            home_team: &self.home_team,
            away_team: &self.away_team,
            week: self.week,
            season: self.season,
            notes: self.notes.as_deref(),
        }
    }
}

/// Game data as written by a sync, before it has a local id.
///
/// `sync_games` recomputes `category` from the other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGame {
    pub external_id: u64,
    pub season: Season,
    pub week: Week,
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>,
    pub spread: Option<f64>,
    pub over_under: Option<f64>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub completed: bool,
    pub notes: Option<String>,
    pub category: GameCategory,
    /// Upstream marked the game as postseason. Not persisted.
    #[serde(default)]
    pub postseason: bool,
}

impl NewGame {
    pub fn signals(&self) -> GameSignals<'_> {
        GameSignals {
            home_team: &self.home_team,
            away_team: &self.away_team,
            week: self.week,
            season: self.season,
            notes: self.notes.as_deref(),
        }
    }
}

/// One user's choice for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub pick_id: PickId,
    pub user_id: UserId,
    pub game_id: GameId,
    pub picked_team: String,
    /// Spread at submission time; scoring never reads the live line.
    pub locked_spread: f64,
    pub is_double_down: bool,
    pub points: Option<i32>,
    pub result: Option<PickResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a `score_completed_picks` run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettlementReport {
    pub scored: Vec<ScoredPick>,
    /// Picks another run scored first.
    pub already_scored: usize,
    pub failed: usize,
}

/// A system-created pick for a user who skipped a mandatory game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Penalty {
    pub user_id: UserId,
    pub game_id: GameId,
    pub points: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PenaltyReport {
    pub penalties: Vec<Penalty>,
    pub failed: usize,
}

/// Change applied to one pick by a rescore
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correction {
    pub pick_id: PickId,
    pub user_id: UserId,
    pub old_points: i32,
    pub new_points: i32,
    pub result: PickResult,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RescoreReport {
    pub corrections: Vec<Correction>,
    pub unchanged: usize,
    pub failed: usize,
}

/// A user whose stored total disagreed with the sum of their pick points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDrift {
    pub user_id: UserId,
    pub name: String,
    pub stored: i64,
    pub recomputed: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub games: usize,
    pub forced_double_downs: usize,
    /// Upstream ids of bowl-season games that classified as regular.
    pub needs_review: Vec<u64>,
}

//! Point values for completed picks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::classifier::{scoring_tier, BowlTier, GameCategory};
use super::spread::spread_winner;
use crate::error::{PoolError, Result};
use crate::storage::models::{Game, Pick};
use crate::{GameId, PickId, UserId};


/// Team name stored on system-generated penalty picks.
pub const NO_PICK: &str = "NO_PICK";

/// Points for skipping a game that had to be picked.
pub const MISSING_PICK_PENALTY: i32 = -1;

/// How a pick fared against the locked spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Loss,
    Push,
}

/// Result label persisted on a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickResult {
    Win,
    Loss,
    Push,
    NoPick,
}

impl PickResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickResult::Win => "win",
            PickResult::Loss => "loss",
            PickResult::Push => "push",
            PickResult::NoPick => "no_pick",
        }
    }
}

impl From<Outcome> for PickResult {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win => PickResult::Win,
            Outcome::Loss => PickResult::Loss,
            Outcome::Push => PickResult::Push,
        }
    }
}

impl fmt::Display for PickResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PickResult {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "win" => Ok(PickResult::Win),
            "loss" => Ok(PickResult::Loss),
            "push" => Ok(PickResult::Push),
            "no_pick" => Ok(PickResult::NoPick),
            other => Err(PoolError::InvalidResult {
                value: other.to_string(),
            }),
        }
    }
}

/// A pick with its final points, ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPick {
    pub pick_id: PickId,
    pub user_id: UserId,
    pub game_id: GameId,
    pub picked_team: String,
    pub category: GameCategory,
    pub tier: Option<BowlTier>,
    pub result: PickResult,
    pub points: i32,
}

fn stake(high: bool, outcome: Outcome) -> i32 {
    match (high, outcome) {
        (true, Outcome::Win) => 2,
        (true, Outcome::Loss | Outcome::Push) => -1,
        (false, Outcome::Win) => 1,
        (false, Outcome::Loss | Outcome::Push) => 0,
    }
}

/// Points for one pick.
///
/// Bowl and playoff games score by tier and ignore `is_double_down`; a
/// missing tier scores as standard. Every other category scores by the
/// double-down flag.
pub fn compute_points(
    category: GameCategory,
    tier: Option<BowlTier>,
    outcome: Outcome,
    is_double_down: bool,
) -> i32 {
    if category.is_tiered() {
        stake(tier == Some(BowlTier::Premium), outcome)
    } else {
        stake(is_double_down, outcome)
    }
}

/// Score a pick against its game's final, using the spread locked on the pick.
pub fn score_pick(game: &Game, pick: &Pick) -> Result<ScoredPick> {
    let (home_score, away_score) = match (game.completed, game.home_score, game.away_score) {
        (true, Some(home), Some(away)) => (home, away),
        _ => {
            return Err(PoolError::GameNotFinal {
                game_id: game.game_id,
            })
        }
    };

    let cover = spread_winner(
        home_score,
        away_score,
        pick.locked_spread,
        &game.home_team,
        &game.away_team,
    );

    let outcome = if cover.is_push() {
        Outcome::Push
    } else if cover.covered_by(&pick.picked_team) {
        Outcome::Win
    } else {
        Outcome::Loss
    };

    let tier = scoring_tier(game.category, game.notes.as_deref());
    let points = compute_points(game.category, tier, outcome, pick.is_double_down);

    Ok(ScoredPick {
        pick_id: pick.pick_id,
        user_id: pick.user_id,
        game_id: game.game_id,
        picked_team: pick.picked_team.clone(),
        category: game.category,
        tier,
        result: outcome.into(),
        points,
    })
}

/// Whether skipping this game costs a penalty: a final premium-tier bowl or playoff game.
pub fn penalty_applies(game: &Game) -> bool {
    game.is_final()
        && game.category.rules().must_pick_all
        && scoring_tier(game.category, game.notes.as_deref()) == Some(BowlTier::Premium)
}

//! Pick submission rules.
//!
//! Every check here is pure: callers load the game and the user's other
//! picks for the same week and pass the current time in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::classifier::GameCategory;
use crate::storage::models::Game;
use crate::GameId;


/// Pool-wide pick limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRules {
    /// Picks per week on regular games.
    pub weekly_pick_limit: usize,
    /// Double-downs a user may choose on regular games each week.
    pub discretionary_double_downs: usize,
}

impl Default for PoolRules {
    fn default() -> Self {
        Self {
            weekly_pick_limit: 5,
            discretionary_double_downs: 1,
        }
    }
}

/// One of the user's existing picks in the same season and week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekPick {
    pub game_id: GameId,
    pub category: GameCategory,
    pub is_double_down: bool,
}

/// A pick as the user submitted it.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub picked_team: &'a str,
    pub is_double_down: bool,
}

/// Why a submission or removal was refused. `Display` is shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("this game has already started")]
    GameStarted,

    #[error("{team} is not playing in this game")]
    UnknownTeam { team: String },

    #[error("no spread is available for this game yet")]
    NoSpread,

    #[error("{category} games can only be picked as a double-down")]
    DoubleDownRequired { category: GameCategory },

    #[error("you already have {limit} picks this week")]
    WeeklyLimitReached { limit: usize },

    #[error("you already used your double-down this week")]
    DoubleDownAlreadyUsed,

    #[error("one of your {limit} picks this week must be a double-down")]
    DoubleDownRequiredAtFullQuota { limit: usize },
}

/// Picks that use a weekly quota slot: regular games only.
fn counted(picks: &[WeekPick]) -> impl Iterator<Item = &WeekPick> {
    picks
        .iter()
        .filter(|p| p.category == GameCategory::Regular)
}

fn others(week_picks: &[WeekPick], game_id: GameId) -> Vec<WeekPick> {
    week_picks
        .iter()
        .filter(|p| p.game_id != game_id)
        .copied()
        .collect()
}

/// Check a new pick or a re-pick before it is written.
pub fn validate_submission(
    game: &Game,
    submission: &Submission<'_>,
    week_picks: &[WeekPick],
    now: DateTime<Utc>,
    rules: &PoolRules,
) -> Result<(), Rejection> {
    if game.has_started(now) {
        return Err(Rejection::GameStarted);
    }

    if !game.involves(submission.picked_team) {
        return Err(Rejection::UnknownTeam {
            team: submission.picked_team.to_string(),
        });
    }

    if game.spread.is_none() {
        return Err(Rejection::NoSpread);
    }

    let category_rules = game.category.rules();
    if category_rules.mandatory_double_down && !submission.is_double_down {
        return Err(Rejection::DoubleDownRequired {
            category: game.category,
        });
    }

    let is_new = !week_picks.iter().any(|p| p.game_id == game.game_id);
    let others = others(week_picks, game.game_id);
    let counted_others = counted(&others).count();
    let regular = game.category == GameCategory::Regular;

    if regular
        && is_new
        && counted_others >= rules.weekly_pick_limit
    {
        return Err(Rejection::WeeklyLimitReached {
            limit: rules.weekly_pick_limit,
        });
    }

    if submission.is_double_down && regular {
        let used = others
            .iter()
            .filter(|p| p.category == GameCategory::Regular && p.is_double_down)
            .count();
        if used >= rules.discretionary_double_downs {
            return Err(Rejection::DoubleDownAlreadyUsed);
        }
    }

    if regular && counted_others + 1 == rules.weekly_pick_limit {
        let has_double_down =
            submission.is_double_down || counted(&others).any(|p| p.is_double_down);
        if !has_double_down {
            return Err(Rejection::DoubleDownRequiredAtFullQuota {
                limit: rules.weekly_pick_limit,
            });
        }
    }

    Ok(())
}

/// Check that a pick may be deleted.
pub fn validate_removal(
    game: &Game,
    week_picks: &[WeekPick],
    now: DateTime<Utc>,
    rules: &PoolRules,
) -> Result<(), Rejection> {
    if game.has_started(now) {
        return Err(Rejection::GameStarted);
    }

    let remaining = others(week_picks, game.game_id);
    let full = counted(&remaining).count() == rules.weekly_pick_limit;
    if full && !counted(&remaining).any(|p| p.is_double_down) {
        return Err(Rejection::DoubleDownRequiredAtFullQuota {
            limit: rules.weekly_pick_limit,
        });
    }

    Ok(())
}

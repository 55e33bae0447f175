//! Against-the-spread winner.
//!
//! Spreads are stored from the home team's perspective: `-3.0` means the
//! home team is favored by three. This is the only place a covering side is
//! computed; display and scoring both call it.

use serde::Serialize;
use std::fmt;

/// Label used wherever a push is shown or stored as a winner.
pub const PUSH: &str = "Push";

/// Which side covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cover<'a> {
    Team(&'a str),
    Push,
}

impl<'a> Cover<'a> {
    pub fn is_push(&self) -> bool {
        matches!(self, Cover::Push)
    }

    /// Whether `team` is the side that covered. Never true on a push.
    pub fn covered_by(&self, team: &str) -> bool {
        matches!(self, Cover::Team(winner) if *winner == team)
    }
}

impl fmt::Display for Cover<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cover::Team(team) => f.write_str(team),
            Cover::Push => f.write_str(PUSH),
        }
    }
}

/// Decide who covered: home covers when `home_score + spread` beats the away score.
pub fn spread_winner<'a>(
    home_score: i32,
    away_score: i32,
    spread: f64,
    home_team: &'a str,
    away_team: &'a str,
) -> Cover<'a> {
    let adjusted = f64::from(home_score) + spread;
    let away = f64::from(away_score);

    if adjusted > away {
        Cover::Team(home_team)
    } else if adjusted < away {
        Cover::Team(away_team)
    } else {
        Cover::Push
    }
}

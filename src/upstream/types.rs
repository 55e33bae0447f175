//! CollegeFootballData response shapes and their conversion into pool games.

use crate::engine::classifier::{classify, GameCategory, POSTSEASON_START_WEEK};
use crate::error::Result;
use crate::storage::models::NewGame;
use crate::{Season, Week};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeasonType {
    Regular,
    Postseason,
    Both,
    #[serde(other)]
    Other,
}

impl SeasonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonType::Regular => "regular",
            SeasonType::Postseason => "postseason",
            SeasonType::Both => "both",
            SeasonType::Other => "other",
        }
    }
}

impl fmt::Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One game from the `/games` endpoint. Unused upstream fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamGame {
    pub id: u64,
    pub season: u16,
    pub week: u16,
    #[serde(default)]
    pub season_type: Option<SeasonType>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    pub home_team: String,
    pub away_team: String,
    pub home_points: Option<i32>,
    pub away_points: Option<i32>,
    pub notes: Option<String>,
    /// Filled in by `merge_lines`; also accepted inline in sync files.
    #[serde(default)]
    pub spread: Option<f64>,
    #[serde(default)]
    pub over_under: Option<f64>,
}

impl UpstreamGame {
    pub fn is_postseason(&self) -> bool {
        self.season_type == Some(SeasonType::Postseason)
    }

    /// Week in the pool's calendar. Upstream restarts postseason weeks at 1;
    /// the pool keeps counting from the first bowl week. Upstream's week 0
    /// kickoff games fold into week 1, since the pool calendar starts at 1.
    pub fn pool_week(&self) -> Week {
        if self.is_postseason() {
            Week::new(POSTSEASON_START_WEEK + self.week.saturating_sub(1))
        } else {
            Week::new(self.week.max(1))
        }
    }

    pub fn to_new_game(&self) -> NewGame {
        let mut game = NewGame {
            external_id: self.id,
            season: Season::new(self.season),
            week: self.pool_week(),
            home_team: self.home_team.clone(),
            away_team: self.away_team.clone(),
            start_time: self.start_date,
            spread: self.spread,
            over_under: self.over_under,
            home_score: self.home_points,
            away_score: self.away_points,
            completed: self.completed,
            notes: self.notes.clone(),
            category: GameCategory::Regular,
            postseason: self.is_postseason(),
        };
        game.category = classify(&game.signals());
        game
    }
}

/// Betting lines for one game from the `/lines` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLines {
    pub id: u64,
    #[serde(default)]
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub provider: String,
    /// Home-team perspective, same as the pool's spread.
    pub spread: Option<f64>,
    pub over_under: Option<f64>,
}

impl GameLines {
    /// First provider that posted a spread.
    pub fn consensus(&self) -> Option<&Line> {
        self.lines.iter().find(|line| line.spread.is_some())
    }
}

/// Attach the consensus line to each game. Games without a posted spread keep
/// whatever they had. Returns how many games received a line.
pub fn merge_lines(games: &mut [UpstreamGame], lines: &[GameLines]) -> usize {
    let by_game: HashMap<u64, &GameLines> = lines.iter().map(|l| (l.id, l)).collect();

    let mut merged = 0;
    for game in games.iter_mut() {
        let Some(line) = by_game.get(&game.id).and_then(|l| l.consensus()) else {
            continue;
        };
        game.spread = line.spread;
        if line.over_under.is_some() {
            game.over_under = line.over_under;
        }
        merged += 1;
    }
    merged
}

pub fn to_new_games(games: &[UpstreamGame]) -> Vec<NewGame> {
    games.iter().map(UpstreamGame::to_new_game).collect()
}

/// Read games saved from the `/games` endpoint (optionally with inline lines).
pub fn load_games(path: &Path) -> Result<Vec<UpstreamGame>> {
    let file = std::fs::File::open(path)?;
    let games = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(games)
}

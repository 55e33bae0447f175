//! Game classification from upstream team names and free-text notes.
//!
//! The upstream feed has no structured "game type" field that survives
//! between seasons, so the category is inferred from the `notes` text.
//! Checks run in a fixed order and the first match wins.

use crate::error::PoolError;
use crate::{Season, Week};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;


/// First week number that belongs to bowl season in the pool's calendar.
pub const POSTSEASON_START_WEEK: u16 = 16;

/// Conference title game phrasings. Notes mentioning a playoff marker never
/// count as a conference championship.
const CHAMPIONSHIP_MARKERS: &[&str] = &[
    "championship",
    "title game",
    "conference final",
    "champ game",
];

const PLAYOFF_MARKERS: &[&str] = &[
    "playoff",
    "semifinal",
    "national championship",
    "cfp",
    "college football playoff",
];

/// Bowl names the feed sometimes sends without the word "bowl".
const NAMED_BOWLS: &[&str] = &[
    "rose bowl",
    "sugar bowl",
    "orange bowl",
    "cotton bowl",
    "fiesta bowl",
    "peach bowl",
    "citrus bowl",
    "gator bowl",
    "alamo bowl",
    "holiday bowl",
    "sun bowl",
    "liberty bowl",
    "music city",
    "las vegas bowl",
    "pinstripe",
    "cheez-it",
    "pop-tarts",
    "reliaquest",
    "duke's mayo",
    "armed forces",
    "camellia",
    "gasparilla",
];

const PREMIUM_BOWLS: &[&str] = &[
    "rose bowl",
    "sugar bowl",
    "orange bowl",
    "cotton bowl",
    "fiesta bowl",
    "peach bowl",
];

const PREMIUM_MARKERS: &[&str] = &["national championship", "semifinal", "semi-final", "playoff"];

/// Category of a game, stored on the game row and recomputed on every sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameCategory {
    Regular,
    Championship,
    Bowl,
    Playoff,
    ArmyNavy,
}

impl GameCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCategory::Regular => "REGULAR",
            GameCategory::Championship => "CHAMPIONSHIP",
            GameCategory::Bowl => "BOWL",
            GameCategory::Playoff => "PLAYOFF",
            GameCategory::ArmyNavy => "ARMY_NAVY",
        }
    }

    /// Bowl and playoff games score by tier instead of by the double-down flag.
    pub fn is_tiered(&self) -> bool {
        matches!(self, GameCategory::Bowl | GameCategory::Playoff)
    }

    pub fn rules(&self) -> CategoryRules {
        rules_for(*self)
    }
}

impl fmt::Display for GameCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameCategory {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGULAR" => Ok(GameCategory::Regular),
            "CHAMPIONSHIP" => Ok(GameCategory::Championship),
            "BOWL" => Ok(GameCategory::Bowl),
            "PLAYOFF" => Ok(GameCategory::Playoff),
            "ARMY_NAVY" => Ok(GameCategory::ArmyNavy),
            other => Err(PoolError::InvalidCategory {
                value: other.to_string(),
            }),
        }
    }
}

/// Scoring tier for bowl and playoff games. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BowlTier {
    Premium,
    Standard,
}

impl fmt::Display for BowlTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BowlTier::Premium => f.write_str("PREMIUM"),
            BowlTier::Standard => f.write_str("STANDARD"),
        }
    }
}

/// Pick constraints a category imposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryRules {
    /// Every pick on the game must carry the double-down flag.
    pub mandatory_double_down: bool,
    /// The pick uses one of the user's weekly quota slots.
    pub counts_toward_weekly_limit: bool,
    /// Skipping the game is penalized once it is final.
    pub must_pick_all: bool,
}

/// What the classifier looks at for one game.
#[derive(Debug, Clone, Copy)]
pub struct GameSignals<'a> {
    pub home_team: &'a str,
    pub away_team: &'a str,
    pub week: Week,
    pub season: Season,
    pub notes: Option<&'a str>,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn is_army_navy(home_team: &str, away_team: &str) -> bool {
    let home = home_team.to_lowercase();
    let away = away_team.to_lowercase();
    (home.contains("army") && away.contains("navy"))
        || (home.contains("navy") && away.contains("army"))
}

/// Determine a game's category.
///
/// Order: Army-Navy, conference championship, playoff, bowl, regular.
/// A notes string with any playoff marker is never a conference championship,
/// so "CFP National Championship" lands in `Playoff`.
pub fn classify(game: &GameSignals<'_>) -> GameCategory {
    if is_army_navy(game.home_team, game.away_team) {
        return GameCategory::ArmyNavy;
    }

    let notes = game.notes.unwrap_or_default().to_lowercase();
    let playoff = contains_any(&notes, PLAYOFF_MARKERS);

    if !playoff && contains_any(&notes, CHAMPIONSHIP_MARKERS) {
        GameCategory::Championship
    } else if playoff {
        GameCategory::Playoff
    } else if notes.contains("bowl") || contains_any(&notes, NAMED_BOWLS) {
        GameCategory::Bowl
    } else {
        GameCategory::Regular
    }
}

/// Pick rules for a category.
pub fn rules_for(category: GameCategory) -> CategoryRules {
    match category {
        GameCategory::Regular => CategoryRules {
            mandatory_double_down: false,
            counts_toward_weekly_limit: true,
            must_pick_all: false,
        },
        GameCategory::Championship | GameCategory::ArmyNavy => CategoryRules {
            mandatory_double_down: true,
            counts_toward_weekly_limit: true,
            must_pick_all: false,
        },
        GameCategory::Playoff => CategoryRules {
            mandatory_double_down: true,
            counts_toward_weekly_limit: true,
            must_pick_all: true,
        },
        GameCategory::Bowl => CategoryRules {
            mandatory_double_down: true,
            counts_toward_weekly_limit: false,
            must_pick_all: true,
        },
    }
}

/// Tier of a bowl or playoff game from its notes.
pub fn determine_bowl_tier(notes: Option<&str>) -> BowlTier {
    let notes = notes.unwrap_or_default().to_lowercase();
    if contains_any(&notes, PREMIUM_MARKERS) || contains_any(&notes, PREMIUM_BOWLS) {
        BowlTier::Premium
    } else {
        BowlTier::Standard
    }
}

/// The tier to score with, or `None` for categories that score by double-down.
pub fn scoring_tier(category: GameCategory, notes: Option<&str>) -> Option<BowlTier> {
    category.is_tiered().then(|| determine_bowl_tier(notes))
}

/// True when a game sits in bowl season yet classified as a plain regular
/// season game, which usually means the upstream notes were missing.
pub fn needs_review(game: &GameSignals<'_>, category: GameCategory) -> bool {
    category == GameCategory::Regular && game.week.as_u16() >= POSTSEASON_START_WEEK
}

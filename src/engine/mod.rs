//! Pick'em rules engine
//!
//! Pure decision logic with no I/O:
//! - `classifier`: game category, category rules and bowl tier
//! - `spread`: the canonical against-the-spread winner
//! - `scoring`: point values and per-pick scoring
//! - `validation`: pick submission and removal rules

pub mod classifier;
pub mod scoring;
pub mod spread;
pub mod validation;

pub use classifier::{
    classify, determine_bowl_tier, rules_for, BowlTier, CategoryRules, GameCategory, GameSignals,
};
pub use scoring::{compute_points, score_pick, Outcome, PickResult, ScoredPick};
pub use spread::{spread_winner, Cover};
pub use validation::{validate_removal, validate_submission, PoolRules, Rejection, Submission, WeekPick};

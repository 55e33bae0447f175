//! College Football Pick'em Pool Library
//!
//! Rules engine and persistence for a weekly pick'em pool played against the
//! spread: games are classified from upstream notes, picks lock the line at
//! submission, and final games are scored into each member's running total.
//!
//! ## Features
//!
//! - **Game Classification**: Regular, conference championship, bowl, playoff
//!   and Army-Navy games, with premium/standard bowl tiers
//! - **Pick Validation**: Kickoff lock, weekly quota and double-down rules
//! - **Scoring**: Idempotent settlement of final games and missing-pick penalties
//! - **Upstream Sync**: Games and lines from the CollegeFootballData API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cfb_pickem::{engine::PoolRules, storage::PoolDatabase};
//!
//! # fn example() -> cfb_pickem::Result<()> {
//! let mut db = PoolDatabase::new()?;
//! let report = db.score_completed_picks()?;
//! let penalties = db.apply_missing_pick_penalties()?;
//! println!("{} scored, {} penalized", report.scored.len(), penalties.penalties.len());
//! # let _ = PoolRules::default();
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export CFB_PICKEM_DB=~/pickem.db
//! export CFBD_API_KEY=your-key
//! ```

pub mod cli;
pub mod commands;
pub mod engine;
pub mod error;
pub mod storage;
pub mod upstream;

// Re-export commonly used types
pub use cli::types::{GameId, PickId, Season, UserId, Week};
pub use error::{PoolError, Result};

/// Environment variable holding the database path.
pub const DB_PATH_ENV_VAR: &str = "CFB_PICKEM_DB";

/// Environment variable holding the CollegeFootballData API key.
pub const API_KEY_ENV_VAR: &str = "CFBD_API_KEY";

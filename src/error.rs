//! Error types for the pick'em pool engine

use crate::engine::validation::Rejection;
use crate::{GameId, UserId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PoolError>;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse number: {0}")]
    InvalidNumber(#[from] std::num::ParseIntError),

    #[error("Pick rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("{env_var} environment variable not set")]
    MissingApiKey { env_var: String },

    #[error("Could not determine a data directory for the pool database")]
    NoDataDir,

    #[error("Invalid week: {week} (weeks start at 1)")]
    InvalidWeek { week: u16 },

    #[error("Unknown game category: {value}")]
    InvalidCategory { value: String },

    #[error("Unknown pick result: {value}")]
    InvalidResult { value: String },

    #[error("Game not found: {game_id}")]
    GameNotFound { game_id: GameId },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: UserId },

    #[error("No user named {name}")]
    UnknownUserName { name: String },

    #[error("No pick by user {user_id} on game {game_id}")]
    PickNotFound { user_id: UserId, game_id: GameId },

    #[error("Game {game_id} is not final or is missing a score")]
    GameNotFinal { game_id: GameId },
}

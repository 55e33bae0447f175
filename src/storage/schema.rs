//! Database schema and connection management

use crate::error::{PoolError, Result};
use crate::DB_PATH_ENV_VAR;
use dirs::data_dir;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Database connection manager for the pool
pub struct PoolDatabase {
    pub(crate) conn: Connection,
}

impl PoolDatabase {
    /// Open the database at the default location and ensure tables exist
    pub fn new() -> Result<Self> {
        let db_path = Self::database_path()?;
        Self::open(&db_path)
    }

    /// Open (or create) a database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Fresh database that lives only as long as this value
    pub fn new_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Path from `CFB_PICKEM_DB`, falling back to the user data directory
    pub fn database_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(DB_PATH_ENV_VAR) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        let data_dir = data_dir().ok_or(PoolError::NoDataDir)?;
        Ok(data_dir.join("cfb-pickem").join("pickem.db"))
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                total_score INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS games (
                game_id INTEGER PRIMARY KEY,
                external_id INTEGER NOT NULL UNIQUE,
                season INTEGER NOT NULL,
                week INTEGER NOT NULL,
                home_team TEXT NOT NULL,
                away_team TEXT NOT NULL,
                start_time TEXT NOT NULL,
                spread REAL,
                over_under REAL,
                home_score INTEGER,
                away_score INTEGER,
                completed INTEGER NOT NULL DEFAULT 0,
                notes TEXT,
                category TEXT NOT NULL DEFAULT 'REGULAR',
                CHECK ((home_score IS NULL) = (away_score IS NULL))
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS picks (
                pick_id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                game_id INTEGER NOT NULL,
                picked_team TEXT NOT NULL,
                locked_spread REAL NOT NULL,
                is_double_down INTEGER NOT NULL DEFAULT 0,
                points INTEGER,
                result TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (user_id, game_id),
                FOREIGN KEY (user_id) REFERENCES users(user_id),
                FOREIGN KEY (game_id) REFERENCES games(game_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_games_season_week
             ON games(season, week)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_picks_unscored
             ON picks(game_id)
             WHERE points IS NULL",
            [],
        )?;

        Ok(())
    }
}

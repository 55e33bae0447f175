//! Basic database query operations

use super::{models::*, schema::PoolDatabase};
use crate::engine::validation::WeekPick;
use crate::error::{PoolError, Result};
use crate::{GameId, PickId, Season, UserId, Week};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

pub(crate) const GAME_COLUMNS: &str = "g.game_id, g.external_id, g.season, g.week, g.home_team, g.away_team,
     g.start_time, g.spread, g.over_under, g.home_score, g.away_score, g.completed, g.notes, g.category";

pub(crate) const PICK_COLUMNS: &str = "p.pick_id, p.user_id, p.game_id, p.picked_team, p.locked_spread,
     p.is_double_down, p.points, p.result, p.created_at, p.updated_at";

/// Number of columns in `GAME_COLUMNS`, for reading a pick that follows a game in one row
pub(crate) const GAME_COLUMN_COUNT: usize = 14;

fn conversion_error(idx: usize, err: PoolError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

impl PoolDatabase {
    /// Add a pool member, or return the existing id if the name is taken
    pub fn add_user(&mut self, name: &str) -> Result<UserId> {
        self.conn.execute(
            "INSERT OR IGNORE INTO users (name, total_score) VALUES (?, 0)",
            params![name],
        )?;
        let id: u64 = self.conn.query_row(
            "SELECT user_id FROM users WHERE name = ?",
            params![name],
            |row| row.get(0),
        )?;
        Ok(UserId::new(id))
    }

    pub fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT user_id, name, total_score FROM users WHERE user_id = ?",
                params![user_id.as_u64()],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT user_id, name, total_score FROM users WHERE name = ?",
                params![name],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get all users in id order
    pub fn get_all_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id, name, total_score FROM users ORDER BY user_id")?;
        let rows = stmt.query_map([], Self::row_to_user)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    /// Users by total score, highest first; ties by name
    pub fn leaderboard(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, name, total_score FROM users
             ORDER BY total_score DESC, name ASC",
        )?;
        let rows = stmt.query_map([], Self::row_to_user)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    /// Insert or update a game keyed on its upstream id; the local id is preserved
    pub fn upsert_game(&self, game: &NewGame) -> Result<GameId> {
        let id: u64 = self.conn.query_row(
            "INSERT INTO games
             (external_id, season, week, home_team, away_team, start_time, spread, over_under,
              home_score, away_score, completed, notes, category)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(external_id) DO UPDATE SET
                season = excluded.season,
                week = excluded.week,
                home_team = excluded.home_team,
                away_team = excluded.away_team,
                start_time = excluded.start_time,
                spread = excluded.spread,
                over_under = excluded.over_under,
                home_score = excluded.home_score,
                away_score = excluded.away_score,
                completed = excluded.completed,
                notes = excluded.notes,
                category = excluded.category
             RETURNING game_id",
            params![
                game.external_id,
                game.season.as_u16(),
                game.week.as_u16(),
                game.home_team,
                game.away_team,
                game.start_time,
                game.spread,
                game.over_under,
                game.home_score,
                game.away_score,
                game.completed,
                game.notes,
                game.category.as_str(),
            ],
            |row| row.get(0),
        )?;
        Ok(GameId::new(id))
    }

    pub fn get_game(&self, game_id: GameId) -> Result<Option<Game>> {
        let sql = format!("SELECT {GAME_COLUMNS} FROM games g WHERE g.game_id = ?");
        let game = self
            .conn
            .query_row(&sql, params![game_id.as_u64()], |row| {
                Self::row_to_game(row, 0)
            })
            .optional()?;
        Ok(game)
    }

    pub fn get_game_by_external_id(&self, external_id: u64) -> Result<Option<Game>> {
        let sql = format!("SELECT {GAME_COLUMNS} FROM games g WHERE g.external_id = ?");
        let game = self
            .conn
            .query_row(&sql, params![external_id], |row| Self::row_to_game(row, 0))
            .optional()?;
        Ok(game)
    }

    /// Games for one week ordered by kickoff
    pub fn get_games_for_week(&self, season: Season, week: Week) -> Result<Vec<Game>> {
        let sql = format!(
            "SELECT {GAME_COLUMNS} FROM games g
             WHERE g.season = ? AND g.week = ?
             ORDER BY g.start_time, g.game_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![season.as_u16(), week.as_u16()], |row| {
            Self::row_to_game(row, 0)
        })?;

        let mut games = Vec::new();
        for row in rows {
            games.push(row?);
        }
        Ok(games)
    }

    /// Overwrite the current line, as a sync does when the market moves
    pub fn set_game_spread(&mut self, game_id: GameId, spread: Option<f64>) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE games SET spread = ? WHERE game_id = ?",
            params![spread, game_id.as_u64()],
        )?;
        if changed == 0 {
            return Err(PoolError::GameNotFound { game_id });
        }
        Ok(())
    }

    pub fn get_pick(&self, user_id: UserId, game_id: GameId) -> Result<Option<Pick>> {
        let sql = format!("SELECT {PICK_COLUMNS} FROM picks p WHERE p.user_id = ? AND p.game_id = ?");
        let pick = self
            .conn
            .query_row(&sql, params![user_id.as_u64(), game_id.as_u64()], |row| {
                Self::row_to_pick(row, 0)
            })
            .optional()?;
        Ok(pick)
    }

    pub fn get_picks_for_game(&self, game_id: GameId) -> Result<Vec<Pick>> {
        let sql = format!("SELECT {PICK_COLUMNS} FROM picks p WHERE p.game_id = ? ORDER BY p.pick_id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![game_id.as_u64()], |row| Self::row_to_pick(row, 0))?;

        let mut picks = Vec::new();
        for row in rows {
            picks.push(row?);
        }
        Ok(picks)
    }

    /// A user's picks for one week, with each game's category
    pub fn get_week_picks(&self, user_id: UserId, season: Season, week: Week) -> Result<Vec<WeekPick>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.game_id, g.category, p.is_double_down
             FROM picks p
             JOIN games g ON g.game_id = p.game_id
             WHERE p.user_id = ? AND g.season = ? AND g.week = ?
             ORDER BY p.game_id",
        )?;
        let rows = stmt.query_map(
            params![user_id.as_u64(), season.as_u16(), week.as_u16()],
            |row| {
                let category: String = row.get(1)?;
                Ok(WeekPick {
                    game_id: GameId::new(row.get(0)?),
                    category: category.parse().map_err(|e| conversion_error(1, e))?,
                    is_double_down: row.get(2)?,
                })
            },
        )?;

        let mut picks = Vec::new();
        for row in rows {
            picks.push(row?);
        }
        Ok(picks)
    }

    /// Delete a pick. Returns false when there was nothing to delete
    pub(crate) fn delete_pick(&self, user_id: UserId, game_id: GameId) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM picks WHERE user_id = ? AND game_id = ? AND points IS NULL",
            params![user_id.as_u64(), game_id.as_u64()],
        )?;
        Ok(changed > 0)
    }

    pub(crate) fn row_to_user(row: &Row) -> rusqlite::Result<User> {
        Ok(User {
            user_id: UserId::new(row.get(0)?),
            name: row.get(1)?,
            total_score: row.get(2)?,
        })
    }

    /// Read a game from `GAME_COLUMNS` starting at column `offset`
    pub(crate) fn row_to_game(row: &Row, offset: usize) -> rusqlite::Result<Game> {
        let category: String = row.get(offset + 13)?;
        Ok(Game {
            game_id: GameId::new(row.get(offset)?),
            external_id: row.get(offset + 1)?,
            season: Season::new(row.get(offset + 2)?),
            week: Week::new(row.get(offset + 3)?),
            home_team: row.get(offset + 4)?,
            away_team: row.get(offset + 5)?,
            start_time: row.get(offset + 6)?,
            spread: row.get(offset + 7)?,
            over_under: row.get(offset + 8)?,
            home_score: row.get(offset + 9)?,
            away_score: row.get(offset + 10)?,
            completed: row.get(offset + 11)?,
            notes: row.get(offset + 12)?,
            category: category
                .parse()
                .map_err(|e| conversion_error(offset + 13, e))?,
        })
    }

    /// Read a pick from `PICK_COLUMNS` starting at column `offset`
    pub(crate) fn row_to_pick(row: &Row, offset: usize) -> rusqlite::Result<Pick> {
        let result: Option<String> = row.get(offset + 7)?;
        let result = result
            .map(|r| r.parse().map_err(|e| conversion_error(offset + 7, e)))
            .transpose()?;

        Ok(Pick {
            pick_id: PickId::new(row.get(offset)?),
            user_id: UserId::new(row.get(offset + 1)?),
            game_id: GameId::new(row.get(offset + 2)?),
            picked_team: row.get(offset + 3)?,
            locked_spread: row.get(offset + 4)?,
            is_double_down: row.get(offset + 5)?,
            points: row.get(offset + 6)?,
            result,
            created_at: row.get(offset + 8)?,
            updated_at: row.get(offset + 9)?,
        })
    }
}

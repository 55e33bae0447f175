//! Pick submission and removal, validated against the pool rules

use super::{models::Pick, schema::PoolDatabase};
use crate::engine::validation::{
    validate_removal, validate_submission, PoolRules, Rejection, Submission,
};
use crate::error::{PoolError, Result};
use crate::{GameId, UserId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Transaction, TransactionBehavior};
use tracing::info;

impl PoolDatabase {
    /// Create or change a user's pick on a game.
    ///
    /// The game's current spread is locked onto the pick; a re-pick locks
    /// the line again. Validation and the write share one transaction so two
    /// submissions for the same week cannot both squeeze under the quota.
    pub fn submit_pick(
        &mut self,
        user_id: UserId,
        game_id: GameId,
        picked_team: &str,
        is_double_down: bool,
        now: DateTime<Utc>,
        rules: &PoolRules,
    ) -> Result<Pick> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;

        if self.get_user(user_id)?.is_none() {
            return Err(PoolError::UserNotFound { user_id });
        }
        let game = self
            .get_game(game_id)?
            .ok_or(PoolError::GameNotFound { game_id })?;
        let week_picks = self.get_week_picks(user_id, game.season, game.week)?;

        let submission = Submission {
            picked_team,
            is_double_down,
        };
        validate_submission(&game, &submission, &week_picks, now, rules)?;
        let locked_spread = game.spread.ok_or(Rejection::NoSpread)?;

        tx.execute(
            "INSERT INTO picks
             (user_id, game_id, picked_team, locked_spread, is_double_down, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id, game_id) DO UPDATE SET
                picked_team = excluded.picked_team,
                locked_spread = excluded.locked_spread,
                is_double_down = excluded.is_double_down,
                updated_at = excluded.updated_at
             WHERE picks.points IS NULL",
            params![
                user_id.as_u64(),
                game_id.as_u64(),
                picked_team,
                locked_spread,
                is_double_down,
                now,
                now
            ],
        )?;
        tx.commit()?;

        info!(
            user = %user_id,
            game = %game_id,
            team = picked_team,
            spread = locked_spread,
            double_down = is_double_down,
            "pick saved"
        );

        self.get_pick(user_id, game_id)?
            .ok_or(PoolError::PickNotFound { user_id, game_id })
    }

    /// Delete a user's pick before kickoff.
    pub fn remove_pick(
        &mut self,
        user_id: UserId,
        game_id: GameId,
        now: DateTime<Utc>,
        rules: &PoolRules,
    ) -> Result<()> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;

        let game = self
            .get_game(game_id)?
            .ok_or(PoolError::GameNotFound { game_id })?;
        if self.get_pick(user_id, game_id)?.is_none() {
            return Err(PoolError::PickNotFound { user_id, game_id });
        }
        let week_picks = self.get_week_picks(user_id, game.season, game.week)?;
        validate_removal(&game, &week_picks, now, rules)?;

        if !self.delete_pick(user_id, game_id)? {
            return Err(PoolError::PickNotFound { user_id, game_id });
        }
        tx.commit()?;

        info!(user = %user_id, game = %game_id, "pick removed");
        Ok(())
    }
}

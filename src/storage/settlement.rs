//! Settlement jobs: scoring final games, missing-pick penalties and repairs.
//!
//! Every points write commits together with the matching `total_score`
//! change. The guards in the `WHERE` clauses (`points IS NULL`, the
//! `(user_id, game_id)` unique key, the old points value) make each job safe
//! to re-run or to run concurrently with itself.

use super::{models::*, queries::*, schema::PoolDatabase};
use crate::engine::scoring::{
    penalty_applies, score_pick, PickResult, ScoredPick, MISSING_PICK_PENALTY, NO_PICK,
};
use crate::error::{PoolError, Result};
use crate::{GameId, UserId};
use chrono::Utc;
use rusqlite::params;
use tracing::{debug, info, warn};

impl PoolDatabase {
    /// Score every unscored pick on a final game.
    ///
    /// A pick that cannot be read or scored is logged and counted in
    /// `failed`; the rest of the batch still runs.
    pub fn score_completed_picks(&mut self) -> Result<SettlementReport> {
        let mut report = SettlementReport::default();

        for pending in self.pending_picks()? {
            let (game, pick) = match pending {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable pick");
                    report.failed += 1;
                    continue;
                }
            };

            let scored = match score_pick(&game, &pick) {
                Ok(scored) => scored,
                Err(e) => {
                    warn!(pick = %pick.pick_id, game = %game.game_id, error = %e, "could not score pick");
                    report.failed += 1;
                    continue;
                }
            };

            match self.record_score(&scored) {
                Ok(true) => {
                    debug!(
                        pick = %scored.pick_id,
                        user = %scored.user_id,
                        result = %scored.result,
                        points = scored.points,
                        "pick scored"
                    );
                    report.scored.push(scored);
                }
                Ok(false) => report.already_scored += 1,
                Err(e) => {
                    warn!(pick = %scored.pick_id, error = %e, "failed to record score");
                    report.failed += 1;
                }
            }
        }

        info!(
            scored = report.scored.len(),
            already_scored = report.already_scored,
            failed = report.failed,
            "scoring run finished"
        );
        Ok(report)
    }

    /// Charge every user without a pick on a final premium bowl or playoff game.
    pub fn apply_missing_pick_penalties(&mut self) -> Result<PenaltyReport> {
        let mut report = PenaltyReport::default();

        let games: Vec<Game> = self
            .final_postseason_games()?
            .into_iter()
            .filter(penalty_applies)
            .collect();

        for game in games {
            for user_id in self.users_without_pick(game.game_id)? {
                match self.record_penalty(&game, user_id) {
                    Ok(true) => {
                        info!(user = %user_id, game = %game.game_id, "missing pick penalized");
                        report.penalties.push(Penalty {
                            user_id,
                            game_id: game.game_id,
                            points: MISSING_PICK_PENALTY,
                        });
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!(user = %user_id, game = %game.game_id, error = %e, "failed to record penalty");
                        report.failed += 1;
                    }
                }
            }
        }

        Ok(report)
    }

    /// Re-score already scored picks on one game after an upstream score correction.
    ///
    /// Only the difference between the old and new points reaches the
    /// user's total. Penalty picks are left alone.
    pub fn rescore_game(&mut self, game_id: GameId) -> Result<RescoreReport> {
        let game = self
            .get_game(game_id)?
            .ok_or(PoolError::GameNotFound { game_id })?;
        if !game.is_final() {
            return Err(PoolError::GameNotFinal { game_id });
        }

        let mut report = RescoreReport::default();
        let scored_picks = self
            .get_picks_for_game(game_id)?
            .into_iter()
            .filter(|p| p.result != Some(PickResult::NoPick));

        for pick in scored_picks {
            let Some(old_points) = pick.points else {
                continue;
            };

            let rescored = match score_pick(&game, &pick) {
                Ok(rescored) => rescored,
                Err(e) => {
                    warn!(pick = %pick.pick_id, error = %e, "could not rescore pick");
                    report.failed += 1;
                    continue;
                }
            };

            if rescored.points == old_points && pick.result == Some(rescored.result) {
                report.unchanged += 1;
                continue;
            }

            match self.record_correction(&rescored, old_points) {
                Ok(true) => {
                    info!(
                        pick = %pick.pick_id,
                        user = %pick.user_id,
                        old_points,
                        new_points = rescored.points,
                        "pick corrected"
                    );
                    report.corrections.push(Correction {
                        pick_id: pick.pick_id,
                        user_id: pick.user_id,
                        old_points,
                        new_points: rescored.points,
                        result: rescored.result,
                    });
                }
                Ok(false) => report.unchanged += 1,
                Err(e) => {
                    warn!(pick = %pick.pick_id, error = %e, "failed to record correction");
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Rebuild every user's total from their pick points.
    ///
    /// Out-of-band repair; normal scoring never calls this. Returns the users
    /// whose stored total had drifted.
    pub fn recompute_total_scores(&mut self) -> Result<Vec<ScoreDrift>> {
        let tx = self.conn.transaction()?;

        let drift = {
            let mut stmt = tx.prepare(
                "SELECT u.user_id, u.name, u.total_score, COALESCE(SUM(p.points), 0) AS recomputed
                 FROM users u
                 LEFT JOIN picks p ON p.user_id = u.user_id
                 GROUP BY u.user_id, u.name, u.total_score
                 HAVING u.total_score != recomputed
                 ORDER BY u.user_id",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(ScoreDrift {
                    user_id: UserId::new(row.get(0)?),
                    name: row.get(1)?,
                    stored: row.get(2)?,
                    recomputed: row.get(3)?,
                })
            })?;

            let mut drift = Vec::new();
            for row in rows {
                drift.push(row?);
            }
            drift
        };

        tx.execute(
            "UPDATE users SET total_score =
                (SELECT COALESCE(SUM(points), 0) FROM picks WHERE picks.user_id = users.user_id)",
            [],
        )?;
        tx.commit()?;

        for d in &drift {
            warn!(
                user = %d.user_id,
                name = %d.name,
                stored = d.stored,
                recomputed = d.recomputed,
                "total score drift repaired"
            );
        }
        Ok(drift)
    }

    /// Unscored picks on final games, each row read independently
    fn pending_picks(&self) -> Result<Vec<rusqlite::Result<(Game, Pick)>>> {
        let sql = format!(
            "SELECT {GAME_COLUMNS}, {PICK_COLUMNS}
             FROM picks p
             JOIN games g ON g.game_id = p.game_id
             WHERE p.points IS NULL
               AND g.completed = 1
               AND g.home_score IS NOT NULL
               AND g.away_score IS NOT NULL
             ORDER BY p.pick_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok((
                Self::row_to_game(row, 0)?,
                Self::row_to_pick(row, GAME_COLUMN_COUNT)?,
            ))
        })?;
        Ok(rows.collect())
    }

    fn final_postseason_games(&self) -> Result<Vec<Game>> {
        let sql = format!(
            "SELECT {GAME_COLUMNS} FROM games g
             WHERE g.completed = 1
               AND g.home_score IS NOT NULL
               AND g.away_score IS NOT NULL
               AND g.category IN ('BOWL', 'PLAYOFF')
             ORDER BY g.game_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| Self::row_to_game(row, 0))?;

        let mut games = Vec::new();
        for row in rows {
            match row {
                Ok(game) => games.push(game),
                Err(e) => warn!(error = %e, "skipping unreadable game"),
            }
        }
        Ok(games)
    }

    fn users_without_pick(&self, game_id: GameId) -> Result<Vec<UserId>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.user_id FROM users u
             WHERE NOT EXISTS (
                SELECT 1 FROM picks p WHERE p.user_id = u.user_id AND p.game_id = ?
             )
             ORDER BY u.user_id",
        )?;
        let rows = stmt.query_map(params![game_id.as_u64()], |row| {
            Ok(UserId::new(row.get(0)?))
        })?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    /// Write points onto an unscored pick and add them to the user's total.
    /// Returns false when the pick had already been scored.
    fn record_score(&mut self, scored: &ScoredPick) -> Result<bool> {
        let tx = self.conn.transaction()?;

        let changed = tx.execute(
            "UPDATE picks SET points = ?, result = ?, updated_at = ?
             WHERE pick_id = ? AND points IS NULL",
            params![
                scored.points,
                scored.result.as_str(),
                Utc::now(),
                scored.pick_id.as_u64()
            ],
        )?;
        if changed == 0 {
            return Ok(false);
        }

        adjust_total(&tx, scored.user_id, i64::from(scored.points))?;
        tx.commit()?;
        Ok(true)
    }

    /// Insert the penalty pick and charge the user. Returns false when the
    /// user already has a pick on the game.
    fn record_penalty(&mut self, game: &Game, user_id: UserId) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let now = Utc::now();

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO picks
             (user_id, game_id, picked_team, locked_spread, is_double_down, points, result,
              created_at, updated_at)
             VALUES (?, ?, ?, ?, 1, ?, ?, ?, ?)",
            params![
                user_id.as_u64(),
                game.game_id.as_u64(),
                NO_PICK,
                game.spread.unwrap_or_default(),
                MISSING_PICK_PENALTY,
                PickResult::NoPick.as_str(),
                now,
                now
            ],
        )?;
        if inserted == 0 {
            return Ok(false);
        }

        adjust_total(&tx, user_id, i64::from(MISSING_PICK_PENALTY))?;
        tx.commit()?;
        Ok(true)
    }

    /// Replace a pick's points if they still equal `old_points`, moving the
    /// user's total by the difference.
    fn record_correction(&mut self, rescored: &ScoredPick, old_points: i32) -> Result<bool> {
        let tx = self.conn.transaction()?;

        let changed = tx.execute(
            "UPDATE picks SET points = ?, result = ?, updated_at = ?
             WHERE pick_id = ? AND points = ?",
            params![
                rescored.points,
                rescored.result.as_str(),
                Utc::now(),
                rescored.pick_id.as_u64(),
                old_points
            ],
        )?;
        if changed == 0 {
            return Ok(false);
        }

        adjust_total(
            &tx,
            rescored.user_id,
            i64::from(rescored.points) - i64::from(old_points),
        )?;
        tx.commit()?;
        Ok(true)
    }
}

fn adjust_total(conn: &rusqlite::Connection, user_id: UserId, delta: i64) -> Result<()> {
    let changed = conn.execute(
        "UPDATE users SET total_score = total_score + ? WHERE user_id = ?",
        params![delta, user_id.as_u64()],
    )?;
    if changed == 0 {
        return Err(PoolError::UserNotFound { user_id });
    }
    Ok(())
}

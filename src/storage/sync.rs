//! Writing upstream games into the pool

use super::{models::*, schema::PoolDatabase};
use crate::engine::classifier::{classify, needs_review, GameCategory};
use crate::error::Result;
use rayon::prelude::*;
use rusqlite::{params, Transaction, TransactionBehavior};
use tracing::{info, warn};

/// Classify a game and drop a half-present score.
fn prepare(game: &NewGame) -> NewGame {
    let mut game = game.clone();
    game.category = classify(&game.signals());

    if game.home_score.is_some() != game.away_score.is_some() {
        warn!(
            external_id = game.external_id,
            home_score = ?game.home_score,
            away_score = ?game.away_score,
            "discarding partial score"
        );
        game.home_score = None;
        game.away_score = None;
    }
    game
}

fn flag_for_review(game: &NewGame) -> bool {
    needs_review(&game.signals(), game.category)
        || (game.postseason && game.category == GameCategory::Regular)
}

impl PoolDatabase {
    /// Classify and upsert a batch of upstream games in one transaction.
    ///
    /// Games whose category requires a double-down get every unscored pick
    /// flipped to a double-down, which covers games reclassified after
    /// picks were made.
    pub fn sync_games(&mut self, games: &[NewGame]) -> Result<SyncReport> {
        let prepared: Vec<NewGame> = games.par_iter().map(prepare).collect();

        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let mut report = SyncReport::default();

        for game in &prepared {
            let game_id = self.upsert_game(game)?;
            report.games += 1;

            if flag_for_review(game) {
                warn!(
                    external_id = game.external_id,
                    week = %game.week,
                    home = %game.home_team,
                    away = %game.away_team,
                    notes = ?game.notes,
                    "postseason game classified as REGULAR"
                );
                report.needs_review.push(game.external_id);
            }

            if game.category.rules().mandatory_double_down {
                let forced = tx.execute(
                    "UPDATE picks SET is_double_down = 1
                     WHERE game_id = ? AND points IS NULL AND is_double_down = 0",
                    params![game_id.as_u64()],
                )?;
                if forced > 0 {
                    info!(
                        game = %game_id,
                        category = %game.category,
                        picks = forced,
                        "forced double-down on existing picks"
                    );
                    report.forced_double_downs += forced;
                }
            }
        }

        tx.commit()?;
        info!(
            games = report.games,
            forced_double_downs = report.forced_double_downs,
            needs_review = report.needs_review.len(),
            "sync finished"
        );
        Ok(report)
    }
}

//! Scoring runs and total-score repairs

use std::path::PathBuf;

use serde::Serialize;

use super::common::{open_database, print_json};
use crate::{
    storage::{PenaltyReport, SettlementReport},
    GameId, Result,
};

#[derive(Debug, Serialize)]
pub struct ScoreRun {
    pub settlement: SettlementReport,
    pub penalties: PenaltyReport,
}

/// Score every final game, then charge missing picks on premium games.
pub fn handle_score(db: Option<PathBuf>, as_json: bool) -> Result<()> {
    let mut db = open_database(db)?;
    let run = ScoreRun {
        settlement: db.score_completed_picks()?,
        penalties: db.apply_missing_pick_penalties()?,
    };

    if as_json {
        return print_json(&run);
    }

    println!(
        "✓ Scored {} picks ({} already scored, {} failed)",
        run.settlement.scored.len(),
        run.settlement.already_scored,
        run.settlement.failed
    );
    println!(
        "✓ {} missing-pick penalties ({} failed)",
        run.penalties.penalties.len(),
        run.penalties.failed
    );
    Ok(())
}

/// Re-score one game after its final was corrected upstream.
pub fn handle_rescore(db: Option<PathBuf>, game_id: GameId, as_json: bool) -> Result<()> {
    let mut db = open_database(db)?;
    let report = db.rescore_game(game_id)?;

    if as_json {
        return print_json(&report);
    }

    println!(
        "✓ Game {}: {} corrected, {} unchanged, {} failed",
        game_id,
        report.corrections.len(),
        report.unchanged,
        report.failed
    );
    // tarpaulin::skip - console output
    for c in &report.corrections {
        println!(
            "  user {} pick {}: {} -> {} ({})",
            c.user_id, c.pick_id, c.old_points, c.new_points, c.result
        );
    }
    Ok(())
}

/// Rebuild every total from pick points and report what drifted.
pub fn handle_recompute(db: Option<PathBuf>, as_json: bool) -> Result<()> {
    let mut db = open_database(db)?;
    let drift = db.recompute_total_scores()?;

    if as_json {
        return print_json(&drift);
    }

    if drift.is_empty() {
        println!("✓ All totals match their picks");
    }
    for d in &drift {
        println!("  {}: {} -> {}", d.name, d.stored, d.recomputed);
    }
    Ok(())
}

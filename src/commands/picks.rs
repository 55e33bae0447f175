//! Pick submission and removal

use std::path::PathBuf;

use chrono::Utc;

use super::common::{find_user, open_database};
use crate::{engine::validation::PoolRules, GameId, Result};

/// Parameters for the pick command
pub struct PickParams {
    pub db: Option<PathBuf>,
    pub user: String,
    pub game_id: GameId,
    pub team: String,
    pub double_down: bool,
    pub rules: PoolRules,
}

pub fn handle_pick(params: PickParams) -> Result<()> {
    let mut db = open_database(params.db)?;
    let user = find_user(&db, &params.user)?;

    let pick = db.submit_pick(
        user.user_id,
        params.game_id,
        &params.team,
        params.double_down,
        Utc::now(),
        &params.rules,
    )?;

    println!(
        "✓ {} takes {} at {:+.1}{}",
        user.name,
        pick.picked_team,
        pick.locked_spread,
        if pick.is_double_down { " (double-down)" } else { "" }
    );
    Ok(())
}

pub fn handle_unpick(
    db: Option<PathBuf>,
    user: &str,
    game_id: GameId,
    rules: PoolRules,
) -> Result<()> {
    let mut db = open_database(db)?;
    let user = find_user(&db, user)?;

    db.remove_pick(user.user_id, game_id, Utc::now(), &rules)?;
    println!("✓ Removed {}'s pick on game {}", user.name, game_id);
    Ok(())
}

//! Pool membership and standings

use std::path::PathBuf;

use super::common::{open_database, print_json};
use crate::Result;

pub fn handle_add_user(db: Option<PathBuf>, name: &str) -> Result<()> {
    let mut db = open_database(db)?;
    let user_id = db.add_user(name)?;
    println!("✓ {} is user {}", name, user_id);
    Ok(())
}

/// Print users ranked by total score.
pub fn handle_leaderboard(db: Option<PathBuf>, as_json: bool) -> Result<()> {
    let db = open_database(db)?;
    let standings = db.leaderboard()?;

    if as_json {
        return print_json(&standings);
    }

    // tarpaulin::skip - console output
    for (rank, user) in standings.iter().enumerate() {
        println!("{:>3}. {:<24} {:>4}", rank + 1, user.name, user.total_score);
    }
    Ok(())
}

//! Game classification, upstream sync and the weekly slate

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::common::{open_database, print_json, resolve_api_key};
use crate::{
    engine::{
        classifier::{classify, needs_review, rules_for, scoring_tier, BowlTier, CategoryRules, GameSignals},
        spread::spread_winner,
        GameCategory,
    },
    upstream::{load_games, merge_lines, to_new_games, CfbdClient, SeasonType},
    GameId, Result, Season, Week,
};

#[derive(Debug, Serialize)]
pub struct Classification {
    pub category: GameCategory,
    pub rules: CategoryRules,
    pub tier: Option<BowlTier>,
    pub needs_review: bool,
}

/// Classify one game from the command line without touching the database.
pub fn classify_signals(signals: &GameSignals<'_>) -> Classification {
    let category = classify(signals);
    Classification {
        category,
        rules: rules_for(category),
        tier: scoring_tier(category, signals.notes),
        needs_review: needs_review(signals, category),
    }
}

pub fn handle_classify(
    home_team: &str,
    away_team: &str,
    season: Season,
    week: Week,
    notes: Option<&str>,
    as_json: bool,
) -> Result<()> {
    let result = classify_signals(&GameSignals {
        home_team,
        away_team,
        week,
        season,
        notes,
    });

    if as_json {
        return print_json(&result);
    }

    // tarpaulin::skip - console output
    match result.tier {
        Some(tier) => println!("{} ({})", result.category, tier),
        None => println!("{}", result.category),
    }
    println!(
        "double-down required: {}, counts toward weekly limit: {}, must pick: {}",
        result.rules.mandatory_double_down,
        result.rules.counts_toward_weekly_limit,
        result.rules.must_pick_all
    );
    if result.needs_review {
        println!("warning: week {} game classified as REGULAR", week);
    }
    Ok(())
}

/// Parameters for the sync command
pub struct SyncParams {
    pub db: Option<PathBuf>,
    pub season: Season,
    pub week: Week,
    pub postseason: bool,
    /// Read games from a saved JSON file instead of the API.
    pub file: Option<PathBuf>,
    pub api_key: Option<String>,
    pub as_json: bool,
}

/// Pull games and lines from upstream (or a file), classify and store them.
pub async fn handle_sync(params: SyncParams) -> Result<()> {
    let upstream = match params.file {
        Some(path) => load_games(&path)?,
        None => {
            let season_type = if params.postseason {
                SeasonType::Postseason
            } else {
                SeasonType::Regular
            };
            // tarpaulin::skip - HTTP call, tested via mocked client tests
            let client = CfbdClient::new(resolve_api_key(params.api_key)?);
            let (mut games, lines) = tokio::try_join!(
                client.fetch_games(params.season, params.week, season_type),
                client.fetch_lines(params.season, params.week, season_type),
            )?;
            let merged = merge_lines(&mut games, &lines);
            info!(games = games.len(), lines = merged, "fetched upstream games");
            games
        }
    };

    let mut db = open_database(params.db)?;
    let report = db.sync_games(&to_new_games(&upstream))?;

    if params.as_json {
        return print_json(&report);
    }

    println!("✓ Synced {} games", report.games);
    if report.forced_double_downs > 0 {
        println!(
            "  {} existing picks switched to double-down",
            report.forced_double_downs
        );
    }
    for external_id in &report.needs_review {
        println!("  review: game {} classified as REGULAR", external_id);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct SlateEntry {
    pub game_id: GameId,
    pub start_time: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    pub spread: Option<f64>,
    pub category: GameCategory,
    pub tier: Option<BowlTier>,
    pub score: Option<(i32, i32)>,
    /// Team that covered the current spread, or "Push". Final games only.
    pub covered: Option<String>,
}

/// List a week's games with their category and, once final, who covered.
pub fn handle_games(db: Option<PathBuf>, season: Season, week: Week, as_json: bool) -> Result<()> {
    let db = open_database(db)?;

    let slate: Vec<SlateEntry> = db
        .get_games_for_week(season, week)?
        .into_iter()
        .map(|game| {
            let score = game.home_score.zip(game.away_score);
            let covered = match (game.is_final(), score, game.spread) {
                (true, Some((home, away)), Some(spread)) => Some(
                    spread_winner(home, away, spread, &game.home_team, &game.away_team)
                        .to_string(),
                ),
                _ => None,
            };
            SlateEntry {
                game_id: game.game_id,
                start_time: game.start_time,
                tier: scoring_tier(game.category, game.notes.as_deref()),
                home_team: game.home_team,
                away_team: game.away_team,
                spread: game.spread,
                category: game.category,
                score,
                covered,
            }
        })
        .collect();

    if as_json {
        return print_json(&slate);
    }

    // tarpaulin::skip - console output
    for entry in &slate {
        let spread = entry
            .spread
            .map(|s| format!("{:+.1}", s))
            .unwrap_or_else(|| "--".to_string());
        print!(
            "{:>6} {} {} vs {} [{}] {}",
            entry.game_id,
            entry.start_time.format("%a %m/%d %H:%M"),
            entry.home_team,
            entry.away_team,
            spread,
            entry.category
        );
        if let (Some((home, away)), Some(covered)) = (entry.score, &entry.covered) {
            print!(" final {}-{}, covered: {}", home, away, covered);
        }
        println!();
    }
    Ok(())
}

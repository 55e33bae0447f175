//! Entry point: parse CLI and dispatch to command handlers.

use anyhow::Context;
use cfb_pickem::{
    cli::{Cli, Commands},
    commands::{
        games::{handle_classify, handle_games, handle_sync, SyncParams},
        picks::{handle_pick, handle_unpick, PickParams},
        settlement::{handle_recompute, handle_rescore, handle_score},
        users::{handle_add_user, handle_leaderboard},
    },
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let app = Cli::parse();
    let db = app.db.db;

    match app.command {
        Commands::AddUser { name } => {
            handle_add_user(db, &name).with_context(|| format!("adding user {name}"))?
        }

        Commands::Classify {
            home,
            away,
            notes,
            season,
            week,
            json,
        } => handle_classify(&home, &away, season, week, notes.as_deref(), json)?,

        Commands::Sync {
            season,
            week,
            postseason,
            file,
            api_key,
            json,
        } => handle_sync(SyncParams {
            db,
            season,
            week,
            postseason,
            file,
            api_key,
            as_json: json,
        })
        .await
        .with_context(|| format!("syncing season {season} week {week}"))?,

        Commands::Games { season, week, json } => handle_games(db, season, week, json)?,

        Commands::Pick {
            user,
            game,
            team,
            double_down,
            rules,
        } => handle_pick(PickParams {
            db,
            user,
            game_id: game,
            team,
            double_down,
            rules: rules.rules(),
        })
        .with_context(|| format!("picking game {game}"))?,

        Commands::Unpick { user, game, rules } => handle_unpick(db, &user, game, rules.rules())
            .with_context(|| format!("removing pick on game {game}"))?,

        Commands::Score { json } => handle_score(db, json).context("scoring final games")?,

        Commands::Rescore { game, json } => {
            handle_rescore(db, game, json).with_context(|| format!("rescoring game {game}"))?
        }

        Commands::Recompute { json } => {
            handle_recompute(db, json).context("recomputing total scores")?
        }

        Commands::Leaderboard { json } => handle_leaderboard(db, json)?,
    }

    Ok(())
}

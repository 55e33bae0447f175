//! Unit tests for storage functionality

use super::*;
use crate::engine::classifier::GameCategory;
use crate::engine::scoring::PickResult;
use crate::engine::validation::{PoolRules, Rejection};
use crate::error::PoolError;
use crate::{GameId, Season, UserId, Week};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn kickoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 30, 17, 0, 0).unwrap()
}

fn before_kickoff() -> DateTime<Utc> {
    kickoff() - Duration::hours(1)
}

fn create_test_db() -> PoolDatabase {
    PoolDatabase::new_in_memory().unwrap()
}

fn new_game(external_id: u64, home: &str, away: &str, week: u16, notes: Option<&str>) -> NewGame {
    NewGame {
        external_id,
        season: Season::new(2024),
        week: Week::new(week),
        home_team: home.to_string(),
        away_team: away.to_string(),
        start_time: kickoff(),
        spread: Some(-3.0),
        over_under: Some(44.5),
        home_score: None,
        away_score: None,
        completed: false,
        notes: notes.map(str::to_string),
        category: GameCategory::Regular,
        postseason: false,
    }
}

fn rivalry() -> NewGame {
    new_game(401, "Ohio State", "Michigan", 14, None)
}

fn sync_one(db: &mut PoolDatabase, game: &NewGame) -> GameId {
    db.sync_games(std::slice::from_ref(game)).unwrap();
    db.get_game_by_external_id(game.external_id)
        .unwrap()
        .unwrap()
        .game_id
}

fn finish(db: &mut PoolDatabase, game: &NewGame, home: i32, away: i32) {
    let mut final_game = game.clone();
    final_game.completed = true;
    final_game.home_score = Some(home);
    final_game.away_score = Some(away);
    db.sync_games(&[final_game]).unwrap();
}

fn total(db: &PoolDatabase, user_id: UserId) -> i64 {
    db.get_user(user_id).unwrap().unwrap().total_score
}

#[test]
fn test_add_user_returns_existing_id() {
    let mut db = create_test_db();
    let first = db.add_user("alice").unwrap();
    let again = db.add_user("alice").unwrap();
    assert_eq!(first, again);
    assert_eq!(db.get_all_users().unwrap().len(), 1);
    assert_eq!(db.find_user_by_name("alice").unwrap().unwrap().total_score, 0);
}

#[test]
fn test_sync_preserves_local_id() {
    let mut db = create_test_db();
    let game = rivalry();
    let id = sync_one(&mut db, &game);

    let mut moved = game.clone();
    moved.spread = Some(-7.0);
    let id_again = sync_one(&mut db, &moved);

    assert_eq!(id, id_again);
    assert_eq!(db.get_game(id).unwrap().unwrap().spread, Some(-7.0));
}

#[test]
fn test_sync_classifies_games() {
    let mut db = create_test_db();
    let games = vec![
        new_game(1, "Army", "Navy", 15, None),
        new_game(2, "Georgia", "Texas", 15, Some("SEC Championship")),
        new_game(3, "Oregon", "Ohio State", 17, Some("Rose Bowl Game")),
        new_game(4, "Notre Dame", "Ohio State", 18, Some("CFP National Championship")),
        new_game(5, "Iowa", "Nebraska", 13, None),
    ];
    let report = db.sync_games(&games).unwrap();
    assert_eq!(report.games, 5);
    assert!(report.needs_review.is_empty());

    let category = |id| db.get_game_by_external_id(id).unwrap().unwrap().category;
    assert_eq!(category(1), GameCategory::ArmyNavy);
    assert_eq!(category(2), GameCategory::Championship);
    assert_eq!(category(3), GameCategory::Bowl);
    assert_eq!(category(4), GameCategory::Playoff);
    assert_eq!(category(5), GameCategory::Regular);
}

#[test]
fn test_sync_flags_postseason_regular_games() {
    let mut db = create_test_db();
    let late = new_game(10, "Boise State", "UNLV", 16, None);
    let mut tagged = new_game(11, "Duke", "Ole Miss", 15, None);
    tagged.postseason = true;

    let report = db.sync_games(&[late, tagged]).unwrap();
    assert_eq!(report.needs_review, vec![10, 11]);
}

#[test]
fn test_sync_discards_partial_score() {
    let mut db = create_test_db();
    let mut game = rivalry();
    game.home_score = Some(10);
    let id = sync_one(&mut db, &game);

    let stored = db.get_game(id).unwrap().unwrap();
    assert_eq!(stored.home_score, None);
    assert_eq!(stored.away_score, None);
}

#[test]
fn test_pick_locks_spread_at_submission() {
    let mut db = create_test_db();
    let user = db.add_user("alice").unwrap();
    let game = rivalry();
    let id = sync_one(&mut db, &game);

    let pick = db
        .submit_pick(user, id, "Michigan", false, before_kickoff(), &PoolRules::default())
        .unwrap();
    assert_eq!(pick.locked_spread, -3.0);

    // The line moves to -7 before kickoff; Ohio State wins by three.
    db.set_game_spread(id, Some(-7.0)).unwrap();
    assert_eq!(db.get_game(id).unwrap().unwrap().spread, Some(-7.0));
    assert_eq!(db.get_pick(user, id).unwrap().unwrap().locked_spread, -3.0);

    let mut moved = game.clone();
    moved.spread = Some(-7.0);
    finish(&mut db, &moved, 24, 21);

    let report = db.score_completed_picks().unwrap();
    assert_eq!(report.scored.len(), 1);
    assert_eq!(report.scored[0].result, PickResult::Push);
    assert_eq!(report.scored[0].points, 0);
    assert_eq!(total(&db, user), 0);
}

#[test]
fn test_repick_relocks_spread() {
    let mut db = create_test_db();
    let user = db.add_user("alice").unwrap();
    let game = rivalry();
    let id = sync_one(&mut db, &game);
    let rules = PoolRules::default();

    db.submit_pick(user, id, "Michigan", false, before_kickoff(), &rules)
        .unwrap();

    let mut moved = game.clone();
    moved.spread = Some(-6.5);
    sync_one(&mut db, &moved);

    let pick = db
        .submit_pick(user, id, "Ohio State", true, before_kickoff(), &rules)
        .unwrap();
    assert_eq!(pick.picked_team, "Ohio State");
    assert_eq!(pick.locked_spread, -6.5);
    assert!(pick.is_double_down);
    assert_eq!(db.get_picks_for_game(id).unwrap().len(), 1);
}

#[test]
fn test_submit_rejections_surface_as_pool_errors() {
    let mut db = create_test_db();
    let user = db.add_user("alice").unwrap();
    let id = sync_one(&mut db, &rivalry());
    let rules = PoolRules::default();

    let late = db.submit_pick(user, id, "Michigan", false, kickoff(), &rules);
    assert!(matches!(
        late,
        Err(PoolError::Rejected(Rejection::GameStarted))
    ));

    let stranger = db.submit_pick(UserId::new(99), id, "Michigan", false, before_kickoff(), &rules);
    assert!(matches!(stranger, Err(PoolError::UserNotFound { .. })));

    let missing = db.submit_pick(user, GameId::new(99), "Michigan", false, before_kickoff(), &rules);
    assert!(matches!(missing, Err(PoolError::GameNotFound { .. })));
}

#[test]
fn test_weekly_quota_is_enforced_from_stored_picks() {
    let mut db = create_test_db();
    let user = db.add_user("alice").unwrap();
    let rules = PoolRules::default();

    let games: Vec<NewGame> = (1..=6)
        .map(|n| new_game(n, &format!("Home {n}"), &format!("Away {n}"), 10, None))
        .collect();
    db.sync_games(&games).unwrap();
    let ids: Vec<GameId> = (1..=6)
        .map(|n| db.get_game_by_external_id(n).unwrap().unwrap().game_id)
        .collect();

    for (n, id) in ids.iter().take(4).enumerate() {
        db.submit_pick(user, *id, &format!("Home {}", n + 1), false, before_kickoff(), &rules)
            .unwrap();
    }

    let fifth = db.submit_pick(user, ids[4], "Home 5", false, before_kickoff(), &rules);
    assert!(matches!(
        fifth,
        Err(PoolError::Rejected(Rejection::DoubleDownRequiredAtFullQuota { limit: 5 }))
    ));
    db.submit_pick(user, ids[4], "Home 5", true, before_kickoff(), &rules)
        .unwrap();

    let sixth = db.submit_pick(user, ids[5], "Home 6", false, before_kickoff(), &rules);
    assert!(matches!(
        sixth,
        Err(PoolError::Rejected(Rejection::WeeklyLimitReached { limit: 5 }))
    ));
}

#[test]
fn test_remove_pick_before_kickoff() {
    let mut db = create_test_db();
    let user = db.add_user("alice").unwrap();
    let id = sync_one(&mut db, &rivalry());
    let rules = PoolRules::default();

    db.submit_pick(user, id, "Michigan", false, before_kickoff(), &rules)
        .unwrap();

    let late = db.remove_pick(user, id, kickoff(), &rules);
    assert!(matches!(late, Err(PoolError::Rejected(Rejection::GameStarted))));

    db.remove_pick(user, id, before_kickoff(), &rules).unwrap();
    assert!(db.get_pick(user, id).unwrap().is_none());

    let again = db.remove_pick(user, id, before_kickoff(), &rules);
    assert!(matches!(again, Err(PoolError::PickNotFound { .. })));
}

#[test]
fn test_scoring_updates_totals_once() {
    let mut db = create_test_db();
    let alice = db.add_user("alice").unwrap();
    let bob = db.add_user("bob").unwrap();
    let game = rivalry();
    let id = sync_one(&mut db, &game);
    let rules = PoolRules::default();

    db.submit_pick(alice, id, "Ohio State", true, before_kickoff(), &rules)
        .unwrap();
    db.submit_pick(bob, id, "Michigan", false, before_kickoff(), &rules)
        .unwrap();
    finish(&mut db, &game, 30, 20);

    let first = db.score_completed_picks().unwrap();
    assert_eq!(first.scored.len(), 2);
    assert_eq!(first.failed, 0);
    assert_eq!(total(&db, alice), 2);
    assert_eq!(total(&db, bob), 0);

    let second = db.score_completed_picks().unwrap();
    assert!(second.scored.is_empty());
    assert_eq!(total(&db, alice), 2);

    let pick = db.get_pick(alice, id).unwrap().unwrap();
    assert_eq!(pick.points, Some(2));
    assert_eq!(pick.result, Some(PickResult::Win));
}

#[test]
fn test_unfinished_games_are_left_unscored() {
    let mut db = create_test_db();
    let user = db.add_user("alice").unwrap();
    let id = sync_one(&mut db, &rivalry());
    db.submit_pick(user, id, "Michigan", false, before_kickoff(), &PoolRules::default())
        .unwrap();

    let report = db.score_completed_picks().unwrap();
    assert!(report.scored.is_empty());
    assert_eq!(db.get_pick(user, id).unwrap().unwrap().points, None);
}

#[test]
fn test_unreadable_row_does_not_stop_the_batch() {
    let mut db = create_test_db();
    let user = db.add_user("alice").unwrap();
    let good = rivalry();
    let bad = new_game(402, "Texas", "Texas A&M", 14, None);
    let good_id = sync_one(&mut db, &good);
    let bad_id = sync_one(&mut db, &bad);
    let rules = PoolRules::default();

    db.submit_pick(user, good_id, "Ohio State", false, before_kickoff(), &rules)
        .unwrap();
    db.submit_pick(user, bad_id, "Texas", false, before_kickoff(), &rules)
        .unwrap();
    finish(&mut db, &good, 30, 20);
    finish(&mut db, &bad, 30, 20);

    db.conn
        .execute(
            "UPDATE games SET category = 'SCRIMMAGE' WHERE game_id = ?",
            [bad_id.as_u64()],
        )
        .unwrap();

    let report = db.score_completed_picks().unwrap();
    assert_eq!(report.scored.len(), 1);
    assert_eq!(report.failed, 1);
    assert_eq!(total(&db, user), 1);
}

#[test]
fn test_penalties_only_for_premium_games() {
    let mut db = create_test_db();
    let alice = db.add_user("alice").unwrap();
    let bob = db.add_user("bob").unwrap();
    let rose = new_game(501, "Oregon", "Ohio State", 17, Some("Rose Bowl Game"));
    let minor = new_game(502, "Florida", "Tulane", 17, Some("Gasparilla Bowl"));
    let rose_id = sync_one(&mut db, &rose);
    sync_one(&mut db, &minor);

    db.submit_pick(alice, rose_id, "Oregon", true, before_kickoff(), &PoolRules::default())
        .unwrap();
    finish(&mut db, &rose, 21, 41);
    finish(&mut db, &minor, 33, 8);

    let report = db.apply_missing_pick_penalties().unwrap();
    assert_eq!(
        report.penalties,
        vec![Penalty {
            user_id: bob,
            game_id: rose_id,
            points: -1
        }]
    );
    assert_eq!(total(&db, bob), -1);

    let penalty = db.get_pick(bob, rose_id).unwrap().unwrap();
    assert_eq!(penalty.picked_team, "NO_PICK");
    assert_eq!(penalty.result, Some(PickResult::NoPick));
    assert!(penalty.is_double_down);

    let again = db.apply_missing_pick_penalties().unwrap();
    assert!(again.penalties.is_empty());
    assert_eq!(total(&db, bob), -1);

    // Scoring leaves the penalty alone and settles alice's real pick.
    db.score_completed_picks().unwrap();
    assert_eq!(total(&db, alice), -1);
    assert_eq!(total(&db, bob), -1);
}

#[test]
fn test_reclassified_game_forces_double_down() {
    let mut db = create_test_db();
    let user = db.add_user("alice").unwrap();
    let game = new_game(601, "Georgia", "Texas", 15, None);
    let id = sync_one(&mut db, &game);

    db.submit_pick(user, id, "Georgia", false, before_kickoff(), &PoolRules::default())
        .unwrap();

    let mut titled = game.clone();
    titled.notes = Some("SEC Championship".to_string());
    let report = db.sync_games(&[titled]).unwrap();

    assert_eq!(report.forced_double_downs, 1);
    assert!(db.get_pick(user, id).unwrap().unwrap().is_double_down);
}

#[test]
fn test_rescore_applies_only_the_delta() {
    let mut db = create_test_db();
    let user = db.add_user("alice").unwrap();
    let game = rivalry();
    let id = sync_one(&mut db, &game);

    db.submit_pick(user, id, "Ohio State", true, before_kickoff(), &PoolRules::default())
        .unwrap();
    finish(&mut db, &game, 30, 20);
    db.score_completed_picks().unwrap();
    assert_eq!(total(&db, user), 2);

    // Upstream corrects the final.
    finish(&mut db, &game, 20, 30);
    let report = db.rescore_game(id).unwrap();
    assert_eq!(report.corrections.len(), 1);
    assert_eq!(report.corrections[0].old_points, 2);
    assert_eq!(report.corrections[0].new_points, -1);
    assert_eq!(total(&db, user), -1);

    let again = db.rescore_game(id).unwrap();
    assert!(again.corrections.is_empty());
    assert_eq!(again.unchanged, 1);
    assert_eq!(total(&db, user), -1);
}

#[test]
fn test_rescore_requires_final_game() {
    let mut db = create_test_db();
    let id = sync_one(&mut db, &rivalry());
    assert!(matches!(
        db.rescore_game(id),
        Err(PoolError::GameNotFinal { .. })
    ));
    assert!(matches!(
        db.rescore_game(GameId::new(42)),
        Err(PoolError::GameNotFound { .. })
    ));
}

#[test]
fn test_recompute_repairs_drift() {
    let mut db = create_test_db();
    let user = db.add_user("alice").unwrap();
    let game = rivalry();
    let id = sync_one(&mut db, &game);

    db.submit_pick(user, id, "Ohio State", false, before_kickoff(), &PoolRules::default())
        .unwrap();
    finish(&mut db, &game, 30, 20);
    db.score_completed_picks().unwrap();

    db.conn
        .execute("UPDATE users SET total_score = 99", [])
        .unwrap();

    let drift = db.recompute_total_scores().unwrap();
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].stored, 99);
    assert_eq!(drift[0].recomputed, 1);
    assert_eq!(total(&db, user), 1);

    assert!(db.recompute_total_scores().unwrap().is_empty());
}

#[test]
fn test_leaderboard_orders_by_score_then_name() {
    let mut db = create_test_db();
    let carol = db.add_user("carol").unwrap();
    let alice = db.add_user("alice").unwrap();
    db.add_user("bob").unwrap();

    db.conn
        .execute(
            "UPDATE users SET total_score = 3 WHERE user_id IN (?, ?)",
            [carol.as_u64(), alice.as_u64()],
        )
        .unwrap();

    let names: Vec<String> = db
        .leaderboard()
        .unwrap()
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, vec!["alice", "carol", "bob"]);
}

#[test]
fn test_set_spread_on_unknown_game() {
    let mut db = create_test_db();
    assert!(matches!(
        db.set_game_spread(GameId::new(77), Some(-1.0)),
        Err(PoolError::GameNotFound { .. })
    ));
}

#[test]
fn test_week_games_in_kickoff_order() {
    let mut db = create_test_db();
    let mut early = new_game(1, "Early", "Team", 5, None);
    early.start_time = kickoff() - Duration::hours(4);
    let late = new_game(2, "Late", "Team", 5, None);
    let other_week = new_game(3, "Other", "Team", 6, None);
    db.sync_games(&[late, other_week, early]).unwrap();

    let games = db
        .get_games_for_week(Season::new(2024), Week::new(5))
        .unwrap();
    let homes: Vec<&str> = games.iter().map(|g| g.home_team.as_str()).collect();
    assert_eq!(homes, vec!["Early", "Late"]);
}

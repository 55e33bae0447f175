//! Integration tests for the rules engine through the public API

use cfb_pickem::{
    engine::{
        classify, compute_points, determine_bowl_tier, rules_for, score_pick, spread_winner,
        validate_submission, BowlTier, Cover, GameCategory, GameSignals, Outcome, PickResult,
        PoolRules, Rejection, Submission, WeekPick,
    },
    storage::{Game, Pick},
    GameId, PickId, Season, UserId, Week,
};
use chrono::{TimeZone, Utc};

fn signals<'a>(home: &'a str, away: &'a str, notes: Option<&'a str>) -> GameSignals<'a> {
    GameSignals {
        home_team: home,
        away_team: away,
        week: Week::new(12),
        season: Season::new(2024),
        notes,
    }
}

fn the_game(home_score: i32, away_score: i32) -> Game {
    Game {
        game_id: GameId::new(1),
        external_id: 401628374,
        season: Season::new(2024),
        week: Week::new(12),
        home_team: "Ohio State".to_string(),
        away_team: "Michigan".to_string(),
        start_time: Utc.with_ymd_and_hms(2024, 11, 30, 17, 0, 0).unwrap(),
        spread: Some(-3.0),
        over_under: None,
        home_score: Some(home_score),
        away_score: Some(away_score),
        completed: true,
        notes: Some(String::new()),
        category: GameCategory::Regular,
    }
}

fn michigan_pick() -> Pick {
    let at = Utc.with_ymd_and_hms(2024, 11, 29, 12, 0, 0).unwrap();
    Pick {
        pick_id: PickId::new(1),
        user_id: UserId::new(1),
        game_id: GameId::new(1),
        picked_team: "Michigan".to_string(),
        locked_spread: -3.0,
        is_double_down: false,
        points: None,
        result: None,
        created_at: at,
        updated_at: at,
    }
}

#[test]
fn test_rivalry_game_on_the_number_is_a_push() {
    let game = the_game(30, 27);
    assert_eq!(classify(&game.signals()), GameCategory::Regular);

    let scored = score_pick(&game, &michigan_pick()).unwrap();
    assert_eq!(scored.result, PickResult::Push);
    assert_eq!(scored.points, 0);
    assert_eq!(scored.tier, None);
}

#[test]
fn test_category_precedence() {
    let title = signals("Notre Dame", "Ohio State", Some("CFP National Championship"));
    assert_eq!(classify(&title), GameCategory::Playoff);

    let rose = signals("Oregon", "Ohio State", Some("Rose Bowl"));
    assert_eq!(classify(&rose), GameCategory::Bowl);
    assert_eq!(determine_bowl_tier(rose.notes), BowlTier::Premium);

    let new_mexico = signals("TCU", "Louisiana", Some("New Mexico Bowl"));
    assert_eq!(classify(&new_mexico), GameCategory::Bowl);
    assert_eq!(determine_bowl_tier(new_mexico.notes), BowlTier::Standard);
}

#[test]
fn test_army_navy_either_side() {
    assert_eq!(classify(&signals("Army", "Navy", None)), GameCategory::ArmyNavy);
    assert_eq!(classify(&signals("Navy", "Army", None)), GameCategory::ArmyNavy);
    assert!(rules_for(GameCategory::ArmyNavy).mandatory_double_down);
}

#[test]
fn test_spread_winner_examples() {
    assert_eq!(spread_winner(24, 21, -3.0, "Home", "Away"), Cover::Push);
    assert_eq!(spread_winner(24, 21, -2.5, "Home", "Away"), Cover::Team("Home"));
}

#[test]
fn test_premium_playoff_points_ignore_flag() {
    assert_eq!(
        compute_points(GameCategory::Playoff, Some(BowlTier::Premium), Outcome::Win, false),
        2
    );
    assert_eq!(
        compute_points(GameCategory::Bowl, Some(BowlTier::Standard), Outcome::Loss, true),
        0
    );
}

#[test]
fn test_quota_boundary_through_public_api() {
    let mut game = the_game(0, 0);
    game.home_score = None;
    game.away_score = None;
    game.completed = false;
    game.game_id = GameId::new(5);

    let existing: Vec<WeekPick> = (1..=4)
        .map(|id| WeekPick {
            game_id: GameId::new(id),
            category: GameCategory::Regular,
            is_double_down: false,
        })
        .collect();
    let now = Utc.with_ymd_and_hms(2024, 11, 30, 12, 0, 0).unwrap();

    let plain = Submission {
        picked_team: "Michigan",
        is_double_down: false,
    };
    assert_eq!(
        validate_submission(&game, &plain, &existing, now, &PoolRules::default()),
        Err(Rejection::DoubleDownRequiredAtFullQuota { limit: 5 })
    );

    let doubled = Submission {
        picked_team: "Michigan",
        is_double_down: true,
    };
    assert_eq!(
        validate_submission(&game, &doubled, &existing, now, &PoolRules::default()),
        Ok(())
    );
}

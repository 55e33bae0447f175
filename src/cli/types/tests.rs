//! Unit tests for id and calendar wrappers

use super::*;
use crate::error::PoolError;

#[test]
fn test_user_id_round_trips_through_string() {
    let parsed: UserId = "17".parse().unwrap();
    assert_eq!(parsed, UserId::new(17));
    assert_eq!(parsed.to_string(), "17");
}

#[test]
fn test_game_id_rejects_garbage() {
    let result = "not_a_number".parse::<GameId>();
    assert!(matches!(result, Err(PoolError::InvalidNumber(_))));
}

#[test]
fn test_season_default() {
    assert_eq!(Season::default().as_u16(), 2025);
}

#[test]
fn test_week_parse() {
    let week: Week = "12".parse().unwrap();
    assert_eq!(week.as_u16(), 12);
}

#[test]
fn test_week_zero_is_rejected() {
    match "0".parse::<Week>() {
        Err(PoolError::InvalidWeek { week }) => assert_eq!(week, 0),
        other => panic!("Expected InvalidWeek error, got {:?}", other),
    }
}

#[test]
fn test_ids_order_by_value() {
    let mut ids = vec![UserId::new(3), UserId::new(1), UserId::new(2)];
    ids.sort();
    assert_eq!(ids, vec![UserId::new(1), UserId::new(2), UserId::new(3)]);
}

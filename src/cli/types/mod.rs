//! Type-safe wrappers for pool identifiers and the season calendar.

pub mod ids;
pub mod time;

pub use ids::{GameId, PickId, UserId};
pub use time::{Season, Week};

#[cfg(test)]
mod tests;

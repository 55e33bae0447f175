//! Upstream game and betting-line data (CollegeFootballData)

pub mod http;
pub mod types;

pub use http::{CfbdClient, CFBD_BASE_URL};
pub use types::{load_games, merge_lines, to_new_games, GameLines, Line, SeasonType, UpstreamGame};

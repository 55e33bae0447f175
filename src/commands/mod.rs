//! Command implementations for the pick'em CLI

pub mod common;
pub mod games;
pub mod picks;
pub mod settlement;
pub mod users;


pub use common::{resolve_api_key, resolve_db_path};

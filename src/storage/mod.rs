//! Storage layer for the pick'em pool
//!
//! SQLite persistence split by concern:
//! - `models`: Data structures
//! - `schema`: Database connection and schema management
//! - `queries`: Basic CRUD operations
//! - `submissions`: Validated pick writes
//! - `settlement`: Scoring, penalties and total-score repair
//! - `sync`: Upstream game upserts

pub mod models;
pub mod queries;
pub mod schema;
pub mod settlement;
pub mod submissions;
pub mod sync;

#[cfg(test)]
mod tests;

pub use models::*;
pub use schema::PoolDatabase;

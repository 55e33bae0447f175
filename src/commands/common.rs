//! Helpers shared across command handlers: configuration lookup and output.

use std::path::PathBuf;

use serde::Serialize;

use crate::{
    storage::{PoolDatabase, User},
    PoolError, Result, API_KEY_ENV_VAR,
};

/// Database path from `--db`, else `CFB_PICKEM_DB`, else the data directory.
pub fn resolve_db_path(db: Option<PathBuf>) -> Result<PathBuf> {
    match db {
        Some(path) => Ok(path),
        None => PoolDatabase::database_path(),
    }
}

/// API key from `--api-key` or the `CFBD_API_KEY` environment variable.
pub fn resolve_api_key(api_key: Option<String>) -> Result<String> {
    api_key
        .or_else(|| {
            std::env::var(API_KEY_ENV_VAR)
                .ok()
                .filter(|key| !key.trim().is_empty())
        })
        .ok_or_else(|| PoolError::MissingApiKey {
            env_var: API_KEY_ENV_VAR.to_string(),
        })
}

pub fn open_database(db: Option<PathBuf>) -> Result<PoolDatabase> {
    let path = resolve_db_path(db)?;
    PoolDatabase::open(&path)
}

/// Look a pool member up by name.
pub fn find_user(db: &PoolDatabase, name: &str) -> Result<User> {
    db.find_user_by_name(name)?
        .ok_or_else(|| PoolError::UnknownUserName {
            name: name.to_string(),
        })
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?); // tarpaulin::skip
    Ok(())
}

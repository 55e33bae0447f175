use reqwest::Client;
use serde::de::DeserializeOwned;

use super::types::{GameLines, SeasonType, UpstreamGame};
use crate::error::Result;
use crate::{Season, Week};


/// Base URL for the CollegeFootballData API.
pub const CFBD_BASE_URL: &str = "https://api.collegefootballdata.com";

/// Thin client for the two CollegeFootballData endpoints a sync needs.
pub struct CfbdClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CfbdClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, CFBD_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn fetch_games(
        &self,
        season: Season,
        week: Week,
        season_type: SeasonType,
    ) -> Result<Vec<UpstreamGame>> {
        self.get("games", season, week, season_type).await
    }

    pub async fn fetch_lines(
        &self,
        season: Season,
        week: Week,
        season_type: SeasonType,
    ) -> Result<Vec<GameLines>> {
        self.get("lines", season, week, season_type).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        season: Season,
        week: Week,
        season_type: SeasonType,
    ) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        let params = [
            ("year", season.to_string()),
            ("week", week.to_string()),
            ("seasonType", season_type.to_string()),
        ];

        let res = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;

        Ok(res)
    }
}

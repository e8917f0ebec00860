use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::models::LeaderboardPayload;

/// Path of the leaderboard endpoint, relative to the configured origin
pub const LEADERBOARD_PATH: &str = "/api/leaderboard";

/// Ways a single poll can fail
#[derive(Debug, Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("leaderboard API responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can return the leaderboard for a period ending at `end_time_ms`
pub trait LeaderboardSource: Send + Sync {
    fn fetch(
        &self,
        end_time_ms: i64,
    ) -> impl Future<Output = Result<LeaderboardPayload, PollError>> + Send;
}

/// HTTP client for the leaderboard endpoint
pub struct LeaderboardClient {
    client: Client,
    url: String,
}

impl LeaderboardClient {
    /// Create a client for `{base_url}/api/leaderboard`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PollError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), LEADERBOARD_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LeaderboardSource for LeaderboardClient {
    async fn fetch(&self, end_time_ms: i64) -> Result<LeaderboardPayload, PollError> {
        debug!("Fetching leaderboard: {}?endTime={}", self.url, end_time_ms);

        let response = self
            .client
            .get(&self.url)
            .query(&[("endTime", end_time_ms)])
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PollError::Status { status, body });
        }

        // Body is read before decoding; malformed JSON is a Decode error.
        let body = response.bytes().await?;
        let payload = serde_json::from_slice(&body)?;

        Ok(payload)
    }
}

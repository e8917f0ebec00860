use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::deadline::DeadlineRule;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Origin serving `/api/leaderboard`
    pub leaderboard_base_url: String,

    /// Deadline sent as `endTime` with every leaderboard poll
    pub leaderboard_deadline: DeadlineRule,

    /// Deadline the countdown runs towards
    pub countdown_deadline: DeadlineRule,

    /// Per-request timeout for leaderboard polls
    pub leaderboard_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            leaderboard_base_url: env::var("LEADERBOARD_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),

            leaderboard_deadline: env::var("LEADERBOARD_DEADLINE")
                .unwrap_or_else(|_| "fixed:2025-11-30T18:59:59-07:00".to_string())
                .parse()
                .context("LEADERBOARD_DEADLINE must be a valid deadline rule")?,

            countdown_deadline: env::var("COUNTDOWN_DEADLINE")
                .unwrap_or_else(|_| "month-end:America/New_York".to_string())
                .parse()
                .context("COUNTDOWN_DEADLINE must be a valid deadline rule")?,

            leaderboard_timeout: Duration::from_secs(
                env::var("LEADERBOARD_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "8".to_string())
                    .parse()
                    .context("LEADERBOARD_TIMEOUT_SECS must be a valid number")?,
            ),
        })
    }
}

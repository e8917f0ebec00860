use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wager_board::api::LeaderboardClient;
use wager_board::config::Config;
use wager_board::surface::ConsoleSurface;
use wager_board::workers::{CountdownTicker, LeaderboardPoller};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wager_board=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting wager-board");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Deadlines are resolved once and never re-resolved
    let now = Utc::now();
    let leaderboard_deadline = config
        .leaderboard_deadline
        .resolve(now)
        .context("Failed to resolve leaderboard deadline")?;
    let countdown_deadline = config
        .countdown_deadline
        .resolve(now)
        .context("Failed to resolve countdown deadline")?;
    info!(
        "Leaderboard ends {} ({}), countdown ends {} ({})",
        leaderboard_deadline,
        config.leaderboard_deadline,
        countdown_deadline,
        config.countdown_deadline
    );

    let client = LeaderboardClient::new(&config.leaderboard_base_url, config.leaderboard_timeout)
        .context("Failed to build leaderboard client")?;
    info!("Polling {}", client.url());

    // Both workers render into one board
    let surface = Arc::new(ConsoleSurface::board());

    let mut poller = LeaderboardPoller::new(client, Arc::clone(&surface), leaderboard_deadline);
    let mut ticker = CountdownTicker::new(Arc::clone(&surface), countdown_deadline);

    info!("Workers created, starting...");

    let mut poller_handle = tokio::spawn(async move {
        poller.run().await;
    });

    let mut ticker_handle = tokio::spawn(async move {
        ticker.run().await;
    });

    // Run until ctrl-c, or until both loops have stopped on their own
    let mut poller_done = false;
    let mut ticker_done = false;

    while !(poller_done && ticker_done) {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            result = &mut poller_handle, if !poller_done => {
                poller_done = true;
                if let Err(e) = result {
                    error!("Leaderboard poller exited unexpectedly: {:?}", e);
                }
            }
            result = &mut ticker_handle, if !ticker_done => {
                ticker_done = true;
                if let Err(e) = result {
                    error!("Countdown exited unexpectedly: {:?}", e);
                }
            }
        }
    }

    info!("Shutting down wager-board");
    Ok(())
}

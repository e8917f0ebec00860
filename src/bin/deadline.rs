use std::env;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wager_board::deadline::DeadlineRule;
use wager_board::format::format_countdown;

const DEFAULT_RULE: &str = "month-end:America/New_York";

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deadline=info,wager_board=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse arguments
    let args: Vec<String> = env::args().collect();
    let raw_rule = args.get(1).map(String::as_str).unwrap_or(DEFAULT_RULE);

    let rule: DeadlineRule = raw_rule
        .parse()
        .with_context(|| format!("Invalid deadline rule: {}", raw_rule))?;

    let now = Utc::now();
    let deadline = rule.resolve(now).context("Failed to resolve deadline")?;

    println!("rule:      {}", rule);
    println!("utc:       {}", deadline);
    println!("endTime:   {}", deadline.epoch_millis());
    println!("local:     {}", rule.local_time(deadline));
    println!("remaining: {}", format_countdown(deadline.remaining_millis(now)));

    Ok(())
}

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::api::LeaderboardSource;
use crate::deadline::Deadline;
use crate::format::format_currency;
use crate::models::{LeaderboardPayload, LeaderboardSnapshot};
use crate::surface::{name_slot, wager_slot, Surface, SLOT_COUNT};

/// Interval between leaderboard polls
pub const POLL_INTERVAL: Duration = Duration::from_secs(20);

/// Text written to both fields of an empty rank
pub const PLACEHOLDER: &str = "----";

/// Lifecycle of the poll loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollState {
    /// Set once the remote source reports the period as concluded; never reset
    pub ended: bool,
}

/// Worker that polls the leaderboard and renders the top ranks
pub struct LeaderboardPoller<S, D> {
    source: S,
    surface: D,
    deadline: Deadline,
    poll_interval: Duration,
    state: PollState,
}

impl<S: LeaderboardSource, D: Surface> LeaderboardPoller<S, D> {
    /// Create a new poller for the period ending at `deadline`
    pub fn new(source: S, surface: D, deadline: Deadline) -> Self {
        Self {
            source,
            surface,
            deadline,
            poll_interval: POLL_INTERVAL,
            state: PollState::default(),
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    /// Poll immediately, then on every interval until the source reports the end
    pub async fn run(&mut self) {
        info!(
            "Leaderboard poller started (interval: {:?}, endTime: {})",
            self.poll_interval,
            self.deadline.epoch_millis()
        );

        self.poll_once().await;

        let mut interval = time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await; // Skip first tick (already polled)

        while !self.state.ended {
            interval.tick().await;
            self.poll_once().await;
        }

        info!("Leaderboard ended, stopped polling");
    }

    /// Perform a single fetch-and-render cycle
    ///
    /// Failures are logged and leave the previous render in place. This also
    /// serves as a manual refresh once the loop has stopped.
    pub async fn poll_once(&mut self) {
        match self.source.fetch(self.deadline.epoch_millis()).await {
            Ok(payload) => self.apply(&payload),
            Err(e) => error!("Failed to load leaderboard data: {}", e),
        }
    }

    fn apply(&mut self, payload: &LeaderboardPayload) {
        if let LeaderboardPayload::Unrecognized(body) = payload {
            error!("Unexpected leaderboard response shape: {}", body);
        }

        if payload.ended() && !self.state.ended {
            info!("Leaderboard reported as ended");
            self.state.ended = true;
        }

        let snapshot = LeaderboardSnapshot::project(payload.entries());
        debug!(
            "Rendering {} of {} entries",
            snapshot.len(),
            payload.entries().len()
        );

        render_snapshot(&self.surface, &snapshot);
    }
}

/// Write a snapshot into the ranked slots
///
/// Ranks without an entry get the placeholder. A rank is skipped when
/// either of its slots is missing from the surface.
pub fn render_snapshot<D: Surface + ?Sized>(surface: &D, snapshot: &LeaderboardSnapshot) {
    for rank in 0..SLOT_COUNT {
        let name_id = name_slot(rank);
        let wager_id = wager_slot(rank);

        if !surface.contains(&name_id) || !surface.contains(&wager_id) {
            continue;
        }

        match snapshot.get(rank) {
            Some(player) => {
                surface.set_text(&name_id, player.display_name());
                surface.set_text(&wager_id, &format_currency(player.wager_amount));
            }
            None => {
                surface.set_text(&name_id, PLACEHOLDER);
                surface.set_text(&wager_id, PLACEHOLDER);
            }
        }
    }
}

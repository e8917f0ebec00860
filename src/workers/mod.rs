pub mod countdown_ticker;
pub mod leaderboard_poller;

pub use countdown_ticker::{CountdownTicker, TickOutcome};
pub use leaderboard_poller::{render_snapshot, LeaderboardPoller, PollState};

pub mod leaderboard;

pub use leaderboard::{LeaderboardClient, LeaderboardSource, PollError};

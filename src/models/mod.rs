pub mod payload;
pub mod player;
pub mod snapshot;

pub use payload::LeaderboardPayload;
pub use player::PlayerEntry;
pub use snapshot::LeaderboardSnapshot;

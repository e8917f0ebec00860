use serde_json::Value;

use crate::models::PlayerEntry;
use crate::surface::SLOT_COUNT;

/// Top entries of one poll, sorted by wager, highest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardSnapshot {
    entries: Vec<PlayerEntry>,
}

impl LeaderboardSnapshot {
    /// Drop entries without a numeric wager, sort descending and keep the top ten
    ///
    /// The sort is stable, so tied wagers keep their input order.
    pub fn project(values: &[Value]) -> Self {
        let mut entries: Vec<PlayerEntry> =
            values.iter().filter_map(PlayerEntry::from_value).collect();

        entries.sort_by(|a, b| b.wager_amount.total_cmp(&a.wager_amount));
        entries.truncate(SLOT_COUNT);

        Self { entries }
    }

    pub fn get(&self, rank: usize) -> Option<&PlayerEntry> {
        self.entries.get(rank)
    }

    pub fn entries(&self) -> &[PlayerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

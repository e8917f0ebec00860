use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, Level};

use crate::format::COUNTDOWN_ZERO;

/// Number of ranked slots on the board
pub const SLOT_COUNT: usize = 10;

/// Slot id for the countdown text
pub const COUNTDOWN_SLOT: &str = "countdown";

/// Slot id holding the player name at `rank`
pub fn name_slot(rank: usize) -> String {
    format!("user{}_name", rank)
}

/// Slot id holding the formatted wager at `rank`
pub fn wager_slot(rank: usize) -> String {
    format!("user{}_wager", rank)
}

/// Every slot id the board and countdown write to
pub fn board_slot_ids() -> Vec<String> {
    let mut ids: Vec<String> = (0..SLOT_COUNT)
        .flat_map(|rank| [name_slot(rank), wager_slot(rank)])
        .collect();
    ids.push(COUNTDOWN_SLOT.to_string());
    ids
}

/// Display target holding text by slot id
///
/// Slots that do not exist are not an error; writers check `contains` and
/// skip them.
pub trait Surface: Send + Sync {
    fn contains(&self, id: &str) -> bool;

    fn set_text(&self, id: &str, text: &str);
}

impl<T: Surface + ?Sized> Surface for Arc<T> {
    fn contains(&self, id: &str) -> bool {
        (**self).contains(id)
    }

    fn set_text(&self, id: &str, text: &str) {
        (**self).set_text(id, text)
    }
}

/// In-memory surface with a fixed set of slots
#[derive(Debug, Default)]
pub struct MemorySurface {
    slots: RwLock<HashMap<String, String>>,
}

impl MemorySurface {
    /// Create a surface exposing exactly the given slot ids, all empty
    pub fn with_slots<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots = ids
            .into_iter()
            .map(|id| (id.into(), String::new()))
            .collect();

        Self {
            slots: RwLock::new(slots),
        }
    }

    /// Surface with every board slot and the countdown slot
    pub fn board() -> Self {
        Self::with_slots(board_slot_ids())
    }

    /// Current text of a slot, if the slot exists
    pub fn get(&self, id: &str) -> Option<String> {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        slots.get(id).cloned()
    }

    /// Write `text` and return whether the slot's content changed
    fn replace(&self, id: &str, text: &str) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        match slots.get_mut(id) {
            Some(current) if current != text => {
                *current = text.to_string();
                true
            }
            _ => false,
        }
    }
}

impl Surface for MemorySurface {
    fn contains(&self, id: &str) -> bool {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        slots.contains_key(id)
    }

    fn set_text(&self, id: &str, text: &str) {
        self.replace(id, text);
    }
}

/// Memory surface that logs each slot change
///
/// Board changes log at info. The running countdown changes every second
/// and logs at debug until it reaches zero.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    inner: MemorySurface,
}

impl ConsoleSurface {
    pub fn board() -> Self {
        Self {
            inner: MemorySurface::board(),
        }
    }

    pub fn get(&self, id: &str) -> Option<String> {
        self.inner.get(id)
    }
}

impl Surface for ConsoleSurface {
    fn contains(&self, id: &str) -> bool {
        self.inner.contains(id)
    }

    fn set_text(&self, id: &str, text: &str) {
        if !self.inner.replace(id, text) {
            return;
        }

        if change_level(id, text) == Level::DEBUG {
            debug!("{:<14} {}", id, text);
        } else {
            info!("{:<14} {}", id, text);
        }
    }
}

fn change_level(id: &str, text: &str) -> Level {
    if id == COUNTDOWN_SLOT && text != COUNTDOWN_ZERO {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

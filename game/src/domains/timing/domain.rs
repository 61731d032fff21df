use std::collections::HashMap;

use crate::inventory::{Item, ItemId};

/// Lifecycle hooks of the decay scheduler.
pub trait Decay {
    fn begin_decay(&mut self, item: &Item);

    fn cancel_decay(&mut self, item: &Item);
}

/// Keeps the remaining decay time of every item that is currently decaying.
#[derive(Default)]
pub struct DecayTimeline {
    decaying: HashMap<ItemId, u32>,
}

impl DecayTimeline {
    #[inline]
    pub fn is_decaying(&self, id: ItemId) -> bool {
        self.decaying.contains_key(&id)
    }

    /// Remaining milliseconds for a decaying item.
    #[inline]
    pub fn remaining(&self, id: ItemId) -> Option<u32> {
        self.decaying.get(&id).copied()
    }

    /// Moves the timeline forward and returns the items whose decay ran out,
    /// ordered by id.
    pub fn advance(&mut self, elapsed: u32) -> Vec<ItemId> {
        let mut expired = vec![];
        for (id, remaining) in self.decaying.iter_mut() {
            *remaining = remaining.saturating_sub(elapsed);
            if *remaining == 0 {
                expired.push(*id);
            }
        }
        for id in &expired {
            self.decaying.remove(id);
        }
        expired.sort();
        expired
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.decaying.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.decaying.is_empty()
    }
}

impl Decay for DecayTimeline {
    fn begin_decay(&mut self, item: &Item) {
        let duration = item
            .attributes
            .duration
            .unwrap_or(item.kind.decay_duration.saturating_mul(1000));
        if duration == 0 {
            return;
        }
        self.decaying.insert(item.id, duration);
    }

    fn cancel_decay(&mut self, item: &Item) {
        self.decaying.remove(&item.id);
    }
}

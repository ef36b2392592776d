//! Bounded history of recorded rolls.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::outcome::RollSummary;

/// Number of rolls the ledger keeps.
pub const LEDGER_CAPACITY: usize = 30;

/// Recent roll summaries, most recent first.
///
/// Recording past capacity evicts the oldest entry. Entries are never
/// changed in place; an escalated roll has to be swapped in with
/// [`RollLedger::replace`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollLedger {
    entries: VecDeque<RollSummary>,
    capacity: usize,
}

impl Default for RollLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl RollLedger {
    pub fn new() -> Self {
        Self::with_capacity(LEDGER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a roll as the most recent entry.
    ///
    /// Returns the evicted oldest entry, if the ledger was full.
    pub fn record(&mut self, summary: RollSummary) -> Option<RollSummary> {
        if self.capacity == 0 {
            return Some(summary);
        }
        self.entries.push_front(summary);
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    /// Swap the entry with `id` for `summary`.
    ///
    /// Returns the previous entry, or `None` if no entry has that id (for
    /// instance because it was already evicted).
    pub fn replace(&mut self, id: Uuid, summary: RollSummary) -> Option<RollSummary> {
        let slot = self.entries.iter_mut().find(|entry| entry.id == id)?;
        Some(std::mem::replace(slot, summary))
    }

    pub fn latest(&self) -> Option<&RollSummary> {
        self.entries.front()
    }

    /// Entry at `index`, where 0 is the most recent.
    pub fn get(&self, index: usize) -> Option<&RollSummary> {
        self.entries.get(index)
    }

    pub fn find(&self, id: Uuid) -> Option<&RollSummary> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Iterate from most recent to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &RollSummary> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::DieType;
    use crate::outcome::RollSource;
    use crate::testing::fixed_summary;

    fn roll(n: u32) -> RollSummary {
        fixed_summary(&format!("Roll {n}"), RollSource::Custom, &[(DieType::D20, 1)])
    }

    #[test]
    fn test_most_recent_first() {
        let mut ledger = RollLedger::new();
        ledger.record(roll(1));
        ledger.record(roll(2));
        assert_eq!(ledger.latest().unwrap().label, "Roll 2");
        assert_eq!(ledger.get(1).unwrap().label, "Roll 1");
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut ledger = RollLedger::new();
        for n in 1..=30 {
            assert!(ledger.record(roll(n)).is_none());
        }
        assert_eq!(ledger.len(), 30);
        assert_eq!(ledger.get(29).unwrap().label, "Roll 1");

        let evicted = ledger.record(roll(31)).unwrap();
        assert_eq!(evicted.label, "Roll 1");
        assert_eq!(ledger.len(), 30);
        assert_eq!(ledger.latest().unwrap().label, "Roll 31");
        assert_eq!(ledger.get(29).unwrap().label, "Roll 2");

        for n in 32..=100 {
            ledger.record(roll(n));
        }
        assert_eq!(ledger.len(), LEDGER_CAPACITY);
    }

    #[test]
    fn test_replace_swaps_entry() {
        let mut ledger = RollLedger::new();
        let first = roll(1);
        let id = first.id;
        ledger.record(first);
        ledger.record(roll(2));

        let mut escalated = ledger.find(id).unwrap().clone();
        escalated.final_total = 99;
        let previous = ledger.replace(id, escalated).unwrap();
        assert_eq!(previous.final_total, 1);
        assert_eq!(ledger.get(1).unwrap().final_total, 99);
        assert_eq!(ledger.len(), 2);

        assert!(ledger.replace(Uuid::new_v4(), roll(3)).is_none());
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut ledger = RollLedger::with_capacity(0);
        assert!(ledger.record(roll(1)).is_some());
        assert!(ledger.is_empty());
    }
}

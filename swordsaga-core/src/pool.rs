//! Staged pools of dice.

use serde::{Deserialize, Serialize};

use crate::dice::DieType;

/// Most dice of one kind that can be staged at once.
pub const MAX_DICE: u32 = 99;

/// A count of each die type staged for a roll. Counts stay within
/// `0..=MAX_DICE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DicePool {
    counts: [u32; 6],
}

impl DicePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, die: DieType) -> u32 {
        self.counts[die.index()]
    }

    /// Set the count of `die`, clamped to [`MAX_DICE`].
    pub fn set(&mut self, die: DieType, count: u32) {
        self.counts[die.index()] = count.min(MAX_DICE);
    }

    /// Adjust the count of `die` by `delta`, clamping to `0..=MAX_DICE`.
    pub fn adjust(&mut self, die: DieType, delta: i64) {
        let current = i64::from(self.count(die));
        let next = current.saturating_add(delta).clamp(0, i64::from(MAX_DICE));
        self.counts[die.index()] = next as u32;
    }

    pub fn increment(&mut self, die: DieType) {
        self.adjust(die, 1);
    }

    pub fn decrement(&mut self, die: DieType) {
        self.adjust(die, -1);
    }

    /// Total number of staged dice.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    pub fn clear(&mut self) {
        self.counts = [0; 6];
    }

    /// Expand to a die list, smallest die first.
    pub fn dice(&self) -> Vec<DieType> {
        DieType::ALL
            .iter()
            .flat_map(|&die| std::iter::repeat(die).take(self.count(die) as usize))
            .collect()
    }

    /// Staged `(die, count)` pairs with a non-zero count.
    pub fn iter(&self) -> impl Iterator<Item = (DieType, u32)> + '_ {
        DieType::ALL
            .into_iter()
            .map(|die| (die, self.count(die)))
            .filter(|(_, count)| *count > 0)
    }
}

impl FromIterator<DieType> for DicePool {
    fn from_iter<I: IntoIterator<Item = DieType>>(iter: I) -> Self {
        let mut pool = DicePool::new();
        for die in iter {
            pool.increment(die);
        }
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrement_clamps_at_zero() {
        let mut pool = DicePool::new();
        pool.decrement(DieType::D6);
        assert_eq!(pool.count(DieType::D6), 0);

        pool.increment(DieType::D6);
        pool.adjust(DieType::D6, -5);
        assert_eq!(pool.count(DieType::D6), 0);
    }

    #[test]
    fn test_counts_clamp_at_max() {
        let mut pool = DicePool::new();
        pool.set(DieType::D20, u32::MAX);
        assert_eq!(pool.count(DieType::D20), MAX_DICE);

        pool.increment(DieType::D20);
        assert_eq!(pool.count(DieType::D20), MAX_DICE);

        pool.adjust(DieType::D4, i64::MAX);
        pool.increment(DieType::D6);
        assert_eq!(pool.count(DieType::D4), MAX_DICE);
        assert_eq!(pool.total(), 2 * MAX_DICE + 1);
        assert_eq!(pool.dice().len(), pool.total() as usize);
    }

    #[test]
    fn test_dice_expand_in_catalog_order() {
        let pool: DicePool = [DieType::D20, DieType::D4, DieType::D20, DieType::D8]
            .into_iter()
            .collect();
        assert_eq!(
            pool.dice(),
            vec![DieType::D4, DieType::D8, DieType::D20, DieType::D20]
        );
        assert_eq!(pool.total(), 4);
        assert_eq!(
            pool.iter().collect::<Vec<_>>(),
            vec![(DieType::D4, 1), (DieType::D8, 1), (DieType::D20, 2)]
        );
    }

    #[test]
    fn test_clear() {
        let mut pool = DicePool::new();
        pool.set(DieType::D12, 3);
        assert!(!pool.is_empty());
        pool.clear();
        assert!(pool.is_empty());
        assert!(pool.dice().is_empty());
    }
}

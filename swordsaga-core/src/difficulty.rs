//! Difficulty tiers and the dice they require.
//!
//! The tier table is literal: each tier lists exactly the dice the game
//! calls for, and nothing is derived from a formula.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dice::{DiceError, DieType};
use crate::dice::DieType::{D10, D12, D20, D4, D6, D8};

/// Named difficulty of an opposing challenge, easiest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum DifficultyLevel {
    Trivial,
    Easy,
    #[default]
    Normal,
    Challenge,
    Hard,
    VeryHard,
    ExceptionallyHard,
    AlmostImpossible,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 8] = [
        DifficultyLevel::Trivial,
        DifficultyLevel::Easy,
        DifficultyLevel::Normal,
        DifficultyLevel::Challenge,
        DifficultyLevel::Hard,
        DifficultyLevel::VeryHard,
        DifficultyLevel::ExceptionallyHard,
        DifficultyLevel::AlmostImpossible,
    ];

    /// The dice rolled against this tier, in order.
    pub fn dice(&self) -> &'static [DieType] {
        match self {
            DifficultyLevel::Trivial => &[D8],
            DifficultyLevel::Easy => &[D12],
            DifficultyLevel::Normal => &[D20],
            DifficultyLevel::Challenge => &[D20, D4],
            DifficultyLevel::Hard => &[D20, D4, D6],
            DifficultyLevel::VeryHard => &[D20, D4, D6, D8],
            DifficultyLevel::ExceptionallyHard => &[D20, D4, D6, D8, D10],
            DifficultyLevel::AlmostImpossible => &[D20, D4, D6, D8, D10, D12],
        }
    }

    /// Canonical notation, e.g. `"d20 + d4"`.
    pub fn notation(&self) -> String {
        self.dice()
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(" + ")
    }

    pub fn name(&self) -> &'static str {
        match self {
            DifficultyLevel::Trivial => "Trivial",
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Normal => "Normal",
            DifficultyLevel::Challenge => "Challenge",
            DifficultyLevel::Hard => "Hard",
            DifficultyLevel::VeryHard => "Very Hard",
            DifficultyLevel::ExceptionallyHard => "Exceptionally Hard",
            DifficultyLevel::AlmostImpossible => "Almost Impossible",
        }
    }

    /// One tier harder, saturating at Almost Impossible.
    pub fn harder(self) -> DifficultyLevel {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + 1).min(Self::ALL.len() - 1)]
    }

    /// One tier easier, saturating at Trivial.
    pub fn easier(self) -> DifficultyLevel {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[idx.saturating_sub(1)]
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DifficultyLevel {
    type Err = DiceError;

    /// Accepts a tier name (`"very hard"`) or its notation (`"d20 + d4 + d6"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        DifficultyLevel::ALL
            .into_iter()
            .find(|level| normalize(level.name()) == key || normalize(&level.notation()) == key)
            .or(match key.as_str() {
                "impossible" => Some(DifficultyLevel::AlmostImpossible),
                "exhard" => Some(DifficultyLevel::ExceptionallyHard),
                _ => None,
            })
            .ok_or_else(|| DiceError::InvalidDifficulty(s.to_string()))
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || *c == '+')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Dice for a difficulty given by name or notation.
///
/// Anything unrecognised falls back to a single d20.
pub fn difficulty_dice(level: &str) -> Vec<DieType> {
    level
        .parse::<DifficultyLevel>()
        .map(|l| l.dice().to_vec())
        .unwrap_or_else(|_| vec![D20])
}

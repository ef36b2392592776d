//! Sword Saga dice rolling.
//!
//! Rolls ordered sets of polyhedral dice under a [`RollMode`]. Advantage and
//! disadvantage reroll an unfavourable first draw exactly once, and any die
//! that lands on its highest face becomes critical and multiplies the whole
//! roll by half its face count.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Error type for die parsing and rolling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("Invalid die type: {0}")]
    InvalidDieType(String),
    #[error("Invalid roll mode: {0}")]
    InvalidRollMode(String),
    #[error("Unknown difficulty: {0}")]
    InvalidDifficulty(String),
    #[error("Unknown stat: {0}")]
    InvalidStat(String),
}

/// The dice of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl DieType {
    /// Every die type, smallest first.
    pub const ALL: [DieType; 6] = [
        DieType::D4,
        DieType::D6,
        DieType::D8,
        DieType::D10,
        DieType::D12,
        DieType::D20,
    ];

    pub fn sides(&self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            4 => Some(DieType::D4),
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            20 => Some(DieType::D20),
            _ => None,
        }
    }

    /// Multiplier granted when this die lands on its highest face.
    pub fn crit_multiplier(&self) -> f64 {
        f64::from(self.sides()) / 2.0
    }

    /// Position of this die in [`DieType::ALL`].
    pub fn index(&self) -> usize {
        match self {
            DieType::D4 => 0,
            DieType::D6 => 1,
            DieType::D8 => 2,
            DieType::D10 => 3,
            DieType::D12 => 4,
            DieType::D20 => 5,
        }
    }

    /// Next larger die, wrapping from d20 back to d4.
    pub fn next(&self) -> DieType {
        DieType::ALL[(self.index() + 1) % DieType::ALL.len()]
    }

    /// Next smaller die, wrapping from d4 up to d20.
    pub fn prev(&self) -> DieType {
        DieType::ALL[(self.index() + DieType::ALL.len() - 1) % DieType::ALL.len()]
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

impl FromStr for DieType {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        tag.strip_prefix('d')
            .and_then(|sides| sides.parse::<u32>().ok())
            .and_then(DieType::from_sides)
            .ok_or_else(|| DiceError::InvalidDieType(s.to_string()))
    }
}

/// Reroll policy for a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RollMode {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl RollMode {
    /// Whether a first draw of `value` on `die` gets rerolled under this mode.
    ///
    /// Advantage rerolls draws strictly below half the face count,
    /// disadvantage rerolls draws strictly above it.
    pub fn should_reroll(&self, die: DieType, value: u32) -> bool {
        match self {
            RollMode::Normal => false,
            RollMode::Advantage => value * 2 < die.sides(),
            RollMode::Disadvantage => value * 2 > die.sides(),
        }
    }

    /// Cycle Normal -> Advantage -> Disadvantage -> Normal.
    pub fn cycle(self) -> RollMode {
        match self {
            RollMode::Normal => RollMode::Advantage,
            RollMode::Advantage => RollMode::Disadvantage,
            RollMode::Disadvantage => RollMode::Normal,
        }
    }
}

impl fmt::Display for RollMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RollMode::Normal => "Normal",
            RollMode::Advantage => "Advantage",
            RollMode::Disadvantage => "Disadvantage",
        };
        write!(f, "{name}")
    }
}

impl FromStr for RollMode {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "n" => Ok(RollMode::Normal),
            "advantage" | "adv" | "a" => Ok(RollMode::Advantage),
            "disadvantage" | "dis" | "d" => Ok(RollMode::Disadvantage),
            _ => Err(DiceError::InvalidRollMode(s.to_string())),
        }
    }
}

/// A source of face values.
///
/// Implemented for every [`rand::Rng`], so a seeded `StdRng` gives
/// reproducible rolls. Implementations must return a value in
/// `1..=die.sides()`.
pub trait FaceSource {
    fn next_face(&mut self, die: DieType) -> u32;
}

impl<R: Rng + ?Sized> FaceSource for R {
    fn next_face(&mut self, die: DieType) -> u32 {
        self.gen_range(1..=die.sides())
    }
}

/// One realized roll of one die.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieResult {
    pub id: Uuid,
    pub die_type: DieType,
    pub faces: u32,
    pub value: u32,
    pub is_critical: bool,
    pub multiplier: f64,
    #[serde(default)]
    pub was_rerolled: bool,
    /// The first draw, kept only when it was rerolled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<u32>,
}

impl DieResult {
    /// Build the result for a die whose final value is known.
    ///
    /// `original_value` is the discarded first draw, if there was a reroll.
    pub fn settle(die_type: DieType, value: u32, original_value: Option<u32>) -> Self {
        let faces = die_type.sides();
        let is_critical = value == faces;
        Self {
            id: Uuid::new_v4(),
            die_type,
            faces,
            value,
            is_critical,
            multiplier: if is_critical {
                die_type.crit_multiplier()
            } else {
                1.0
            },
            was_rerolled: original_value.is_some(),
            original_value,
        }
    }
}

impl fmt::Display for DieResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.die_type, self.value)?;
        if self.is_critical {
            write!(f, "!")?;
        }
        if let Some(original) = self.original_value {
            write!(f, " (was {original})")?;
        }
        Ok(())
    }
}

/// Roll one die, applying the reroll policy of `mode`.
pub fn roll_die<F: FaceSource + ?Sized>(die: DieType, mode: RollMode, source: &mut F) -> DieResult {
    let first = source.next_face(die);
    if mode.should_reroll(die, first) {
        let value = source.next_face(die);
        debug!(%die, first, value, %mode, "rerolled die");
        DieResult::settle(die, value, Some(first))
    } else {
        DieResult::settle(die, first, None)
    }
}

/// Roll every die in `types`, in order, using the thread RNG.
pub fn roll_dice_set(types: &[DieType], mode: RollMode) -> Vec<DieResult> {
    roll_dice_set_with(types, mode, &mut rand::thread_rng())
}

/// Roll every die in `types`, in order, drawing faces from `source`.
pub fn roll_dice_set_with<F: FaceSource + ?Sized>(
    types: &[DieType],
    mode: RollMode,
    source: &mut F,
) -> Vec<DieResult> {
    types
        .iter()
        .map(|&die| roll_die(die, mode, source))
        .collect()
}

/// Parse die tags such as `"d6"`, rejecting anything outside the catalog.
pub fn parse_dice_tags<S: AsRef<str>>(tags: &[S]) -> Result<Vec<DieType>, DiceError> {
    tags.iter().map(|tag| tag.as_ref().parse()).collect()
}

/// Roll dice given by tag. Every tag is validated before anything is rolled.
pub fn roll_dice_tags<S: AsRef<str>>(
    tags: &[S],
    mode: RollMode,
) -> Result<Vec<DieResult>, DiceError> {
    let types = parse_dice_tags(tags)?;
    Ok(roll_dice_set(&types, mode))
}

/// Format a list of dice results for display.
pub fn dice_display(results: &[DieResult]) -> String {
    results
        .iter()
        .map(|r| format!("[{r}]"))
        .collect::<Vec<_>>()
        .join(" ")
}

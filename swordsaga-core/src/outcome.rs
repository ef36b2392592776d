//! Aggregation of individual dice into a roll outcome.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::dice::{DieResult, RollMode};

/// Which activity produced a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollSource {
    Hero,
    Master,
    Combat,
    Aim,
    Armor,
    Evade,
    Custom,
}

impl RollSource {
    pub fn name(&self) -> &'static str {
        match self {
            RollSource::Hero => "Hero",
            RollSource::Master => "Master",
            RollSource::Combat => "Combat",
            RollSource::Aim => "Aim",
            RollSource::Armor => "Armor",
            RollSource::Evade => "Evade",
            RollSource::Custom => "Custom",
        }
    }

    /// Heading shown above the final total of a roll from this source.
    pub fn result_caption(&self) -> &'static str {
        match self {
            RollSource::Armor => "Final Damage",
            RollSource::Evade => "Evasion Resolve",
            RollSource::Aim => "Aim Result",
            RollSource::Master => "Master Result",
            _ => "Hero Result",
        }
    }
}

impl fmt::Display for RollSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sum, combined multiplier and final total of a set of dice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollTotals {
    pub base_sum: u64,
    pub total_multiplier: f64,
    pub final_total: u64,
}

/// Reduce dice results to their totals.
///
/// The empty set yields a sum of 0, a multiplier of 1 and a total of 0.
pub fn calculate_roll(results: &[DieResult]) -> RollTotals {
    let base_sum = results
        .iter()
        .fold(0u64, |sum, r| sum.saturating_add(u64::from(r.value)));
    let total_multiplier: f64 = results.iter().map(|r| r.multiplier).product();
    RollTotals {
        base_sum,
        total_multiplier,
        final_total: (base_sum as f64 * total_multiplier).floor() as u64,
    }
}

/// The recorded outcome of one roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollSummary {
    pub id: Uuid,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub label: String,
    pub dice: Vec<DieResult>,
    pub mode: RollMode,
    pub base_sum: u64,
    pub total_multiplier: f64,
    pub final_total: u64,
    /// Tension dice added after the roll, oldest first.
    #[serde(default)]
    pub tension_dice: Vec<DieResult>,
    pub source: RollSource,
}

impl RollSummary {
    pub fn new(
        label: impl Into<String>,
        source: RollSource,
        mode: RollMode,
        dice: Vec<DieResult>,
    ) -> Self {
        let totals = calculate_roll(&dice);
        Self {
            id: Uuid::new_v4(),
            timestamp: now_millis(),
            label: label.into(),
            dice,
            mode,
            base_sum: totals.base_sum,
            total_multiplier: totals.total_multiplier,
            final_total: totals.final_total,
            tension_dice: Vec::new(),
            source,
        }
    }

    pub fn crit_count(&self) -> usize {
        self.dice.iter().filter(|d| d.is_critical).count()
    }

    pub fn reroll_count(&self) -> usize {
        self.dice.iter().filter(|d| d.was_rerolled).count()
    }

    /// One-line arithmetic breakdown, e.g. `14 x3 = 42`.
    pub fn breakdown(&self) -> String {
        if self.total_multiplier == 1.0 && self.tension_dice.is_empty() {
            format!("{} = {}", self.base_sum, self.final_total)
        } else if self.tension_dice.is_empty() {
            format!(
                "{} x{} = {}",
                self.base_sum, self.total_multiplier, self.final_total
            )
        } else {
            let tension: Vec<String> = self
                .tension_dice
                .iter()
                .map(|d| d.value.to_string())
                .collect();
            format!(
                "{} x{} = {} (tension {})",
                self.base_sum,
                self.total_multiplier,
                self.final_total,
                tension.join(", ")
            )
        }
    }
}

impl fmt::Display for RollSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.label,
            self.final_total,
            crate::dice::dice_display(&self.dice)
        )
    }
}

fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

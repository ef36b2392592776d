//! Tension escalation of a finished roll.
//!
//! A tension die is one extra d6 rolled after the fact. Its face maps to a
//! multiplier through a fixed table, and the multiplier compounds onto the
//! already floored final total.

use tracing::debug;

use crate::dice::{roll_die, DieResult, DieType, FaceSource, RollMode};
use crate::outcome::RollSummary;

/// The die rolled for tension.
pub const TENSION_DIE: DieType = DieType::D6;

/// Multiplier for a tension die face. A six counts as three.
///
/// `face` must be a d6 face.
pub fn tension_multiplier(face: u32) -> u32 {
    debug_assert!((1..=6).contains(&face), "tension face out of range: {face}");
    match face {
        1 => 1,
        2 => 2,
        3 => 3,
        4 => 4,
        5 => 5,
        6 => 3,
        // Unreachable for a d6; release builds treat it as no escalation.
        _ => 1,
    }
}

/// Escalate `summary` with a tension die from the thread RNG.
pub fn escalate_with_tension(summary: RollSummary) -> RollSummary {
    escalate_with_tension_using(summary, &mut rand::thread_rng())
}

/// Escalate `summary` with a tension die drawn from `source`.
///
/// Tension is never subject to advantage or disadvantage.
pub fn escalate_with_tension_using<F: FaceSource + ?Sized>(
    summary: RollSummary,
    source: &mut F,
) -> RollSummary {
    let die = roll_die(TENSION_DIE, RollMode::Normal, source);
    apply_tension(summary, die)
}

/// Apply an already rolled tension die to `summary`.
pub fn apply_tension(mut summary: RollSummary, die: DieResult) -> RollSummary {
    let multiplier = tension_multiplier(die.value);
    summary.total_multiplier *= f64::from(multiplier);
    summary.final_total = summary.final_total.saturating_mul(u64::from(multiplier));
    debug!(
        face = die.value,
        multiplier,
        final_total = summary.final_total,
        "applied tension"
    );
    summary.tension_dice.push(die);
    summary
}

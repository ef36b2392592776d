//! Reading finished rolls against each other.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dice::DieResult;
use crate::outcome::RollSummary;

/// Hero roll against the master's roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContestOutcome {
    Win,
    Loss,
}

impl fmt::Display for ContestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContestOutcome::Win => write!(f, "WIN"),
            ContestOutcome::Loss => write!(f, "LOSS"),
        }
    }
}

/// The hero wins ties.
pub fn contest(hero: &RollSummary, master: &RollSummary) -> ContestOutcome {
    if hero.final_total >= master.final_total {
        ContestOutcome::Win
    } else {
        ContestOutcome::Loss
    }
}

/// Damage left over after an armor roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorOutcome {
    pub incoming_damage: u64,
    pub divisor: u64,
    pub final_damage: u64,
    pub dice: Vec<DieResult>,
}

/// Divide incoming damage by the armor total (at least 1), rounding to nearest.
pub fn armor_outcome(incoming_damage: u64, armor: &RollSummary) -> ArmorOutcome {
    let divisor = armor.final_total.max(1);
    let final_damage = (incoming_damage as f64 / divisor as f64).round() as u64;
    ArmorOutcome {
        incoming_damage,
        divisor,
        final_damage,
        dice: armor.dice.clone(),
    }
}

/// Evade roll against an attacker's aim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvadeOutcome {
    Dodged,
    Hit,
}

impl fmt::Display for EvadeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvadeOutcome::Dodged => write!(f, "DODGED"),
            EvadeOutcome::Hit => write!(f, "HIT"),
        }
    }
}

/// Meeting the aim exactly still dodges.
pub fn evade_outcome(aim_to_beat: u64, evade: &RollSummary) -> EvadeOutcome {
    if evade.final_total >= aim_to_beat {
        EvadeOutcome::Dodged
    } else {
        EvadeOutcome::Hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::DieType;
    use crate::outcome::RollSource;
    use crate::testing::fixed_summary;

    fn total(source: RollSource, value: u32) -> RollSummary {
        // d20 below 20 never crits, so the total is the face.
        fixed_summary("t", source, &[(DieType::D20, value)])
    }

    #[test]
    fn test_contest_ties_go_to_hero() {
        let master = total(RollSource::Master, 12);
        assert_eq!(contest(&total(RollSource::Hero, 12), &master), ContestOutcome::Win);
        assert_eq!(contest(&total(RollSource::Hero, 13), &master), ContestOutcome::Win);
        assert_eq!(contest(&total(RollSource::Hero, 11), &master), ContestOutcome::Loss);
    }

    #[test]
    fn test_armor_divides_and_rounds() {
        let armor = total(RollSource::Armor, 6);
        let outcome = armor_outcome(20, &armor);
        assert_eq!(outcome.divisor, 6);
        assert_eq!(outcome.final_damage, 3);
        assert_eq!(outcome.dice.len(), 1);

        // 15 / 6 = 2.5 rounds up.
        assert_eq!(armor_outcome(15, &armor).final_damage, 3);
        assert_eq!(armor_outcome(14, &armor).final_damage, 2);
    }

    #[test]
    fn test_armor_divisor_at_least_one() {
        let mut armor = total(RollSource::Armor, 1);
        armor.final_total = 0;
        let outcome = armor_outcome(9, &armor);
        assert_eq!(outcome.divisor, 1);
        assert_eq!(outcome.final_damage, 9);
    }

    #[test]
    fn test_evade_ties_dodge() {
        let evade = total(RollSource::Evade, 10);
        assert_eq!(evade_outcome(10, &evade), EvadeOutcome::Dodged);
        assert_eq!(evade_outcome(9, &evade), EvadeOutcome::Dodged);
        assert_eq!(evade_outcome(11, &evade), EvadeOutcome::Hit);
    }
}

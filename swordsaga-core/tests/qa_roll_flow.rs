//! QA tests for full roll flows through `RollSession`.
//!
//! Faces are scripted so every total below is exact.
//! Run with: `cargo test -p swordsaga-core --test qa_roll_flow`

use swordsaga_core::testing::scripted_session;
use swordsaga_core::{
    ContestOutcome, DieType, DifficultyLevel, EvadeOutcome, RollMode, RollSession, RollSource,
    SessionConfig, Side, LEDGER_CAPACITY,
};
use tempfile::TempDir;

// =============================================================================
// Hero, master and tension
// =============================================================================

#[test]
fn test_hero_roll_with_crit_and_tension() {
    let mut session = scripted_session([5, 3, 6], "unused.json");
    session.hero.bonus_die = Some(DieType::D4);
    session.hero.proficiency = true;

    let roll = session.roll(RollSource::Hero).expect("hero roll");
    assert_eq!(roll.label, "Heroic Resolve");
    assert_eq!(roll.base_sum, 14);
    assert_eq!(roll.total_multiplier, 3.0);
    assert_eq!(roll.final_total, 42);

    session.source_mut().push([6]);
    let escalated = session.add_tension(Side::Player).expect("tension");
    assert_eq!(escalated.final_total, 126);
    assert_eq!(escalated.id, roll.id);
    assert_eq!(session.last_roll().map(|r| r.final_total), Some(126));

    // The ledger holds the escalated value, not a second entry.
    assert_eq!(session.ledger().len(), 1);
    assert_eq!(session.ledger().latest().map(|r| r.final_total), Some(126));

    session.source_mut().push([4]);
    let again = session.add_tension(Side::Player).expect("tension");
    assert_eq!(again.final_total, 504);
    assert_eq!(again.tension_dice.len(), 2);
}

#[test]
fn test_master_roll_and_contest() {
    let mut session = scripted_session([12, 10, 2, 1], "unused.json");
    session.roll(RollSource::Hero).expect("hero roll");

    session.difficulty = DifficultyLevel::Hard;
    let master = session.roll(RollSource::Master).expect("master roll");
    assert_eq!(master.label, "Master: d20 + d4 + d6");
    assert_eq!(master.dice.len(), 3);
    assert_eq!(master.final_total, 13);

    // The master roll lands in its own slot.
    assert_eq!(session.last_roll().map(|r| r.final_total), Some(12));
    assert_eq!(session.contest(), Some(ContestOutcome::Loss));

    session.source_mut().push([2]);
    session.add_tension(Side::Player);
    assert_eq!(session.contest(), Some(ContestOutcome::Win));
}

#[test]
fn test_advantage_reroll_recorded() {
    let mut session = scripted_session([3, 17], "unused.json");
    session.mode = RollMode::Advantage;

    let roll = session.roll(RollSource::Hero).expect("hero roll");
    assert_eq!(roll.mode, RollMode::Advantage);
    assert_eq!(roll.reroll_count(), 1);
    assert_eq!(roll.dice[0].original_value, Some(3));
    assert_eq!(roll.final_total, 17);
}

// =============================================================================
// Armor, evade and pools
// =============================================================================

#[test]
fn test_armor_roll_divides_damage() {
    let mut session = scripted_session([1, 2], "unused.json");
    session.mode = RollMode::Advantage;
    session.armor.add_charge();
    session.armor.incoming_damage = 20;

    let roll = session.roll(RollSource::Armor).expect("armor roll");
    assert_eq!(roll.mode, RollMode::Normal);
    assert_eq!(roll.reroll_count(), 0);
    assert_eq!(roll.final_total, 3);

    let outcome = session.armor_outcome().expect("armor outcome");
    assert_eq!(outcome.divisor, 3);
    assert_eq!(outcome.final_damage, 7);
    assert!(session.evade_outcome().is_none());
}

#[test]
fn test_evade_against_aim() {
    let mut session = scripted_session([4, 4, 1, 1], "unused.json");
    session.evade_pool.adjust(DieType::D6, 2);
    session.aim_to_beat = 8;

    session.roll(RollSource::Evade).expect("evade roll");
    assert_eq!(session.evade_outcome(), Some(EvadeOutcome::Dodged));

    session.roll(RollSource::Evade).expect("evade roll");
    assert_eq!(session.evade_outcome(), Some(EvadeOutcome::Hit));
    assert!(session.armor_outcome().is_none());
}

#[test]
fn test_combat_pool_with_surge() {
    let mut session = scripted_session([2, 7, 1], "unused.json");
    session.combat_pool.increment(DieType::D8);
    session.combat_pool.increment(DieType::D4);
    session.add_surge();

    let roll = session.roll(RollSource::Combat).expect("combat roll");
    let dice: Vec<DieType> = roll.dice.iter().map(|d| d.die_type).collect();
    assert_eq!(dice, vec![DieType::D4, DieType::D8, DieType::D6]);
    assert_eq!(roll.final_total, 10);
}

#[test]
fn test_aim_and_custom_rolls() {
    let mut session = scripted_session([9, 11], "unused.json");
    session.aim_pool.increment(DieType::D10);
    let aim = session.roll(RollSource::Aim).expect("aim roll");
    assert_eq!(aim.label, "Aiming for the Mark");
    assert_eq!(aim.final_total, 9);

    session.custom_dice = vec![DieType::D12];
    let custom = session.roll(RollSource::Custom).expect("custom roll");
    assert_eq!(custom.source, RollSource::Custom);
    assert_eq!(custom.final_total, 11);
}

// =============================================================================
// History
// =============================================================================

#[test]
fn test_ledger_caps_history() {
    let mut session = scripted_session(std::iter::repeat(2).take(40), "unused.json");
    session.custom_dice = vec![DieType::D20];

    let first = session.roll(RollSource::Custom).expect("roll");
    for _ in 0..LEDGER_CAPACITY {
        session.roll(RollSource::Custom);
    }

    assert_eq!(session.ledger().len(), LEDGER_CAPACITY);
    assert!(session.ledger().find(first.id).is_none());
}

#[tokio::test]
async fn test_seeded_sessions_repeat() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = SessionConfig::new()
        .with_presets_path(temp_dir.path().join("presets.json"))
        .with_seed(1234);

    let mut a = RollSession::new(config.clone()).await;
    let mut b = RollSession::new(config).await;
    for session in [&mut a, &mut b] {
        session.difficulty = DifficultyLevel::AlmostImpossible;
        session.mode = RollMode::Advantage;
    }

    for _ in 0..20 {
        let ra = a.roll(RollSource::Master).expect("roll");
        let rb = b.roll(RollSource::Master).expect("roll");
        let faces_a: Vec<u32> = ra.dice.iter().map(|d| d.value).collect();
        let faces_b: Vec<u32> = rb.dice.iter().map(|d| d.value).collect();
        assert_eq!(faces_a, faces_b);
        assert_eq!(ra.final_total, rb.final_total);
    }
}

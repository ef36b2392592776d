//! RollSession - the primary public API for Sword Saga rolls.
//!
//! A session holds everything the player has staged between rolls (hero
//! setup, dice pools, armor, surge dice, roll mode), the latest player and
//! master results, the roll ledger and the stat presets. It wraps the dice
//! engine so front ends only pick a [`RollSource`] and render the outcome.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::dice::{roll_dice_set_with, DiceError, DieType, FaceSource, RollMode};
use crate::difficulty::DifficultyLevel;
use crate::ledger::RollLedger;
use crate::outcome::{RollSource, RollSummary};
use crate::pool::{DicePool, MAX_DICE};
use crate::presets::{PersistError, PresetStore, Stat, StatPreset};
use crate::resolution::{
    armor_outcome, contest, evade_outcome, ArmorOutcome, ContestOutcome, EvadeOutcome,
};
use crate::tension::escalate_with_tension_using;

/// Preset file used when nothing else is configured.
pub const DEFAULT_PRESETS_PATH: &str = "swordsaga_presets.json";

/// Errors from RollSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Dice error: {0}")]
    Dice(#[from] DiceError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// Configuration for creating a roll session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Where stat presets are stored.
    pub presets_path: PathBuf,

    /// Seed for a reproducible session.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            presets_path: PathBuf::from(DEFAULT_PRESETS_PATH),
            seed: None,
        }
    }

    /// Read `SWORDSAGA_PRESETS` and `SWORDSAGA_SEED`.
    ///
    /// An unparsable seed is ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(path) = std::env::var("SWORDSAGA_PRESETS") {
            if !path.trim().is_empty() {
                config.presets_path = PathBuf::from(path);
            }
        }

        if let Ok(seed) = std::env::var("SWORDSAGA_SEED") {
            match seed.trim().parse() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => warn!(%seed, "ignoring invalid SWORDSAGA_SEED"),
            }
        }

        config
    }

    /// Set the preset file path.
    pub fn with_presets_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.presets_path = path.into();
        self
    }

    /// Seed the session's RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Which last-result slot an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Master,
}

/// Dice for a hero roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroSetup {
    pub base_die: DieType,
    pub bonus_die: Option<DieType>,
    /// Proficiency adds a d6.
    pub proficiency: bool,
}

impl Default for HeroSetup {
    fn default() -> Self {
        Self {
            base_die: DieType::D20,
            bonus_die: None,
            proficiency: false,
        }
    }
}

/// Armor staged for a defense roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmorSetup {
    pub die: DieType,
    charges: u32,
    pub incoming_damage: u64,
}

impl Default for ArmorSetup {
    fn default() -> Self {
        Self {
            die: DieType::D8,
            charges: 1,
            incoming_damage: 0,
        }
    }
}

impl ArmorSetup {
    /// Number of armor dice rolled, between one and [`MAX_DICE`].
    pub fn charges(&self) -> u32 {
        self.charges
    }

    pub fn set_charges(&mut self, charges: u32) {
        self.charges = charges.clamp(1, MAX_DICE);
    }

    pub fn add_charge(&mut self) {
        self.set_charges(self.charges.saturating_add(1));
    }

    pub fn remove_charge(&mut self) {
        self.set_charges(self.charges.saturating_sub(1));
    }
}

/// A Sword Saga rolling session.
pub struct RollSession<F = StdRng> {
    source: F,

    pub hero: HeroSetup,
    active_stat: Option<Stat>,
    pub mode: RollMode,
    surge: u32,
    pub difficulty: DifficultyLevel,

    pub combat_pool: DicePool,
    pub aim_pool: DicePool,
    pub evade_pool: DicePool,
    pub armor: ArmorSetup,
    pub aim_to_beat: u64,
    pub custom_dice: Vec<DieType>,

    last_roll: Option<RollSummary>,
    last_master_roll: Option<RollSummary>,
    ledger: RollLedger,
    presets: PresetStore,
}

impl RollSession<StdRng> {
    /// Create a session, loading presets from the configured file.
    pub async fn new(config: SessionConfig) -> Self {
        let presets = PresetStore::load(&config.presets_path).await;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(seed = ?config.seed, presets = presets.len(), "roll session started");
        Self::with_source(rng, presets)
    }
}

impl<F: FaceSource> RollSession<F> {
    /// Create a session drawing faces from `source`.
    pub fn with_source(source: F, presets: PresetStore) -> Self {
        Self {
            source,
            hero: HeroSetup::default(),
            active_stat: None,
            mode: RollMode::Normal,
            surge: 0,
            difficulty: DifficultyLevel::Normal,
            combat_pool: DicePool::new(),
            aim_pool: DicePool::new(),
            evade_pool: DicePool::new(),
            armor: ArmorSetup::default(),
            aim_to_beat: 0,
            custom_dice: Vec::new(),
            last_roll: None,
            last_master_roll: None,
            ledger: RollLedger::new(),
            presets,
        }
    }

    /// The dice a roll from `source` would use right now.
    pub fn dice_for(&self, source: RollSource) -> Vec<DieType> {
        let mut dice = match source {
            RollSource::Hero => {
                let mut dice = vec![self.hero.base_die];
                dice.extend(self.hero.bonus_die);
                if self.hero.proficiency {
                    dice.push(DieType::D6);
                }
                dice
            }
            RollSource::Master => return self.difficulty.dice().to_vec(),
            RollSource::Combat => self.combat_pool.dice(),
            RollSource::Aim => self.aim_pool.dice(),
            RollSource::Evade => self.evade_pool.dice(),
            RollSource::Armor => vec![self.armor.die; self.armor.charges() as usize],
            RollSource::Custom => self.custom_dice.clone(),
        };
        dice.extend(std::iter::repeat(DieType::D6).take(self.surge as usize));
        dice
    }

    /// Label recorded for a roll from `source`.
    pub fn label_for(&self, source: RollSource) -> String {
        match source {
            RollSource::Hero => "Heroic Resolve".to_string(),
            RollSource::Master => format!("Master: {}", self.difficulty.notation()),
            RollSource::Combat => "Combat Assault".to_string(),
            RollSource::Aim => "Aiming for the Mark".to_string(),
            RollSource::Armor => "Armor Defense".to_string(),
            RollSource::Evade => "Evasive Maneuver".to_string(),
            RollSource::Custom => "Custom Roll".to_string(),
        }
    }

    /// Armor always rolls without advantage or disadvantage.
    pub fn mode_for(&self, source: RollSource) -> RollMode {
        match source {
            RollSource::Armor => RollMode::Normal,
            _ => self.mode,
        }
    }

    /// Roll the staged dice for `source` and record the outcome.
    ///
    /// Returns `None` without recording anything when no dice are staged.
    pub fn roll(&mut self, source: RollSource) -> Option<RollSummary> {
        let dice = self.dice_for(source);
        if dice.is_empty() {
            debug!(%source, "nothing staged, skipping roll");
            return None;
        }

        let mode = self.mode_for(source);
        let results = roll_dice_set_with(&dice, mode, &mut self.source);
        let summary = RollSummary::new(self.label_for(source), source, mode, results);
        info!(
            label = %summary.label,
            dice = summary.dice.len(),
            %mode,
            final_total = summary.final_total,
            "rolled"
        );

        self.ledger.record(summary.clone());
        match source {
            RollSource::Master => self.last_master_roll = Some(summary.clone()),
            _ => self.last_roll = Some(summary.clone()),
        }
        Some(summary)
    }

    /// Escalate the last result on `side` with a tension die.
    ///
    /// The ledger entry for that roll is replaced with the escalated value.
    /// Returns `None` if there is no result to escalate.
    pub fn add_tension(&mut self, side: Side) -> Option<RollSummary> {
        let current = match side {
            Side::Player => self.last_roll.take(),
            Side::Master => self.last_master_roll.take(),
        }?;

        let escalated = escalate_with_tension_using(current, &mut self.source);
        if self.ledger.replace(escalated.id, escalated.clone()).is_none() {
            debug!(id = %escalated.id, "escalated roll no longer in ledger");
        }
        info!(
            label = %escalated.label,
            final_total = escalated.final_total,
            tension = escalated.tension_dice.len(),
            "added tension"
        );

        match side {
            Side::Player => self.last_roll = Some(escalated.clone()),
            Side::Master => self.last_master_roll = Some(escalated.clone()),
        }
        Some(escalated)
    }

    pub fn surge(&self) -> u32 {
        self.surge
    }

    pub fn add_surge(&mut self) {
        self.set_surge(self.surge.saturating_add(1));
    }

    pub fn remove_surge(&mut self) {
        self.surge = self.surge.saturating_sub(1);
    }

    /// Set the surge dice, clamped to [`MAX_DICE`].
    pub fn set_surge(&mut self, surge: u32) {
        self.surge = surge.min(MAX_DICE);
    }

    pub fn active_stat(&self) -> Option<Stat> {
        self.active_stat
    }

    /// Select a stat and load its preset into the hero setup.
    ///
    /// Selecting the active stat again deselects it and restores a plain d20.
    pub fn select_stat(&mut self, stat: Stat) {
        let preset = if self.active_stat == Some(stat) {
            self.active_stat = None;
            StatPreset::default()
        } else {
            self.active_stat = Some(stat);
            self.presets.preset_or_default(stat)
        };
        self.hero.base_die = preset.base_die;
        self.hero.bonus_die = preset.bonus_die;
    }

    /// Whether the hero dice differ from the active stat's stored preset.
    pub fn is_dirty(&self) -> bool {
        self.active_stat
            .map(|stat| {
                let preset = self.presets.preset_or_default(stat);
                preset.base_die != self.hero.base_die || preset.bonus_die != self.hero.bonus_die
            })
            .unwrap_or(false)
    }

    /// Store the hero dice as the active stat's preset and persist all presets.
    ///
    /// Returns `false` without saving when no stat is selected.
    pub async fn save_current_preset(&mut self) -> Result<bool, SessionError> {
        let Some(stat) = self.active_stat else {
            return Ok(false);
        };
        self.presets.set(
            stat,
            StatPreset {
                base_die: self.hero.base_die,
                bonus_die: self.hero.bonus_die,
            },
        );
        self.presets.save().await?;
        Ok(true)
    }

    /// Reset everything staged, and the last results.
    pub fn clear_staged(&mut self) {
        self.combat_pool.clear();
        self.aim_pool.clear();
        self.evade_pool.clear();
        self.custom_dice.clear();
        self.surge = 0;
        self.last_roll = None;
        self.last_master_roll = None;
        self.mode = RollMode::Normal;
        self.armor.set_charges(1);
        self.armor.incoming_damage = 0;
        self.aim_to_beat = 0;
        self.active_stat = None;
        self.hero = HeroSetup::default();
    }

    /// Delete the presets, empty the ledger and clear everything staged.
    pub async fn hard_reset(&mut self) -> Result<(), SessionError> {
        self.presets.reset().await?;
        self.ledger.clear();
        self.clear_staged();
        info!("hard reset");
        Ok(())
    }

    pub fn last_roll(&self) -> Option<&RollSummary> {
        self.last_roll.as_ref()
    }

    pub fn last_master_roll(&self) -> Option<&RollSummary> {
        self.last_master_roll.as_ref()
    }

    /// Hero result against master result, when the last player roll was a
    /// hero roll and the master has rolled.
    pub fn contest(&self) -> Option<ContestOutcome> {
        let hero = self
            .last_roll
            .as_ref()
            .filter(|r| r.source == RollSource::Hero)?;
        Some(contest(hero, self.last_master_roll.as_ref()?))
    }

    /// Damage outcome, when the last player roll was an armor roll.
    pub fn armor_outcome(&self) -> Option<ArmorOutcome> {
        self.last_roll
            .as_ref()
            .filter(|r| r.source == RollSource::Armor)
            .map(|r| armor_outcome(self.armor.incoming_damage, r))
    }

    /// Evasion outcome, when the last player roll was an evade roll.
    pub fn evade_outcome(&self) -> Option<EvadeOutcome> {
        self.last_roll
            .as_ref()
            .filter(|r| r.source == RollSource::Evade)
            .map(|r| evade_outcome(self.aim_to_beat, r))
    }

    pub fn ledger(&self) -> &RollLedger {
        &self.ledger
    }

    pub fn presets(&self) -> &PresetStore {
        &self.presets
    }

    /// Mutable access to the face source, e.g. to queue scripted faces.
    pub fn source_mut(&mut self) -> &mut F {
        &mut self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::scripted_session;

    #[test]
    fn test_session_config() {
        let config = SessionConfig::new()
            .with_presets_path("/tmp/presets.json")
            .with_seed(42);

        assert_eq!(config.presets_path, PathBuf::from("/tmp/presets.json"));
        assert_eq!(config.seed, Some(42));
        assert_eq!(
            SessionConfig::default().presets_path,
            PathBuf::from(DEFAULT_PRESETS_PATH)
        );
    }

    #[test]
    fn test_hero_dice_composition() {
        let mut session = scripted_session([], "unused.json");
        session.hero.bonus_die = Some(DieType::D8);
        session.hero.proficiency = true;
        session.add_surge();
        session.add_surge();

        assert_eq!(
            session.dice_for(RollSource::Hero),
            vec![DieType::D20, DieType::D8, DieType::D6, DieType::D6, DieType::D6]
        );
    }

    #[test]
    fn test_master_ignores_surge() {
        let mut session = scripted_session([], "unused.json");
        session.difficulty = DifficultyLevel::Challenge;
        session.add_surge();
        assert_eq!(
            session.dice_for(RollSource::Master),
            vec![DieType::D20, DieType::D4]
        );
        assert_eq!(session.label_for(RollSource::Master), "Master: d20 + d4");
    }

    #[test]
    fn test_armor_charges_floor_and_normal_mode() {
        let mut session = scripted_session([], "unused.json");
        session.armor.remove_charge();
        assert_eq!(session.armor.charges(), 1);
        session.armor.add_charge();
        session.armor.die = DieType::D12;
        assert_eq!(
            session.dice_for(RollSource::Armor),
            vec![DieType::D12, DieType::D12]
        );

        session.mode = RollMode::Advantage;
        assert_eq!(session.mode_for(RollSource::Armor), RollMode::Normal);
        assert_eq!(session.mode_for(RollSource::Evade), RollMode::Advantage);
    }

    #[test]
    fn test_staged_counts_are_capped() {
        let mut session = scripted_session([], "unused.json");
        session.set_surge(u32::MAX);
        session.add_surge();
        assert_eq!(session.surge(), MAX_DICE);

        session.armor.set_charges(u32::MAX);
        session.armor.add_charge();
        assert_eq!(session.armor.charges(), MAX_DICE);
        // Charges plus surge dice.
        assert_eq!(
            session.dice_for(RollSource::Armor).len(),
            2 * MAX_DICE as usize
        );

        session.combat_pool.set(DieType::D20, u32::MAX);
        let summary = session.roll(RollSource::Combat).expect("combat roll");
        assert_eq!(summary.dice.len(), 2 * MAX_DICE as usize);
    }

    #[test]
    fn test_contest_needs_hero_roll() {
        let mut session = scripted_session([3, 10, 12], "unused.json");
        session.roll(RollSource::Armor);
        session.roll(RollSource::Master);
        assert!(session.last_roll().is_some());
        assert!(session.last_master_roll().is_some());
        assert_eq!(session.contest(), None);

        session.roll(RollSource::Hero);
        assert_eq!(session.contest(), Some(ContestOutcome::Win));
    }

    #[test]
    fn test_empty_pool_skips_roll() {
        let mut session = scripted_session([], "unused.json");
        assert!(session.roll(RollSource::Combat).is_none());
        assert!(session.ledger().is_empty());
        assert!(session.last_roll().is_none());
    }

    #[test]
    fn test_tension_without_roll_is_none() {
        let mut session = scripted_session([6], "unused.json");
        assert!(session.add_tension(Side::Player).is_none());
        assert!(session.add_tension(Side::Master).is_none());
        assert_eq!(session.source_mut().remaining(), 1);
    }

    #[test]
    fn test_select_stat_toggles() {
        let mut session = scripted_session([], "unused.json");
        session.hero.base_die = DieType::D4;

        session.select_stat(Stat::Strength);
        assert_eq!(session.active_stat(), Some(Stat::Strength));
        assert_eq!(session.hero.base_die, DieType::D20);
        assert!(!session.is_dirty());

        session.hero.bonus_die = Some(DieType::D6);
        assert!(session.is_dirty());

        session.select_stat(Stat::Strength);
        assert_eq!(session.active_stat(), None);
        assert_eq!(session.hero.bonus_die, None);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_clear_staged() {
        let mut session = scripted_session([4, 4], "unused.json");
        session.combat_pool.increment(DieType::D4);
        session.roll(RollSource::Combat);
        session.add_surge();
        session.armor.add_charge();
        session.armor.incoming_damage = 12;
        session.aim_to_beat = 7;
        session.mode = RollMode::Disadvantage;
        session.hero.proficiency = true;

        session.clear_staged();

        assert!(session.combat_pool.is_empty());
        assert_eq!(session.surge(), 0);
        assert_eq!(session.armor.charges(), 1);
        assert_eq!(session.armor.incoming_damage, 0);
        assert_eq!(session.aim_to_beat, 0);
        assert_eq!(session.mode, RollMode::Normal);
        assert_eq!(session.hero, HeroSetup::default());
        assert!(session.last_roll().is_none());
        // History survives a clear.
        assert_eq!(session.ledger().len(), 1);
    }
}

//! Sword Saga dice resolution engine.
//!
//! This crate provides:
//! - Die rolling with advantage/disadvantage rerolls and critical multipliers
//! - Aggregation of dice into a single total with an auditable breakdown
//! - Difficulty tiers, tension escalation and a bounded roll history
//! - Persisted stat presets and a `RollSession` tying it all together
//!
//! # Quick Start
//!
//! ```ignore
//! use swordsaga_core::{RollSession, RollSource, SessionConfig, Side};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut session = RollSession::new(SessionConfig::from_env()).await;
//!     session.hero.proficiency = true;
//!
//!     if let Some(roll) = session.roll(RollSource::Hero) {
//!         println!("{roll}");
//!     }
//!     if let Some(escalated) = session.add_tension(Side::Player) {
//!         println!("with tension: {}", escalated.final_total);
//!     }
//! }
//! ```

pub mod dice;
pub mod difficulty;
pub mod ledger;
pub mod outcome;
pub mod pool;
pub mod presets;
pub mod resolution;
pub mod session;
pub mod tension;
pub mod testing;

// Primary public API
pub use dice::{
    parse_dice_tags, roll_dice_set, roll_dice_set_with, roll_dice_tags, DiceError, DieResult,
    DieType, FaceSource, RollMode,
};
pub use difficulty::{difficulty_dice, DifficultyLevel};
pub use ledger::{RollLedger, LEDGER_CAPACITY};
pub use outcome::{calculate_roll, RollSource, RollSummary, RollTotals};
pub use pool::{DicePool, MAX_DICE};
pub use presets::{PersistError, PresetStore, Stat, StatPreset};
pub use resolution::{ArmorOutcome, ContestOutcome, EvadeOutcome};
pub use session::{
    ArmorSetup, HeroSetup, RollSession, SessionConfig, SessionError, Side, DEFAULT_PRESETS_PATH,
};
pub use tension::{escalate_with_tension, tension_multiplier};

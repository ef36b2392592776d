//! Stat presets persisted between sessions.
//!
//! Each character stat can remember the base and bonus die the player
//! usually rolls for it. The record is a flat JSON object keyed by stat id:
//!
//! ```json
//! { "STR": { "baseDie": "d8", "bonusDie": "none" } }
//! ```
//!
//! It is read once at startup and rewritten wholesale on every save. A
//! missing or corrupt file never fails the load; it simply yields no presets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::dice::{DiceError, DieType};

/// Errors from preset persistence.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Character stats that can carry a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stat {
    #[serde(rename = "STR")]
    Strength,
    #[serde(rename = "DEX")]
    Dexterity,
    #[serde(rename = "MAS")]
    Mastery,
    #[serde(rename = "KNO")]
    Knowledge,
    #[serde(rename = "RAP")]
    Rapport,
    #[serde(rename = "MEN")]
    Menace,
    #[serde(rename = "INT")]
    Introversion,
}

impl Stat {
    pub const ALL: [Stat; 7] = [
        Stat::Strength,
        Stat::Dexterity,
        Stat::Mastery,
        Stat::Knowledge,
        Stat::Rapport,
        Stat::Menace,
        Stat::Introversion,
    ];

    /// Short id used as the persisted key.
    pub fn id(&self) -> &'static str {
        match self {
            Stat::Strength => "STR",
            Stat::Dexterity => "DEX",
            Stat::Mastery => "MAS",
            Stat::Knowledge => "KNO",
            Stat::Rapport => "RAP",
            Stat::Menace => "MEN",
            Stat::Introversion => "INT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stat::Strength => "Strength",
            Stat::Dexterity => "Dexterity",
            Stat::Mastery => "Mastery",
            Stat::Knowledge => "Knowledge",
            Stat::Rapport => "Rapport",
            Stat::Menace => "Menace",
            Stat::Introversion => "Introversion",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Stat {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Stat::ALL
            .into_iter()
            .find(|stat| stat.id().eq_ignore_ascii_case(s) || stat.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| DiceError::InvalidStat(s.to_string()))
    }
}

/// The dice a stat rolls with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatPreset {
    pub base_die: DieType,
    /// `None` is persisted as `"none"`.
    #[serde(with = "bonus_die")]
    pub bonus_die: Option<DieType>,
}

impl Default for StatPreset {
    fn default() -> Self {
        Self {
            base_die: DieType::D20,
            bonus_die: None,
        }
    }
}

mod bonus_die {
    use super::DieType;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(die: &Option<DieType>, s: S) -> Result<S::Ok, S::Error> {
        match die {
            Some(die) => die.serialize(s),
            None => s.serialize_str("none"),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DieType>, D::Error> {
        let tag = String::deserialize(d)?;
        if tag.eq_ignore_ascii_case("none") {
            Ok(None)
        } else {
            tag.parse().map(Some).map_err(D::Error::custom)
        }
    }
}

/// Stat presets and the file they persist to.
#[derive(Debug, Clone)]
pub struct PresetStore {
    path: PathBuf,
    presets: BTreeMap<Stat, StatPreset>,
}

impl PresetStore {
    /// An empty store that will save to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            presets: BTreeMap::new(),
        }
    }

    /// Load presets from `path`, degrading to an empty store on any failure.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match fs::read_to_string(&path).await {
            Ok(content) => Self::from_json(path, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no preset file, starting empty");
                Self::new(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read presets, starting empty");
                Self::new(path)
            }
        }
    }

    /// Parse a preset record, discarding it entirely if malformed.
    pub fn from_json(path: impl Into<PathBuf>, content: &str) -> Self {
        let path = path.into();
        match serde_json::from_str::<BTreeMap<Stat, StatPreset>>(content) {
            Ok(presets) => {
                info!(path = %path.display(), count = presets.len(), "loaded presets");
                Self { path, presets }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding malformed presets");
                Self::new(path)
            }
        }
    }

    /// Rewrite the whole preset file.
    pub async fn save(&self) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(&self.presets)?;
        fs::write(&self.path, content).await?;
        info!(path = %self.path.display(), count = self.presets.len(), "saved presets");
        Ok(())
    }

    /// Forget every preset and delete the file.
    pub async fn reset(&mut self) -> Result<(), PersistError> {
        self.presets.clear();
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get(&self, stat: Stat) -> Option<&StatPreset> {
        self.presets.get(&stat)
    }

    /// The stored preset, or d20 with no bonus die.
    pub fn preset_or_default(&self, stat: Stat) -> StatPreset {
        self.get(stat).copied().unwrap_or_default()
    }

    pub fn set(&mut self, stat: Stat, preset: StatPreset) {
        self.presets.insert(stat, preset);
    }

    pub fn remove(&mut self, stat: Stat) -> Option<StatPreset> {
        self.presets.remove(&stat)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, &StatPreset)> {
        self.presets.iter().map(|(stat, preset)| (*stat, preset))
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

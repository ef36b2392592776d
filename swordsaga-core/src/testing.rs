//! Testing utilities for deterministic rolls.
//!
//! - `ScriptedFaces` feeds predetermined face values to the roll engine
//! - `scripted_session` builds a [`RollSession`] on top of it

use std::collections::VecDeque;
use std::path::Path;

use crate::dice::{DieResult, DieType, FaceSource, RollMode};
use crate::outcome::{RollSource, RollSummary};
use crate::presets::PresetStore;
use crate::session::RollSession;

/// A face source that returns scripted values in order.
///
/// Values outside the die's range are clamped into it. Once the script is
/// exhausted every draw lands on 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFaces {
    faces: VecDeque<u32>,
}

impl ScriptedFaces {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    /// Queue more faces after the current script.
    pub fn push(&mut self, faces: impl IntoIterator<Item = u32>) {
        self.faces.extend(faces);
    }

    /// Number of faces not yet drawn.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl FaceSource for ScriptedFaces {
    fn next_face(&mut self, die: DieType) -> u32 {
        self.faces
            .pop_front()
            .map(|face| face.clamp(1, die.sides()))
            .unwrap_or(1)
    }
}

/// A roll session drawing from `faces`, with an empty preset store at `presets_path`.
pub fn scripted_session(
    faces: impl IntoIterator<Item = u32>,
    presets_path: impl AsRef<Path>,
) -> RollSession<ScriptedFaces> {
    RollSession::with_source(
        ScriptedFaces::new(faces),
        PresetStore::new(presets_path.as_ref()),
    )
}

/// Build a summary from fixed `(die, value)` pairs without rerolls.
pub fn fixed_summary(label: &str, source: RollSource, dice: &[(DieType, u32)]) -> RollSummary {
    let results: Vec<DieResult> = dice
        .iter()
        .map(|&(die, value)| DieResult::settle(die, value, None))
        .collect();
    RollSummary::new(label, source, RollMode::Normal, results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_faces_in_order() {
        let mut faces = ScriptedFaces::new([3, 5]);
        assert_eq!(faces.next_face(DieType::D6), 3);
        assert_eq!(faces.next_face(DieType::D6), 5);
        assert_eq!(faces.remaining(), 0);
        assert_eq!(faces.next_face(DieType::D6), 1);
    }

    #[test]
    fn test_scripted_faces_clamp() {
        let mut faces = ScriptedFaces::new([0, 99]);
        assert_eq!(faces.next_face(DieType::D8), 1);
        assert_eq!(faces.next_face(DieType::D8), 8);
    }

    #[test]
    fn test_fixed_summary() {
        let summary = fixed_summary(
            "Fixed",
            RollSource::Custom,
            &[(DieType::D20, 5), (DieType::D4, 3), (DieType::D6, 6)],
        );
        assert_eq!(summary.final_total, 42);
    }
}

//! Derived ability scores for characters.
//!
//! Scores are an ephemeral view computed from the character id, never
//! persisted. The RNG is seeded by the id so the same character always rolls
//! the same sheet.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const SCORE_MIN: u8 = 10;
const SCORE_MAX: u8 = 18;

/// The classic six ability scores plus hit points and armor class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharacterAbilities {
    pub hp: u8,
    pub ac: u8,
    #[serde(rename = "str")]
    pub strength: u8,
    pub dex: u8,
    pub con: u8,
    #[serde(rename = "int")]
    pub intelligence: u8,
    pub wis: u8,
    pub cha: u8,
}

impl CharacterAbilities {
    /// Roll the sheet for a character. Deterministic per character id.
    #[must_use]
    pub fn for_character(character_id: i32) -> Self {
        #[allow(clippy::cast_sign_loss)]
        let mut rng = StdRng::seed_from_u64(character_id as u64);
        let mut roll = || rng.gen_range(SCORE_MIN..=SCORE_MAX);
        Self {
            hp: roll(),
            ac: roll(),
            strength: roll(),
            dex: roll(),
            con: roll(),
            intelligence: roll(),
            wis: roll(),
            cha: roll(),
        }
    }
}

//! Testing utilities for progression scenarios.
//!
//! This module provides:
//! - Character fixtures built through the real engine
//! - `TestHarness`, which owns a catalog and drives one character
//! - Assertion helpers for the ledger invariants

use crate::catalog::RuleCatalog;
use crate::character::{Ability, AbilityScores, Character, Skill};
use crate::config::ProgressionConfig;
use crate::delevel::DeLevelResult;
use crate::error::Result;
use crate::progression::{HpChoice, LevelUpResult, ProgressionEngine, RestResult, SkillChoice};
use crate::resources::RestType;

/// STR 16, DEX 14, CON 14, INT 10, WIS 12, CHA 8.
pub fn sample_scores() -> AbilityScores {
    AbilityScores::new(16, 14, 14, 10, 12, 8)
}

/// A classless character with [`sample_scores`].
pub fn new_character(name: &str) -> Character {
    let mut character = Character::new(name);
    character.ability_scores = sample_scores();
    character
}

/// A Fighter of `level` built with average hit points.
///
/// Class skills are Athletics and Perception. No subclass, fighting style or
/// Ability Score Improvement is chosen.
pub fn fighter(engine: &ProgressionEngine<'_>, level: u8) -> Character {
    let mut character = new_character("Tess");
    for n in 1..=level {
        let result = engine
            .level_up(&mut character, "Fighter", HpChoice::Average)
            .unwrap_or_else(|e| panic!("Fighter level {n}: {e}"));
        if n == 1 {
            let choice = result.skill_choice.unwrap_or_else(|| SkillChoice::any(2));
            engine
                .select_skills(&mut character, "Fighter", &choice, &[Skill::Athletics, Skill::Perception])
                .unwrap_or_else(|e| panic!("Fighter skills: {e}"));
        }
    }
    character
}

/// Owns a catalog and a character so tests can drive the engine without
/// juggling lifetimes.
pub struct TestHarness {
    catalog: RuleCatalog,
    config: ProgressionConfig,
    pub character: Character,
}

impl TestHarness {
    /// Built-in catalog and a classless character with sample scores.
    pub fn new() -> Self {
        Self::with_character(new_character("Tess"))
    }

    pub fn with_character(character: Character) -> Self {
        Self {
            catalog: RuleCatalog::srd(),
            config: ProgressionConfig::default(),
            character,
        }
    }

    pub fn with_config(mut self, config: ProgressionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn engine(&self) -> ProgressionEngine<'_> {
        ProgressionEngine::with_config(&self.catalog, self.config.clone())
    }

    pub fn level_up(&mut self, class: &str) -> Result<LevelUpResult> {
        let engine = ProgressionEngine::with_config(&self.catalog, self.config.clone());
        engine.level_up(&mut self.character, class, HpChoice::Average)
    }

    /// Level `class` until it reaches `level`, panicking on any error.
    pub fn level_to(&mut self, class: &str, level: u8) -> &mut Self {
        while self.character.levels_in(class) < level {
            if let Err(e) = self.level_up(class) {
                panic!("{class} level {}: {e}", self.character.levels_in(class) + 1);
            }
        }
        self
    }

    pub fn de_level(&mut self, class: &str) -> Result<DeLevelResult> {
        let engine = ProgressionEngine::with_config(&self.catalog, self.config.clone());
        engine.de_level(&mut self.character, class)
    }

    pub fn rest(&mut self, rest: RestType) -> RestResult {
        let engine = ProgressionEngine::with_config(&self.catalog, self.config.clone());
        engine.rest(&mut self.character, rest)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion helpers
// ============================================================================

/// Every ability's extra equals the sum of live benefit records for it, and
/// every skill proficiency is backed by a record.
pub fn assert_benefits_consistent(character: &Character) {
    for ability in Ability::all() {
        assert_eq!(
            character.ability_scores.extra(ability) as i32,
            character.benefits.ability_bonus(ability),
            "{} extra does not match its benefit records",
            ability.name()
        );
    }
    for skill in character.skill_proficiencies.keys() {
        assert!(
            character.benefits.grants_skill(*skill),
            "{} proficiency has no benefit record",
            skill.name()
        );
    }
}

pub fn assert_hp(character: &Character, current: i32, maximum: i32) {
    assert_eq!(
        (character.hit_points.current, character.hit_points.maximum),
        (current, maximum),
        "Expected HP {current}/{maximum}"
    );
}

pub fn assert_class_level(character: &Character, class: &str, level: u8) {
    assert_eq!(
        character.levels_in(class),
        level,
        "Expected {class} level {level}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fighter_fixture() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let character = fighter(&engine, 3);
        assert_class_level(&character, "Fighter", 3);
        assert!(character.is_proficient_in(Skill::Athletics));
        assert_benefits_consistent(&character);
    }

    #[test]
    fn test_harness_levels_and_rests() {
        let mut harness = TestHarness::new();
        harness.level_to("Fighter", 2);
        assert_hp(&harness.character, 20, 20);

        harness.character.hit_points.take_damage(5);
        harness.rest(RestType::LongRest);
        assert_hp(&harness.character, 20, 20);
    }
}

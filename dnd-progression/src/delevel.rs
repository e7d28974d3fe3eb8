//! Removing a level.
//!
//! De-leveling takes the top level off one class and reverses what that
//! level granted. The level's [`LevelRecord`](crate::character::LevelRecord)
//! supplies the exact hit points and proficiencies; features are matched by
//! their source, and benefits are revoked from the ledger by source name.
//!
//! Features of a lower level that another source depends on are left in
//! place. Only the top level of a class can be removed, so features of the
//! same class never dangle.

use crate::benefits::{Benefit, BenefitSource, SourceKind};
use crate::character::{Ability, AsiRecord, Character, FeatureSource, Proficiency};
use crate::error::{ProgressionError, Result};
use crate::progression::{find_record, ProgressionEngine};
use serde::{Deserialize, Serialize};
use tracing::info;

/// What removing a level does (or did).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeLevelResult {
    pub class_name: String,
    pub old_level: u8,
    pub new_level: u8,
    pub new_total_level: u8,
    pub hp_lost: i32,
    /// False when no level record existed and the average was used.
    pub hp_from_record: bool,
    pub features_removed: Vec<String>,
    pub benefits_removed: Vec<Benefit>,
    pub proficiencies_removed: Vec<Proficiency>,
    pub feat_removed: Option<String>,
    pub subclass_removed: Option<String>,
    /// The class entry was removed entirely.
    pub class_removed: bool,
    pub fighting_styles_removed: Vec<String>,
    pub maneuvers_removed: Vec<String>,
    pub masteries_removed: Vec<String>,
}

impl<'a> ProgressionEngine<'a> {
    /// Preview removing a level from `class` without changing the character.
    pub fn de_level_preview(&self, character: &Character, class: &str) -> Result<DeLevelResult> {
        let mut scratch = character.clone();
        self.remove_level(&mut scratch, class)
    }

    /// Remove the top level of `class` and reverse its grants.
    pub fn de_level(&self, character: &mut Character, class: &str) -> Result<DeLevelResult> {
        let result = self.remove_level(character, class)?;
        info!(
            character = %character.name,
            class = %result.class_name,
            level = result.new_level,
            total_level = result.new_total_level,
            hp_lost = result.hp_lost,
            "level removed"
        );
        Ok(result)
    }

    fn remove_level(&self, character: &mut Character, class: &str) -> Result<DeLevelResult> {
        let def = self.class_def(class)?;
        let old_level = character.levels_in(&def.name);
        if old_level == 0 {
            return Err(ProgressionError::NotInClass(def.name.clone()));
        }

        let record = find_record(character, &def.name, old_level).map(|idx| character.level_history.remove(idx));

        // Hit points
        let (hp_lost, hp_from_record) = match &record {
            Some(record) => (record.hp_gained, true),
            None => {
                let con = character.ability_scores.modifier(Ability::Constitution) as i32;
                let die = if character.total_level() == 1 {
                    def.hit_die as i32
                } else {
                    def.hit_die as i32 / 2 + 1
                };
                let hp = (die + con).max(self.config().minimum_hp_per_level)
                    + self.per_level_hp_bonus(character);
                (hp, false)
            }
        };
        character.hit_points.decrease_maximum(hp_lost);
        character.hit_dice.remove(def.hit_die);

        // Features of this level and above
        let mut features_removed = Vec::new();
        character.features.retain(|f| {
            let remove = f.source.is_class_level_at_or_above(&def.name, old_level);
            if remove {
                features_removed.push(f.name.clone());
            }
            !remove
        });

        // Benefits granted at this level
        let level_source = BenefitSource::class_level(&def.name, old_level);
        let mut benefits_removed: Vec<Benefit> = character
            .revoke_benefits(SourceKind::ClassLevel, &level_source.name)
            .into_iter()
            .chain(character.revoke_benefits(SourceKind::AbilityScoreImprovement, &level_source.name))
            .map(|r| r.benefit)
            .collect();

        let mut feat_removed = None;
        if let Some(AsiRecord::Feat(feat)) = record.as_ref().and_then(|r| r.asi.as_ref()) {
            let feat_features: Vec<String> = character
                .features
                .iter()
                .filter(|f| matches!(&f.source, FeatureSource::Feat(n) if n.eq_ignore_ascii_case(feat)))
                .map(|f| f.name.clone())
                .collect();
            if let Some(revoked) = self.remove_feat(character, feat) {
                features_removed.extend(feat_features);
                benefits_removed.extend(revoked);
                feat_removed = Some(feat.clone());
            }
        }

        // Class level and subclass. A subclass goes when the class drops
        // below the unlock level or when it was chosen at the removed level.
        let chosen_here = record.as_ref().is_some_and(|r| r.subclass_chosen.is_some());
        let mut subclass_removed = None;
        let mut new_level = old_level;
        if let Some(class_level) = character.class_level_mut(&def.name) {
            class_level.level -= 1;
            new_level = class_level.level;
            if new_level < def.subclass_level || chosen_here {
                subclass_removed = class_level.subclass.take();
            }
        }
        if let Some(subclass) = &subclass_removed {
            benefits_removed.extend(
                character
                    .revoke_benefits(SourceKind::Subclass, subclass)
                    .into_iter()
                    .map(|r| r.benefit),
            );
            character.features.retain(|f| {
                let remove = matches!(&f.source, FeatureSource::Subclass { subclass: s, .. } if s == subclass);
                if remove {
                    features_removed.push(f.name.clone());
                }
                !remove
            });
        }

        // Proficiencies from the class's first level
        let proficiencies_removed = record
            .as_ref()
            .map(|r| r.proficiencies_gained.clone())
            .unwrap_or_default();
        for proficiency in &proficiencies_removed {
            character.remove_proficiency(proficiency);
        }

        let class_removed = new_level == 0;
        if class_removed {
            character.classes.retain(|c| !c.class.eq_ignore_ascii_case(&def.name));
        }

        // Choices whose allowance shrank
        let mut fighting_styles_removed = Vec::new();
        let features = &character.features;
        character.fighting_styles.retain(|style| {
            let keep = features
                .iter()
                .any(|f| f.source == style.source && f.name == style.granted_by);
            if !keep {
                fighting_styles_removed.push(style.name.clone());
            }
            keep
        });

        let maneuver_allowance = self.maneuver_allowance(character) as usize;
        let maneuvers_removed = trim_to(&mut character.maneuvers, maneuver_allowance);
        let mastery_allowance = self.mastery_allowance(character) as usize;
        let masteries_removed = trim_to(&mut character.weapon_masteries, mastery_allowance);

        self.refresh_resources(character);

        Ok(DeLevelResult {
            class_name: def.name.clone(),
            old_level,
            new_level,
            new_total_level: character.total_level(),
            hp_lost,
            hp_from_record,
            features_removed,
            benefits_removed,
            proficiencies_removed,
            feat_removed,
            subclass_removed,
            class_removed,
            fighting_styles_removed,
            maneuvers_removed,
            masteries_removed,
        })
    }
}

/// Drop the most recent entries beyond `allowance`. Returns what was dropped.
fn trim_to(choices: &mut Vec<String>, allowance: usize) -> Vec<String> {
    if choices.len() > allowance {
        choices.split_off(allowance)
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RuleCatalog;
    use crate::progression::{AsiChoice, FeatSelection, HpChoice};
    use crate::testing::{assert_benefits_consistent, fighter, new_character};
    use std::collections::HashMap;

    #[test]
    fn test_level_up_then_de_level_round_trip() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 4);
        let before = character.clone();

        engine.level_up(&mut character, "Fighter", HpChoice::Rolled(9)).unwrap();
        let result = engine.de_level(&mut character, "Fighter").unwrap();

        assert_eq!(result.hp_lost, 11);
        assert!(result.hp_from_record);
        assert_eq!(result.features_removed, vec!["Extra Attack", "Tactical Shift"]);
        assert_eq!(character, before);
    }

    #[test]
    fn test_de_level_last_level_removes_class() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 1);

        let result = engine.de_level(&mut character, "Fighter").unwrap();
        assert!(result.class_removed);
        assert_eq!(result.new_total_level, 0);
        assert!(character.classes.is_empty());
        assert_eq!(character.total_level(), 0);
        assert!(character.saving_throw_proficiencies.is_empty());
        assert!(character.skill_proficiencies.is_empty());
        assert!(character.resources.is_empty());
        assert_eq!(character.hit_points.maximum, 1);
    }

    #[test]
    fn test_de_level_reverses_asi_and_feat() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 6);

        engine
            .apply_asi_choice(
                &mut character,
                "Fighter",
                AsiChoice::Feat(FeatSelection::new("Mobile").with_ability(Ability::Dexterity)),
            )
            .unwrap();
        assert_eq!(character.speed.walk, 40);

        let result = engine.de_level(&mut character, "Fighter").unwrap();
        assert_eq!(result.feat_removed.as_deref(), Some("Mobile"));
        assert_eq!(character.speed.walk, 30);
        assert_eq!(character.ability_scores.get(Ability::Dexterity), 14);
        assert!(!character.has_feat("Mobile"));
        assert_benefits_consistent(&character);

        // Level 4's ability increase survives removing level 6.
        let mut character = fighter(&engine, 4);
        let boosts = HashMap::from([(Ability::Strength, 2)]);
        engine
            .apply_asi_choice(&mut character, "Fighter", AsiChoice::Abilities(boosts))
            .unwrap();
        engine.level_up(&mut character, "Fighter", HpChoice::Average).unwrap();
        engine.de_level(&mut character, "Fighter").unwrap();
        assert_eq!(character.ability_scores.get(Ability::Strength), 18);

        let result = engine.de_level(&mut character, "Fighter").unwrap();
        assert_eq!(
            result.benefits_removed,
            vec![Benefit::AbilityScore { ability: Ability::Strength, amount: 2 }]
        );
        assert_eq!(character.ability_scores.get(Ability::Strength), 16);
    }

    #[test]
    fn test_de_level_below_subclass_level() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 3);
        engine
            .select_subclass(&mut character, "Fighter", "Battle Master")
            .unwrap();
        engine.learn_maneuver(&mut character, "Trip Attack").unwrap();

        let result = engine.de_level(&mut character, "Fighter").unwrap();
        assert_eq!(result.subclass_removed.as_deref(), Some("Battle Master"));
        assert_eq!(result.maneuvers_removed, vec!["Trip Attack"]);
        assert!(!character.has_feature("Combat Superiority"));
        assert!(character.class_level("Fighter").unwrap().subclass.is_none());
        assert!(!character
            .resources
            .contains(&crate::resources::ResourceId::feature("Superiority Dice")));
    }

    #[test]
    fn test_de_level_removes_subclass_chosen_late() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 3);
        let before = character.clone();

        let result = engine.level_up(&mut character, "Fighter", HpChoice::Average).unwrap();
        assert!(result.requires_subclass);
        engine
            .select_subclass(&mut character, "Fighter", "Champion")
            .unwrap();
        assert!(character.has_feature("Improved Critical"));

        let result = engine.de_level(&mut character, "Fighter").unwrap();
        assert_eq!(result.new_level, 3);
        assert_eq!(result.subclass_removed.as_deref(), Some("Champion"));
        assert!(!character.has_feature("Improved Critical"));
        assert_eq!(character, before);
        assert_benefits_consistent(&character);
    }

    #[test]
    fn test_de_level_keeps_subclass_chosen_earlier() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 3);
        engine
            .select_subclass(&mut character, "Fighter", "Champion")
            .unwrap();
        engine.level_up(&mut character, "Fighter", HpChoice::Average).unwrap();

        let result = engine.de_level(&mut character, "Fighter").unwrap();
        assert!(result.subclass_removed.is_none());
        assert_eq!(
            character.class_level("Fighter").unwrap().subclass.as_deref(),
            Some("Champion")
        );
        assert!(character.has_feature("Improved Critical"));
    }

    #[test]
    fn test_de_level_drops_fighting_style_of_removed_feature() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 1);
        engine
            .select_fighting_style(&mut character, "Defense", "Fighting Style")
            .unwrap();

        let result = engine.de_level(&mut character, "Fighter").unwrap();
        assert_eq!(result.fighting_styles_removed, vec!["Defense"]);
        assert!(!character.has_fighting_style("Defense"));
    }

    #[test]
    fn test_de_level_without_record_uses_average() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 3);
        character.level_history.clear();
        let max = character.hit_points.maximum;

        let result = engine.de_level(&mut character, "Fighter").unwrap();
        assert!(!result.hp_from_record);
        assert_eq!(result.hp_lost, 8);
        assert_eq!(character.hit_points.maximum, max - 8);
    }

    #[test]
    fn test_preview_matches_apply() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 2);
        let snapshot = character.clone();

        let preview = engine.de_level_preview(&character, "Fighter").unwrap();
        assert_eq!(character, snapshot);
        let applied = engine.de_level(&mut character, "Fighter").unwrap();
        assert_eq!(preview, applied);
    }

    #[test]
    fn test_de_level_errors() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = new_character("Tess");
        assert_eq!(
            engine.de_level(&mut character, "Fighter"),
            Err(ProgressionError::NotInClass("Fighter".to_string()))
        );
        assert!(matches!(
            engine.de_level(&mut character, "Gunslinger"),
            Err(ProgressionError::UnknownClass(_))
        ));
    }
}

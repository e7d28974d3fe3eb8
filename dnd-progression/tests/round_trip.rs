//! Level-up / de-level round trips and ledger consistency.
//!
//! Removing the level just gained must give back the character exactly as
//! it was, and every ability bonus must always equal the sum of its live
//! benefit records.

use dnd_progression::testing::{assert_benefits_consistent, fighter, new_character, TestHarness};
use dnd_progression::{
    Ability, AsiChoice, AsiPath, Character, CharacterBuilder, FeatSelection, HpChoice, LevelUpFlow, LevelUpStep,
    ProgressionEngine, RuleCatalog, Skill, SourceKind,
};
use std::collections::HashMap;

/// Level `class` from 1 to `top`, then remove levels one at a time and
/// compare against the snapshot taken before each level was gained.
fn assert_round_trip(engine: &ProgressionEngine<'_>, class: &str, top: u8) {
    let mut character = new_character("Round Trip");
    engine
        .level_up(&mut character, class, HpChoice::Average)
        .unwrap_or_else(|e| panic!("{class} level 1: {e}"));

    let mut snapshots: Vec<Character> = Vec::new();
    for level in 2..=top {
        snapshots.push(character.clone());
        engine
            .level_up(&mut character, class, HpChoice::Average)
            .unwrap_or_else(|e| panic!("{class} level {level}: {e}"));
    }

    while let Some(snapshot) = snapshots.pop() {
        let level = character.levels_in(class);
        let result = engine
            .de_level(&mut character, class)
            .unwrap_or_else(|e| panic!("{class} de-level from {level}: {e}"));
        assert_eq!(result.old_level, level);
        assert_eq!(character, snapshot, "{class} level {level} did not round trip");
    }
}

#[test]
fn test_round_trip_martial_classes() {
    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    for class in ["Barbarian", "Fighter", "Monk", "Rogue"] {
        assert_round_trip(&engine, class, 6);
    }
}

#[test]
fn test_round_trip_casters() {
    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    for class in ["Cleric", "Paladin", "Warlock", "Wizard"] {
        assert_round_trip(&engine, class, 6);
    }
}

#[test]
fn test_round_trip_through_subclass_and_skills() {
    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    let mut character = fighter(&engine, 2);
    let snapshot = character.clone();

    let mut flow = LevelUpFlow::new();
    flow.show(&character).unwrap();
    flow.select_class(&engine, &character, "Fighter").unwrap();
    flow.confirm(&engine, &mut character, HpChoice::Average).unwrap();
    assert_eq!(flow.step(), LevelUpStep::SelectSubclass);
    flow.choose_subclass(&engine, &mut character, "Battle Master").unwrap();
    assert_eq!(flow.step(), LevelUpStep::SelectSkills);
    flow.choose_skills(&engine, &mut character, &[Skill::Insight]).unwrap();
    assert_eq!(flow.step(), LevelUpStep::Complete);
    assert!(character.is_proficient_in(Skill::Insight));
    assert!(character.has_feature("Combat Superiority"));

    engine.de_level(&mut character, "Fighter").unwrap();
    assert_eq!(character, snapshot);
    assert_benefits_consistent(&character);
}

#[test]
fn test_round_trip_with_late_subclass() {
    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    // No subclass picked at level 3
    let mut character = fighter(&engine, 3);
    let snapshot = character.clone();

    let mut flow = LevelUpFlow::new();
    flow.show(&character).unwrap();
    flow.select_class(&engine, &character, "Fighter").unwrap();
    flow.confirm(&engine, &mut character, HpChoice::Average).unwrap();
    assert_eq!(flow.step(), LevelUpStep::SelectSubclass);
    flow.choose_subclass(&engine, &mut character, "Battle Master").unwrap();
    flow.choose_skills(&engine, &mut character, &[Skill::Insight]).unwrap();
    assert_eq!(flow.step(), LevelUpStep::SelectAsi);
    flow.choose_asi_path(AsiPath::Abilities).unwrap();
    flow.allocate_abilities(&engine, &mut character, HashMap::from([(Ability::Strength, 2)]))
        .unwrap();
    assert_eq!(flow.step(), LevelUpStep::Complete);
    engine.learn_maneuver(&mut character, "Trip Attack").unwrap();

    let result = engine.de_level(&mut character, "Fighter").unwrap();
    assert_eq!(result.subclass_removed.as_deref(), Some("Battle Master"));
    assert_eq!(result.maneuvers_removed, vec!["Trip Attack"]);
    assert_eq!(character, snapshot);
    assert_benefits_consistent(&character);
}

#[test]
fn test_round_trip_with_asi() {
    let mut harness = TestHarness::new();
    harness.level_to("Fighter", 3);
    let before = harness.character.clone();

    harness.level_up("Fighter").unwrap();
    // A separate engine, since the harness's own borrows the whole harness
    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    engine
        .apply_asi_choice(
            &mut harness.character,
            "Fighter",
            AsiChoice::Abilities(HashMap::from([(Ability::Dexterity, 2)])),
        )
        .unwrap();
    assert_eq!(harness.character.ability_scores.get(Ability::Dexterity), 16);
    assert_benefits_consistent(&harness.character);

    let result = harness.de_level("Fighter").unwrap();
    assert_eq!(result.benefits_removed.len(), 1);
    assert_eq!(harness.character, before);
}

#[test]
fn test_ledger_through_origin_feats_and_delevel() {
    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    let mut character = CharacterBuilder::new()
        .name("Lady Wren")
        .species("Human", vec![Skill::Insight])
        .origin(
            "Noble",
            HashMap::from([(Ability::Strength, 2), (Ability::Charisma, 1)]),
        )
        .origin_feat(FeatSelection::new("Skilled").with_skills(vec![
            Skill::Arcana,
            Skill::Stealth,
            Skill::Medicine,
        ]))
        .class("Fighter")
        .standard_array([
            (15, Ability::Strength),
            (14, Ability::Constitution),
            (13, Ability::Dexterity),
            (12, Ability::Wisdom),
            (10, Ability::Intelligence),
            (8, Ability::Charisma),
        ])
        .skills(vec![Skill::Athletics, Skill::Perception])
        .build(&engine)
        .expect("Should build successfully");

    assert_benefits_consistent(&character);
    assert_eq!(character.ability_scores.get(Ability::Strength), 17);
    assert_eq!(character.ability_scores.get(Ability::Charisma), 9);
    for skill in [Skill::History, Skill::Persuasion, Skill::Arcana, Skill::Stealth, Skill::Insight] {
        assert!(character.is_proficient_in(skill), "{} missing", skill.name());
    }
    assert_eq!(
        character
            .benefits
            .benefits_by_source(SourceKind::Feat, "Skilled")
            .len(),
        3
    );

    for _ in 0..3 {
        engine.level_up(&mut character, "Fighter", HpChoice::Average).unwrap();
    }
    engine
        .apply_asi_choice(&mut character, "Fighter", AsiChoice::Feat(FeatSelection::new("Durable")))
        .unwrap();
    assert_eq!(character.ability_scores.get(Ability::Constitution), 15);
    assert_benefits_consistent(&character);

    let result = engine.de_level(&mut character, "Fighter").unwrap();
    assert_eq!(result.feat_removed.as_deref(), Some("Durable"));
    assert!(!character.has_feat("Durable"));
    assert_eq!(character.ability_scores.get(Ability::Constitution), 14);
    // Origin grants are untouched by de-leveling
    assert!(character.has_feat("Skilled"));
    assert!(character.is_proficient_in(Skill::Arcana));
    assert_benefits_consistent(&character);
}

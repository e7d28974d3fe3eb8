//! End-to-end progression scenarios driven through the public API.
//!
//! These tests build characters with the builder, level them through the
//! interactive flow and check the resulting sheet: hit points, features,
//! resources, spell slots and attacks.

use dnd_progression::items::{get_weapon, Hand};
use dnd_progression::testing::{assert_benefits_consistent, assert_class_level, assert_hp, new_character};
use dnd_progression::{
    generate_attacks, Ability, AsiPath, CharacterBuilder, FeatSelection, HpChoice, LevelUpFlow, LevelUpStep,
    ProgressionEngine, ProgressionError, ResourceId, RestType, RuleCatalog, Skill,
};
use std::collections::HashMap;

fn soldier_fighter(engine: &ProgressionEngine<'_>) -> dnd_progression::Character {
    CharacterBuilder::new()
        .name("Thorin")
        .species("Dwarf", vec![])
        .origin(
            "Soldier",
            HashMap::from([(Ability::Strength, 2), (Ability::Constitution, 1)]),
        )
        .class("Fighter")
        .standard_array([
            (15, Ability::Strength),
            (14, Ability::Constitution),
            (13, Ability::Dexterity),
            (12, Ability::Wisdom),
            (10, Ability::Intelligence),
            (8, Ability::Charisma),
        ])
        .skills(vec![Skill::Perception, Skill::Survival])
        .build(engine)
        .expect("Should build successfully")
}

// =============================================================================
// Level 1 through 4 with the interactive flow
// =============================================================================

#[test]
fn test_fighter_one_to_four() {
    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    let mut character = soldier_fighter(&engine);
    let mut flow = LevelUpFlow::new();

    // STR 17, CON 15 (+2), Dwarven Toughness +1 per level
    assert_hp(&character, 13, 13);

    // Level 2: no choices
    flow.show(&character).unwrap();
    flow.select_class(&engine, &character, "Fighter").unwrap();
    assert_eq!(flow.preview().unwrap().hp_average, 9);
    flow.confirm(&engine, &mut character, HpChoice::Average).unwrap();
    assert_eq!(flow.step(), LevelUpStep::Complete);
    flow.finish().unwrap();
    assert!(character.has_feature("Action Surge"));

    // Level 3: subclass
    flow.show(&character).unwrap();
    flow.select_class(&engine, &character, "Fighter").unwrap();
    assert!(flow.preview().unwrap().requires_subclass);
    flow.confirm(&engine, &mut character, HpChoice::Rolled(10)).unwrap();
    assert_eq!(flow.step(), LevelUpStep::SelectSubclass);
    flow.choose_subclass(&engine, &mut character, "Champion").unwrap();
    assert_eq!(flow.step(), LevelUpStep::Complete);
    flow.finish().unwrap();
    assert!(character.has_feature("Improved Critical"));

    // Level 4: ASI
    flow.show(&character).unwrap();
    flow.select_class(&engine, &character, "Fighter").unwrap();
    assert!(flow.preview().unwrap().asi_available);
    flow.confirm(&engine, &mut character, HpChoice::Average).unwrap();
    assert_eq!(flow.step(), LevelUpStep::SelectAsi);
    flow.choose_asi_path(AsiPath::Abilities).unwrap();
    flow.allocate_abilities(
        &engine,
        &mut character,
        HashMap::from([(Ability::Strength, 1), (Ability::Constitution, 1)]),
    )
    .unwrap();
    assert_eq!(flow.step(), LevelUpStep::Complete);

    assert_class_level(&character, "Fighter", 4);
    assert_eq!(character.ability_scores.get(Ability::Strength), 18);
    assert_eq!(character.ability_scores.get(Ability::Constitution), 16);
    // 13 + 9 + 13 + 9; the CON increase does not reach back to earlier levels
    assert_eq!(character.hit_points.maximum, 44);
    assert_eq!(character.level_history.len(), 4);
    assert!(!engine.has_pending_asi(&character, "Fighter"));
    assert_benefits_consistent(&character);
}

#[test]
fn test_feat_path_and_cancel() {
    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    let mut character = soldier_fighter(&engine);
    for _ in 0..2 {
        engine.level_up(&mut character, "Fighter", HpChoice::Average).unwrap();
    }
    engine.select_subclass(&mut character, "Fighter", "Champion").unwrap();

    let before = character.clone();
    let mut flow = LevelUpFlow::new();
    flow.show(&character).unwrap();
    flow.select_class(&engine, &character, "Fighter").unwrap();
    flow.confirm(&engine, &mut character, HpChoice::Average).unwrap();
    flow.choose_asi_path(AsiPath::Feat).unwrap();

    // Already taken as the origin feat
    let err = flow
        .choose_feat(&engine, &mut character, FeatSelection::new("Savage Attacker"))
        .unwrap_err();
    assert_eq!(err, ProgressionError::AlreadyChosen("Savage Attacker".to_string()));
    assert_eq!(flow.step(), LevelUpStep::SelectFeat);

    flow.cancel(&mut character);
    assert_eq!(character, before);
    assert!(!flow.is_in_progress());
}

// =============================================================================
// Resources and rests
// =============================================================================

#[test]
fn test_second_wind_and_rests() {
    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    let mut character = soldier_fighter(&engine);

    assert_eq!(engine.use_feature(&mut character, "Second Wind").unwrap(), 1);
    assert_eq!(engine.use_feature(&mut character, "Second Wind").unwrap(), 0);
    assert_eq!(
        engine.use_feature(&mut character, "Second Wind").unwrap_err(),
        ProgressionError::ResourceExhausted("Second Wind".to_string())
    );

    character.hit_points.take_damage(8);
    let result = engine.rest(&mut character, RestType::ShortRest);
    assert!(result.resources_reset.contains(&ResourceId::feature("Second Wind")));
    assert_eq!(result.hp_restored, 0);
    assert_hp(&character, 5, 13);

    let result = engine.rest(&mut character, RestType::LongRest);
    assert_eq!(result.hp_restored, 8);
    assert_hp(&character, 13, 13);
}

#[test]
fn test_fighter_wizard_multiclass_slots() {
    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    let mut character = new_character("Elric");
    character.ability_scores.set_base(Ability::Intelligence, 14);

    for _ in 0..2 {
        engine.level_up(&mut character, "Fighter", HpChoice::Average).unwrap();
    }
    assert!(character.spell_slot(1).is_none());

    let result = engine.level_up(&mut character, "Wizard", HpChoice::Average).unwrap();
    assert!(result.requires_spells);
    assert_eq!(character.total_level(), 3);
    assert_eq!(character.spell_slot(1).map(|s| s.maximum()), Some(2));
    assert_eq!(engine.caster_level(&character), 1);

    engine.level_up(&mut character, "Wizard", HpChoice::Average).unwrap();
    assert_eq!(character.spell_slot(1).map(|s| s.maximum()), Some(3));

    engine.de_level(&mut character, "Wizard").unwrap();
    engine.de_level(&mut character, "Wizard").unwrap();
    assert!(character.spell_slot(1).is_none());
    assert!(character.class_level("Wizard").is_none());
}

// =============================================================================
// Attacks
// =============================================================================

#[test]
fn test_attack_list_follows_equipment() {
    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    let mut character = soldier_fighter(&engine);
    assert!(generate_attacks(&character).is_empty());

    character
        .equipment
        .equip(get_weapon("Longsword").unwrap(), Hand::Main);
    let attacks = generate_attacks(&character);
    assert_eq!(attacks.len(), 1);
    // STR 17 (+3), proficiency +2
    assert_eq!(attacks[0].attack_bonus, 5);
    assert_eq!(attacks[0].damage, "1d8+3");
    assert_eq!(attacks[0].two_handed_damage.as_deref(), Some("1d10+3"));

    // Proficiency bonus rises at level 5
    for _ in 0..4 {
        engine.level_up(&mut character, "Fighter", HpChoice::Average).unwrap();
    }
    assert_eq!(generate_attacks(&character)[0].attack_bonus, 6);
}

//! Save/load tests for characters and rule catalogs.
//!
//! A loaded character must carry its full ledger: benefit records, level
//! history and spent resources, so that de-leveling after a reload behaves
//! exactly as it would have before saving.

use dnd_progression::persist::{character_save_path, list_character_saves, load_catalog_json, save_catalog_json};
use dnd_progression::testing::{assert_benefits_consistent, TestHarness};
use dnd_progression::{
    Ability, AsiChoice, HpChoice, LevelUpFlow, PersistError, ProgressionEngine, RuleCatalog, SavedCharacter,
};
use std::collections::HashMap;
use tempfile::TempDir;

// =============================================================================
// Characters
// =============================================================================

#[tokio::test]
async fn test_reload_then_delevel() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = character_save_path(temp_dir.path(), "Tess");

    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    let mut harness = TestHarness::new();
    harness.level_to("Fighter", 3);
    let before_four = harness.character.clone();
    harness.level_up("Fighter").unwrap();
    engine
        .apply_asi_choice(
            &mut harness.character,
            "Fighter",
            AsiChoice::Abilities(HashMap::from([(Ability::Strength, 2)])),
        )
        .unwrap();
    engine.use_feature(&mut harness.character, "Action Surge").unwrap();

    SavedCharacter::new(harness.character.clone())
        .save_json(&path)
        .await
        .expect("Save should succeed");
    let mut loaded = SavedCharacter::load_json(&path)
        .await
        .expect("Load should succeed")
        .character;

    assert_eq!(loaded, harness.character);
    assert_eq!(loaded.ability_scores.get(Ability::Strength), 18);
    assert_benefits_consistent(&loaded);

    engine.de_level(&mut loaded, "Fighter").unwrap();
    assert_eq!(loaded.ability_scores.get(Ability::Strength), 16);
    assert_eq!(loaded.hit_points.maximum, before_four.hit_points.maximum);
    assert_eq!(loaded.level_history, before_four.level_history);
    // The spent Action Surge use stays spent
    let surge = engine.use_feature(&mut loaded, "Action Surge");
    assert!(surge.is_err());
}

#[tokio::test]
async fn test_list_saves_by_name() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dir = temp_dir.path().join("characters");

    assert!(list_character_saves(&dir).await.expect("List should succeed").is_empty());

    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    for (name, levels) in [("Zed", 1), ("Ada", 3)] {
        let mut harness = TestHarness::new();
        harness.character.name = name.to_string();
        harness.level_to("Fighter", levels);
        engine
            .level_up(&mut harness.character, "Fighter", HpChoice::Average)
            .unwrap();
        SavedCharacter::new(harness.character)
            .save_json(character_save_path(&dir, name))
            .await
            .expect("Save should succeed");
    }

    let saves = list_character_saves(&dir).await.expect("List should succeed");
    assert_eq!(saves.len(), 2);
    assert_eq!(saves[0].metadata.name, "Ada");
    assert_eq!(saves[0].metadata.level, 4);
    assert_eq!(saves[0].metadata.classes, "Fighter 4");
    assert_eq!(saves[1].metadata.name, "Zed");

    let peeked = SavedCharacter::peek_metadata(&saves[1].path)
        .await
        .expect("Peek should succeed");
    assert_eq!(peeked.level, 2);
}

#[test]
fn test_flow_reports_transaction_in_progress() {
    let catalog = RuleCatalog::srd();
    let engine = ProgressionEngine::new(&catalog);
    let mut harness = TestHarness::new();
    harness.level_to("Fighter", 2);

    let mut flow = LevelUpFlow::new();
    flow.show(&harness.character).unwrap();
    flow.select_class(&engine, &harness.character, "Fighter").unwrap();
    flow.confirm(&engine, &mut harness.character, HpChoice::Average)
        .unwrap();
    // Subclass still pending: hosts should not save this state
    assert!(flow.is_in_progress());

    flow.cancel(&mut harness.character);
    assert!(!flow.is_in_progress());
    assert_eq!(harness.character.total_level(), 2);
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let err = SavedCharacter::load_json(temp_dir.path().join("nobody.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, PersistError::Io(_)));

    std::fs::write(temp_dir.path().join("broken.json"), "not json").expect("Write should succeed");
    let err = SavedCharacter::load_json(temp_dir.path().join("broken.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, PersistError::Json(_)));
}

// =============================================================================
// Catalogs
// =============================================================================

#[tokio::test]
async fn test_engine_runs_on_loaded_catalog() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("rules.json");

    save_catalog_json(&RuleCatalog::srd(), &path)
        .await
        .expect("Save should succeed");
    let catalog = load_catalog_json(&path).await.expect("Load should succeed");
    assert_eq!(catalog, RuleCatalog::srd());

    let engine = ProgressionEngine::new(&catalog);
    let mut harness = TestHarness::new();
    let result = engine
        .level_up(&mut harness.character, "Fighter", HpChoice::Average)
        .unwrap();
    assert_eq!(result.hp_gained, 12);
}

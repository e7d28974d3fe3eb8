//! D&D 5e character progression engine.
//!
//! This crate provides:
//! - Leveling up and down (hit points, features, proficiencies, subclasses)
//! - Ability Score Improvements and feats with validated choices
//! - A benefit ledger that records the source of every stat change so it
//!   can be reversed exactly
//! - Limited-use resource tracking with short and long rest resets
//! - Multiclass spell slots and Warlock pact slots
//! - Attack lists derived from equipped weapons
//! - An interactive level-up flow with rollback on cancel
//! - Character persistence
//!
//! # Quick Start
//!
//! ```ignore
//! use dnd_progression::{HpChoice, ProgressionEngine, RuleCatalog};
//!
//! let catalog = RuleCatalog::srd();
//! let engine = ProgressionEngine::new(&catalog);
//!
//! let preview = engine.level_up_preview(&character, "Fighter")?;
//! println!("+{} HP, features: {:?}", preview.hp_average, preview.features_gained);
//!
//! let result = engine.level_up(&mut character, "Fighter", HpChoice::Average)?;
//! if result.asi_available {
//!     // route to the ASI choice
//! }
//! ```

pub mod attacks;
pub mod benefits;
pub mod catalog;
pub mod character;
pub mod character_builder;
pub mod config;
pub mod delevel;
pub mod error;
pub mod items;
pub mod level_up;
pub mod persist;
pub mod progression;
pub mod resources;
pub mod testing;

// Primary public API
pub use attacks::{generate_attacks, Attack};
pub use benefits::{Benefit, BenefitRecord, BenefitSource, BenefitTracker, SourceKind};
pub use catalog::RuleCatalog;
pub use character::{Ability, AbilityScores, Character, Skill};
pub use character_builder::{AbilityMethod, BuilderError, CharacterBuilder};
pub use config::ProgressionConfig;
pub use delevel::DeLevelResult;
pub use error::{ProgressionError, Result};
pub use level_up::{AsiPath, LevelUpFlow, LevelUpStep};
pub use persist::{PersistError, SavedCharacter};
pub use progression::{
    AsiChoice, BoostRules, FeatSelection, HpChoice, LevelUpPreview, LevelUpResult, ProgressionEngine,
    RestResult, SkillChoice, SubclassResult,
};
pub use resources::{ResourceEntry, ResourceId, ResourceTracker, RestType};
pub use testing::TestHarness;

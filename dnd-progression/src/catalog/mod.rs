//! Rule catalogs: classes, subclasses, feats, species, origins, maneuvers,
//! spells and weapons.
//!
//! A [`RuleCatalog`] is built once (from the built-in SRD tables or a JSON
//! document) and then only read. The engine borrows it; nothing mutates it.

mod classes;
mod feats;
mod species;
mod spells;

pub use spells::{full_caster_slots, pact_slots};

use crate::benefits::Benefit;
use crate::character::{Ability, AbilityScores, Character, Proficiency, Skill, WeaponProficiency};
use crate::items::{ArmorCategory, WeaponItem, WeaponMastery, WEAPONS};
use crate::resources::{ResourceId, RestType};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Scaling helpers
// ============================================================================

/// Value from a `(level, value)` table: the entry with the highest level not
/// above `level`, or 0 below the first entry.
pub fn scaled_value(table: &[(u8, u8)], level: u8) -> u8 {
    table
        .iter()
        .filter(|(l, _)| *l <= level)
        .max_by_key(|(l, _)| *l)
        .map(|(_, v)| *v)
        .unwrap_or(0)
}

/// How many uses a limited feature has.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsesFormula {
    Fixed(u8),
    /// `(class level, uses)` steps.
    ByClassLevel(Vec<(u8, u8)>),
    ClassLevel,
    ClassLevelTimes(u8),
    /// Ability modifier, minimum 1.
    AbilityModifier(Ability),
    ProficiencyBonus,
}

/// Which resource a limited feature feeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackedAs {
    #[default]
    Uses,
    FocusPoints,
}

/// Limited-use definition attached to a feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsesDefinition {
    pub formula: UsesFormula,
    pub rest: RestType,
    /// Resource name when it differs from the feature name, so that two
    /// features can feed one pool (Font of Inspiration, Channel Divinity).
    #[serde(default)]
    pub pool: Option<String>,
    #[serde(default)]
    pub tracked_as: TrackedAs,
}

impl UsesDefinition {
    pub fn new(formula: UsesFormula, rest: RestType) -> Self {
        Self {
            formula,
            rest,
            pool: None,
            tracked_as: TrackedAs::Uses,
        }
    }

    pub fn with_pool(mut self, pool: impl Into<String>) -> Self {
        self.pool = Some(pool.into());
        self
    }

    pub fn focus_points(mut self) -> Self {
        self.tracked_as = TrackedAs::FocusPoints;
        self
    }

    pub fn resource_id(&self, feature_name: &str) -> ResourceId {
        match self.tracked_as {
            TrackedAs::FocusPoints => ResourceId::FocusPoints,
            TrackedAs::Uses => {
                ResourceId::feature(self.pool.as_deref().unwrap_or(feature_name).to_string())
            }
        }
    }

    /// Maximum uses for a character with `class_level` levels in the
    /// feature's class.
    pub fn maximum(&self, class_level: u8, character: &Character) -> u8 {
        match &self.formula {
            UsesFormula::Fixed(n) => *n,
            UsesFormula::ByClassLevel(table) => scaled_value(table, class_level),
            UsesFormula::ClassLevel => class_level,
            UsesFormula::ClassLevelTimes(n) => class_level.saturating_mul(*n),
            UsesFormula::AbilityModifier(ability) => {
                character.ability_scores.modifier(*ability).max(1) as u8
            }
            UsesFormula::ProficiencyBonus => character.proficiency_bonus().max(0) as u8,
        }
    }
}

// ============================================================================
// Classes
// ============================================================================

/// Spellcasting progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CasterType {
    Full,
    Half,
    Third,
    /// Warlock Pact Magic, tracked separately from other slots.
    Pact,
}

/// Ability minimums for taking a level in a class as a multiclass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MulticlassRequirement {
    All(Vec<(Ability, u8)>),
    Any(Vec<(Ability, u8)>),
}

impl MulticlassRequirement {
    pub fn is_met(&self, scores: &AbilityScores) -> bool {
        match self {
            MulticlassRequirement::All(reqs) => {
                reqs.iter().all(|(ability, min)| scores.get(*ability) >= *min)
            }
            MulticlassRequirement::Any(reqs) => {
                reqs.iter().any(|(ability, min)| scores.get(*ability) >= *min)
            }
        }
    }
}

impl fmt::Display for MulticlassRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (reqs, joiner) = match self {
            MulticlassRequirement::All(reqs) => (reqs, " and "),
            MulticlassRequirement::Any(reqs) => (reqs, " or "),
        };
        let parts: Vec<String> = reqs
            .iter()
            .map(|(ability, min)| format!("{} {}", ability.abbreviation(), min))
            .collect();
        write!(f, "{}", parts.join(joiner))
    }
}

/// A class or subclass feature gained at a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    pub level: u8,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub uses: Option<UsesDefinition>,
    /// Benefits granted with the feature, sourced to the class level.
    #[serde(default)]
    pub benefits: Vec<Benefit>,
    /// Skills to pick from any skill when the feature is gained.
    #[serde(default)]
    pub skill_choices: u8,
    /// Whether the feature lets the character choose a fighting style.
    #[serde(default)]
    pub fighting_style: bool,
}

impl FeatureDefinition {
    pub fn new(level: u8, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level,
            name: name.into(),
            description: description.into(),
            uses: None,
            benefits: Vec::new(),
            skill_choices: 0,
            fighting_style: false,
        }
    }

    pub fn with_uses(mut self, uses: UsesDefinition) -> Self {
        self.uses = Some(uses);
        self
    }

    pub fn with_benefit(mut self, benefit: Benefit) -> Self {
        self.benefits.push(benefit);
        self
    }

    pub fn with_skill_choices(mut self, count: u8) -> Self {
        self.skill_choices = count;
        self
    }

    pub fn grants_fighting_style(mut self) -> Self {
        self.fighting_style = true;
        self
    }
}

/// A subclass and its features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubclassDefinition {
    pub name: String,
    pub description: String,
    pub features: Vec<FeatureDefinition>,
    #[serde(default)]
    pub caster: Option<CasterType>,
    #[serde(default)]
    pub spellcasting_ability: Option<Ability>,
    /// Class whose spell list the subclass casts from.
    #[serde(default)]
    pub spell_list: Option<String>,
    /// Benefits granted when the subclass is chosen.
    #[serde(default)]
    pub benefits: Vec<Benefit>,
    /// `(class level, maneuvers known)` steps.
    #[serde(default)]
    pub maneuvers_known: Vec<(u8, u8)>,
}

impl SubclassDefinition {
    pub fn features_at(&self, level: u8) -> impl Iterator<Item = &FeatureDefinition> {
        self.features.iter().filter(move |f| f.level == level)
    }

    pub fn maneuvers_at(&self, level: u8) -> u8 {
        scaled_value(&self.maneuvers_known, level)
    }
}

/// A class definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,
    pub description: String,
    pub hit_die: u8,
    pub multiclass_requirement: MulticlassRequirement,
    pub saving_throws: Vec<Ability>,
    pub skill_count: u8,
    /// Skills the class may pick from; empty means any skill.
    pub skill_options: Vec<Skill>,
    pub multiclass_skill_count: u8,
    pub armor: Vec<ArmorCategory>,
    pub weapons: Vec<WeaponProficiency>,
    pub multiclass_armor: Vec<ArmorCategory>,
    pub multiclass_weapons: Vec<WeaponProficiency>,
    pub subclass_level: u8,
    pub asi_levels: Vec<u8>,
    #[serde(default)]
    pub caster: Option<CasterType>,
    #[serde(default)]
    pub spellcasting_ability: Option<Ability>,
    /// `(class level, weapons mastered)` steps.
    #[serde(default)]
    pub weapon_mastery: Vec<(u8, u8)>,
    pub features: Vec<FeatureDefinition>,
    pub subclasses: Vec<SubclassDefinition>,
}

impl ClassDefinition {
    pub fn features_at(&self, level: u8) -> impl Iterator<Item = &FeatureDefinition> {
        self.features.iter().filter(move |f| f.level == level)
    }

    pub fn subclass(&self, name: &str) -> Option<&SubclassDefinition> {
        self.subclasses
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn is_asi_level(&self, level: u8) -> bool {
        self.asi_levels.contains(&level)
    }

    pub fn mastery_count(&self, level: u8) -> u8 {
        scaled_value(&self.weapon_mastery, level)
    }

    pub fn can_choose_skill(&self, skill: Skill) -> bool {
        self.skill_options.is_empty() || self.skill_options.contains(&skill)
    }

    /// Proficiencies granted by the first level in this class.
    ///
    /// The character's very first class grants the full set including
    /// saving throws; later classes grant only the multiclass subset.
    pub fn starting_proficiencies(&self, first_class: bool) -> Vec<Proficiency> {
        let (armor, weapons) = if first_class {
            (&self.armor, &self.weapons)
        } else {
            (&self.multiclass_armor, &self.multiclass_weapons)
        };

        let mut proficiencies: Vec<Proficiency> = Vec::new();
        if first_class {
            proficiencies.extend(self.saving_throws.iter().map(|a| Proficiency::SavingThrow(*a)));
        }
        proficiencies.extend(armor.iter().map(|a| Proficiency::Armor(*a)));
        proficiencies.extend(weapons.iter().cloned().map(Proficiency::Weapon));
        proficiencies
    }

    /// Skill picks granted by the first level in this class.
    pub fn starting_skill_count(&self, first_class: bool) -> u8 {
        if first_class {
            self.skill_count
        } else {
            self.multiclass_skill_count
        }
    }
}

// ============================================================================
// Feats
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatCategory {
    Origin,
    General,
    FightingStyle,
    EpicBoon,
}

impl FeatCategory {
    pub fn name(&self) -> &'static str {
        match self {
            FeatCategory::Origin => "Origin",
            FeatCategory::General => "General",
            FeatCategory::FightingStyle => "Fighting Style",
            FeatCategory::EpicBoon => "Epic Boon",
        }
    }
}

/// Requirements for taking a feat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatPrerequisite {
    #[serde(default)]
    pub min_level: u8,
    /// Any one of these ability minimums.
    #[serde(default)]
    pub abilities: Vec<(Ability, u8)>,
    #[serde(default)]
    pub spellcasting: bool,
    #[serde(default)]
    pub fighting_style_feature: bool,
}

impl FeatPrerequisite {
    /// Description of the first requirement the character fails, if any.
    pub fn unmet(&self, character: &Character) -> Option<String> {
        if character.total_level() < self.min_level {
            return Some(format!("character level {}", self.min_level));
        }
        if !self.abilities.is_empty()
            && !self
                .abilities
                .iter()
                .any(|(ability, min)| character.ability_scores.get(*ability) >= *min)
        {
            let parts: Vec<String> = self
                .abilities
                .iter()
                .map(|(ability, min)| format!("{} {}", ability.abbreviation(), min))
                .collect();
            return Some(parts.join(" or "));
        }
        if self.spellcasting
            && !(character.has_feature("Spellcasting") || character.has_feature("Pact Magic"))
        {
            return Some("the Spellcasting or Pact Magic feature".to_string());
        }
        if self.fighting_style_feature && !character.has_feature("Fighting Style") {
            return Some("the Fighting Style feature".to_string());
        }
        None
    }
}

/// One thing a feat grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatBenefit {
    Ability { ability: Ability, amount: u8 },
    /// Increase one of `options` by `amount` (choice made by the player).
    AbilityChoice { options: Vec<Ability>, amount: u8 },
    Skill(Skill),
    SkillChoice(u8),
    Language(String),
    LanguageChoice(u8),
    /// Flat hit point maximum increase.
    HitPoints(i32),
    /// Hit points per character level, now and on every later level.
    HitPointsPerLevel(u8),
    Speed(i32),
    Resistance(String),
    Feature {
        name: String,
        description: String,
        uses: Option<UsesDefinition>,
    },
}

/// A feat definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatDefinition {
    pub name: String,
    pub description: String,
    pub category: FeatCategory,
    #[serde(default)]
    pub prerequisite: FeatPrerequisite,
    #[serde(default)]
    pub benefits: Vec<FeatBenefit>,
}

impl FeatDefinition {
    pub fn ability_choice(&self) -> Option<(&[Ability], u8)> {
        self.benefits.iter().find_map(|b| match b {
            FeatBenefit::AbilityChoice { options, amount } => Some((options.as_slice(), *amount)),
            _ => None,
        })
    }

    pub fn skill_choices(&self) -> u8 {
        self.benefits
            .iter()
            .map(|b| match b {
                FeatBenefit::SkillChoice(n) => *n,
                _ => 0,
            })
            .sum()
    }

    pub fn language_choices(&self) -> u8 {
        self.benefits
            .iter()
            .map(|b| match b {
                FeatBenefit::LanguageChoice(n) => *n,
                _ => 0,
            })
            .sum()
    }

    pub fn hit_points_per_level(&self) -> u8 {
        self.benefits
            .iter()
            .map(|b| match b {
                FeatBenefit::HitPointsPerLevel(n) => *n,
                _ => 0,
            })
            .sum()
    }

    /// Highest score this feat's ability increases may reach.
    pub fn ability_cap(&self, default_cap: u8) -> u8 {
        match self.category {
            FeatCategory::EpicBoon => 30,
            _ => default_cap,
        }
    }
}

// ============================================================================
// Species and Origins
// ============================================================================

/// A species trait, optionally limited-use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitDefinition {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub uses: Option<UsesDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesDefinition {
    pub name: String,
    pub description: String,
    pub speed: u32,
    pub traits: Vec<TraitDefinition>,
    #[serde(default)]
    pub benefits: Vec<Benefit>,
    #[serde(default)]
    pub hp_per_level: u8,
    /// Skills the player picks from any skill.
    #[serde(default)]
    pub skill_choices: u8,
}

/// A character origin (background): ability options, a feat and skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginDefinition {
    pub name: String,
    pub description: String,
    pub abilities: Vec<Ability>,
    pub feat: String,
    pub skills: Vec<Skill>,
}

// ============================================================================
// Maneuvers and Spells
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManeuverDefinition {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellDefinition {
    pub name: String,
    /// 0 for cantrips.
    pub level: u8,
    pub school: String,
    pub classes: Vec<String>,
    pub description: String,
}

impl SpellDefinition {
    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }

    pub fn on_list(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c.eq_ignore_ascii_case(class))
    }
}

// ============================================================================
// RuleCatalog
// ============================================================================

/// Immutable rule data consumed by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleCatalog {
    pub classes: Vec<ClassDefinition>,
    pub feats: Vec<FeatDefinition>,
    pub species: Vec<SpeciesDefinition>,
    pub origins: Vec<OriginDefinition>,
    pub maneuvers: Vec<ManeuverDefinition>,
    pub spells: Vec<SpellDefinition>,
    pub weapons: Vec<WeaponItem>,
}

impl RuleCatalog {
    /// The built-in rules.
    pub fn srd() -> Self {
        Self {
            classes: classes::srd_classes(),
            feats: feats::srd_feats(),
            species: species::srd_species(),
            origins: species::srd_origins(),
            maneuvers: classes::srd_maneuvers(),
            spells: spells::srd_spells(),
            weapons: WEAPONS.clone(),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn class_by_name(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn subclass_by_name(&self, class: &str, subclass: &str) -> Option<&SubclassDefinition> {
        self.class_by_name(class)?.subclass(subclass.trim())
    }

    /// Classes the character may take a level in: classes it already has, or
    /// any class whose multiclass requirement (and those of its current
    /// classes) it meets. A character with no class may pick anything.
    pub fn available_classes(&self, character: &Character) -> Vec<&ClassDefinition> {
        if character.classes.is_empty() {
            return self.classes.iter().collect();
        }
        let current_ok = self.meets_current_class_requirements(character);
        self.classes
            .iter()
            .filter(|c| {
                character.class_level(&c.name).is_some()
                    || (current_ok && c.multiclass_requirement.is_met(&character.ability_scores))
            })
            .collect()
    }

    /// Whether every class the character already has allows multiclassing out.
    pub fn meets_current_class_requirements(&self, character: &Character) -> bool {
        character.classes.iter().all(|cl| {
            self.class_by_name(&cl.class)
                .map(|def| def.multiclass_requirement.is_met(&character.ability_scores))
                .unwrap_or(true)
        })
    }

    pub fn feat_by_name(&self, name: &str) -> Option<&FeatDefinition> {
        self.feats
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Feats the character qualifies for and hasn't taken.
    pub fn available_feats_for_asi(&self, character: &Character) -> Vec<&FeatDefinition> {
        self.feats
            .iter()
            .filter(|f| !character.has_feat(&f.name))
            .filter(|f| f.prerequisite.unmet(character).is_none())
            .collect()
    }

    pub fn all_fighting_styles(&self) -> Vec<&FeatDefinition> {
        self.feats
            .iter()
            .filter(|f| f.category == FeatCategory::FightingStyle)
            .collect()
    }

    pub fn fighting_style_by_name(&self, name: &str) -> Option<&FeatDefinition> {
        self.feat_by_name(name)
            .filter(|f| f.category == FeatCategory::FightingStyle)
    }

    pub fn all_origins(&self) -> &[OriginDefinition] {
        &self.origins
    }

    pub fn origin_by_name(&self, name: &str) -> Option<&OriginDefinition> {
        self.origins
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn all_species(&self) -> &[SpeciesDefinition] {
        &self.species
    }

    pub fn species_by_name(&self, name: &str) -> Option<&SpeciesDefinition> {
        self.species
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn maneuver_by_name(&self, name: &str) -> Option<&ManeuverDefinition> {
        self.maneuvers
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn mastery_description(&self, name: &str) -> Option<&'static str> {
        WeaponMastery::from_name(name).map(|m| m.description())
    }

    pub fn spell_by_name(&self, name: &str) -> Option<&SpellDefinition> {
        self.spells
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn spells_for_class(&self, class: &str) -> Vec<&SpellDefinition> {
        self.spells.iter().filter(|s| s.on_list(class)).collect()
    }

    pub fn weapon_by_name(&self, name: &str) -> Option<&WeaponItem> {
        self.weapons
            .iter()
            .find(|w| w.name().eq_ignore_ascii_case(name.trim()))
    }
}

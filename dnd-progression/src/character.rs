//! The character aggregate.
//!
//! [`Character`] owns every piece of state the progression engine touches:
//! ability scores, class levels, hit points, features, resources, the spell
//! book and the benefit ledger. Derived values (ability totals, proficiency
//! bonus, total level) are computed on read and never stored.

use crate::benefits::{Benefit, BenefitRecord, BenefitSource, BenefitTracker, SourceKind};
use crate::catalog::UsesDefinition;
use crate::items::{ArmorCategory, Equipment, Inventory, WeaponCategory, WeaponItem};
use crate::resources::{ResourceEntry, ResourceId, ResourceTracker};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// One ability: the rolled/assigned base plus bonuses from benefits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    pub base: u8,
    /// Sum of live ability benefits. Only changed through
    /// [`Character::apply_benefit`] and [`Character::revoke_benefits`].
    extra: i8,
}

impl AbilityScore {
    pub fn new(base: u8) -> Self {
        Self { base, extra: 0 }
    }

    pub fn extra(&self) -> i8 {
        self.extra
    }

    /// Base plus extra, clamped to 1..=30.
    pub fn total(&self) -> u8 {
        (self.base as i16 + self.extra as i16).clamp(1, 30) as u8
    }
}

/// Ability scores container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: AbilityScore,
    pub dexterity: AbilityScore,
    pub constitution: AbilityScore,
    pub intelligence: AbilityScore,
    pub wisdom: AbilityScore,
    pub charisma: AbilityScore,
}

impl AbilityScores {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: AbilityScore::new(str),
            dexterity: AbilityScore::new(dex),
            constitution: AbilityScore::new(con),
            intelligence: AbilityScore::new(int),
            wisdom: AbilityScore::new(wis),
            charisma: AbilityScore::new(cha),
        }
    }

    pub fn standard_array() -> Self {
        Self::new(15, 14, 13, 12, 10, 8)
    }

    fn score(&self, ability: Ability) -> &AbilityScore {
        match ability {
            Ability::Strength => &self.strength,
            Ability::Dexterity => &self.dexterity,
            Ability::Constitution => &self.constitution,
            Ability::Intelligence => &self.intelligence,
            Ability::Wisdom => &self.wisdom,
            Ability::Charisma => &self.charisma,
        }
    }

    fn score_mut(&mut self, ability: Ability) -> &mut AbilityScore {
        match ability {
            Ability::Strength => &mut self.strength,
            Ability::Dexterity => &mut self.dexterity,
            Ability::Constitution => &mut self.constitution,
            Ability::Intelligence => &mut self.intelligence,
            Ability::Wisdom => &mut self.wisdom,
            Ability::Charisma => &mut self.charisma,
        }
    }

    /// Total score (base + extra).
    pub fn get(&self, ability: Ability) -> u8 {
        self.score(ability).total()
    }

    pub fn base(&self, ability: Ability) -> u8 {
        self.score(ability).base
    }

    pub fn extra(&self, ability: Ability) -> i8 {
        self.score(ability).extra
    }

    pub fn set_base(&mut self, ability: Ability, value: u8) {
        self.score_mut(ability).base = value;
    }

    pub fn modifier(&self, ability: Ability) -> i8 {
        let score = self.get(ability) as i8;
        (score - 10).div_euclid(2)
    }

    pub(crate) fn adjust_extra(&mut self, ability: Ability, delta: i8) {
        let score = self.score_mut(ability);
        score.extra = score.extra.saturating_add(delta);
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Skills
// ============================================================================

/// D&D 5e skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Athletics,
    Acrobatics,
    SleightOfHand,
    Stealth,
    Arcana,
    History,
    Investigation,
    Nature,
    Religion,
    AnimalHandling,
    Insight,
    Medicine,
    Perception,
    Survival,
    Deception,
    Intimidation,
    Performance,
    Persuasion,
}

impl Skill {
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Athletics => "Athletics",
            Skill::Acrobatics => "Acrobatics",
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Stealth => "Stealth",
            Skill::Arcana => "Arcana",
            Skill::History => "History",
            Skill::Investigation => "Investigation",
            Skill::Nature => "Nature",
            Skill::Religion => "Religion",
            Skill::AnimalHandling => "Animal Handling",
            Skill::Insight => "Insight",
            Skill::Medicine => "Medicine",
            Skill::Perception => "Perception",
            Skill::Survival => "Survival",
            Skill::Deception => "Deception",
            Skill::Intimidation => "Intimidation",
            Skill::Performance => "Performance",
            Skill::Persuasion => "Persuasion",
        }
    }

    pub fn all() -> [Skill; 18] {
        [
            Skill::Athletics,
            Skill::Acrobatics,
            Skill::SleightOfHand,
            Skill::Stealth,
            Skill::Arcana,
            Skill::History,
            Skill::Investigation,
            Skill::Nature,
            Skill::Religion,
            Skill::AnimalHandling,
            Skill::Insight,
            Skill::Medicine,
            Skill::Perception,
            Skill::Survival,
            Skill::Deception,
            Skill::Intimidation,
            Skill::Performance,
            Skill::Persuasion,
        ]
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Proficiency level for skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProficiencyLevel {
    #[default]
    None,
    Half,
    Proficient,
    Expertise,
}

impl ProficiencyLevel {
    pub fn bonus(&self, proficiency_bonus: i8) -> i8 {
        match self {
            ProficiencyLevel::None => 0,
            ProficiencyLevel::Half => proficiency_bonus / 2,
            ProficiencyLevel::Proficient => proficiency_bonus,
            ProficiencyLevel::Expertise => proficiency_bonus * 2,
        }
    }
}

// ============================================================================
// Hit Points and Health
// ============================================================================

/// Hit points tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub maximum: i32,
    pub temporary: i32,
}

impl HitPoints {
    pub fn new(maximum: i32) -> Self {
        Self {
            current: maximum,
            maximum,
            temporary: 0,
        }
    }

    pub fn take_damage(&mut self, amount: i32) {
        let mut remaining = amount;
        if self.temporary > 0 {
            let absorbed = self.temporary.min(remaining);
            self.temporary -= absorbed;
            remaining -= absorbed;
        }
        self.current = (self.current - remaining).max(0);
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let old = self.current;
        self.current = (self.current + amount).min(self.maximum);
        self.current - old
    }

    pub fn add_temp_hp(&mut self, amount: i32) {
        self.temporary = self.temporary.max(amount);
    }

    /// Raise the maximum, raising current by the same amount.
    pub fn increase_maximum(&mut self, amount: i32) {
        self.maximum += amount;
        self.current += amount;
    }

    /// Lower the maximum (floor 1) and clamp current to it.
    pub fn decrease_maximum(&mut self, amount: i32) {
        self.maximum = (self.maximum - amount).max(1);
        self.current = self.current.min(self.maximum);
    }
}

/// Hit dice tracking, keyed by die size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitDice {
    pub total: HashMap<u8, u8>,
    pub remaining: HashMap<u8, u8>,
}

impl HitDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, die: u8, count: u8) {
        *self.total.entry(die).or_insert(0) += count;
        *self.remaining.entry(die).or_insert(0) += count;
    }

    /// Remove one die of a size, from both the total and the remaining pool.
    pub fn remove(&mut self, die: u8) {
        if let Some(total) = self.total.get_mut(&die) {
            *total = total.saturating_sub(1);
            let total = *total;
            if let Some(remaining) = self.remaining.get_mut(&die) {
                *remaining = (*remaining).min(total);
            }
            if total == 0 {
                self.total.remove(&die);
                self.remaining.remove(&die);
            }
        }
    }

    pub fn spend(&mut self, die: u8) -> bool {
        if let Some(remaining) = self.remaining.get_mut(&die) {
            if *remaining > 0 {
                *remaining -= 1;
                return true;
            }
        }
        false
    }

    /// Long rest: regain half of the total dice, rounded up.
    pub fn recover_half(&mut self) {
        for (die, total) in &self.total {
            let to_recover = total.div_ceil(2);
            let remaining = self.remaining.entry(*die).or_insert(0);
            *remaining = (*remaining + to_recover).min(*total);
        }
    }

    pub fn total_count(&self) -> u8 {
        self.total.values().sum()
    }
}

/// Movement speed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speed {
    pub walk: u32,
    pub swim: Option<u32>,
    pub fly: Option<u32>,
    pub climb: Option<u32>,
}

impl Speed {
    pub fn new(walk: u32) -> Self {
        Self {
            walk,
            swim: None,
            fly: None,
            climb: None,
        }
    }

    fn adjust_walk(&mut self, delta: i32) {
        self.walk = (self.walk as i32 + delta).max(0) as u32;
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::new(30)
    }
}

// ============================================================================
// Classes and Features
// ============================================================================

/// Levels held in one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLevel {
    pub class: String,
    pub level: u8,
    pub subclass: Option<String>,
}

impl ClassLevel {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            level: 0,
            subclass: None,
        }
    }
}

/// Where a feature came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureSource {
    Class { class: String, level: u8 },
    Subclass { class: String, subclass: String, level: u8 },
    Species(String),
    Origin(String),
    Feat(String),
}

impl FeatureSource {
    /// Class and level for class and subclass features.
    pub fn class_level(&self) -> Option<(&str, u8)> {
        match self {
            FeatureSource::Class { class, level } => Some((class, *level)),
            FeatureSource::Subclass { class, level, .. } => Some((class, *level)),
            _ => None,
        }
    }

    /// True for class or subclass features of `class` at `level` or later.
    pub fn is_class_level_at_or_above(&self, class: &str, level: u8) -> bool {
        matches!(self.class_level(), Some((c, l)) if c.eq_ignore_ascii_case(class) && l >= level)
    }
}

impl fmt::Display for FeatureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureSource::Class { class, level } => write!(f, "{class} level {level}"),
            FeatureSource::Subclass {
                class,
                subclass,
                level,
            } => write!(f, "{subclass} ({class} level {level})"),
            FeatureSource::Species(name) => write!(f, "{name} trait"),
            FeatureSource::Origin(name) => write!(f, "{name} origin"),
            FeatureSource::Feat(name) => write!(f, "{name} feat"),
        }
    }
}

/// A granted feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub description: String,
    pub source: FeatureSource,
    /// Limited uses; the live counter is in [`Character::resources`].
    pub uses: Option<UsesDefinition>,
}

/// A proficiency granted by a class level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Proficiency {
    Armor(ArmorCategory),
    Weapon(WeaponProficiency),
    SavingThrow(Ability),
}

impl fmt::Display for Proficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Proficiency::Armor(armor) => write!(f, "{}", armor.name()),
            Proficiency::Weapon(weapon) => write!(f, "{weapon}"),
            Proficiency::SavingThrow(ability) => write!(f, "{} saving throws", ability.name()),
        }
    }
}

/// Weapon training, by category or for one named weapon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponProficiency {
    Category(WeaponCategory),
    Named(String),
}

impl fmt::Display for WeaponProficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeaponProficiency::Category(category) => write!(f, "{}", category.name()),
            WeaponProficiency::Named(name) => write!(f, "{name}"),
        }
    }
}

/// A fighting style and the feature that allowed it.
///
/// Fighter and Paladin both have a feature named "Fighting Style", so the
/// style is tied to the feature's source as well as its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenFightingStyle {
    pub name: String,
    pub granted_by: String,
    pub source: FeatureSource,
}

/// Spells the character can cast. Slots live in the resource tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellBook {
    pub cantrips: Vec<String>,
    pub known: Vec<String>,
    pub prepared: Vec<String>,
}

impl SpellBook {
    pub fn knows(&self, spell: &str) -> bool {
        self.cantrips
            .iter()
            .chain(self.known.iter())
            .any(|s| s.eq_ignore_ascii_case(spell))
    }

    pub fn is_prepared(&self, spell: &str) -> bool {
        self.prepared.iter().any(|s| s.eq_ignore_ascii_case(spell))
    }

    /// Forget a spell everywhere it appears. Returns true if it was known.
    pub fn forget(&mut self, spell: &str) -> bool {
        let before = self.cantrips.len() + self.known.len();
        self.cantrips.retain(|s| !s.eq_ignore_ascii_case(spell));
        self.known.retain(|s| !s.eq_ignore_ascii_case(spell));
        self.prepared.retain(|s| !s.eq_ignore_ascii_case(spell));
        before != self.cantrips.len() + self.known.len()
    }
}

// ============================================================================
// Level History
// ============================================================================

/// The Ability Score Improvement choice made at a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsiRecord {
    Abilities(Vec<(Ability, u8)>),
    Feat(String),
}

/// What one applied level granted, kept so the level can be removed exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub class: String,
    pub class_level: u8,
    pub total_level: u8,
    pub hp_gained: i32,
    pub proficiencies_gained: Vec<Proficiency>,
    pub subclass_chosen: Option<String>,
    pub asi: Option<AsiRecord>,
    pub skills_chosen: Vec<Skill>,
}

impl LevelRecord {
    pub fn new(class: impl Into<String>, class_level: u8, total_level: u8, hp_gained: i32) -> Self {
        Self {
            class: class.into(),
            class_level,
            total_level,
            hp_gained,
            proficiencies_gained: Vec::new(),
            subclass_chosen: None,
            asi: None,
            skills_chosen: Vec::new(),
        }
    }
}

// ============================================================================
// Character
// ============================================================================

/// A player character and everything progression can change about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,

    // Core stats
    pub ability_scores: AbilityScores,
    pub classes: Vec<ClassLevel>,

    // Health
    pub hit_points: HitPoints,
    pub hit_dice: HitDice,
    pub speed: Speed,

    // Features and consumables
    pub features: Vec<Feature>,
    pub resources: ResourceTracker,
    pub spellbook: SpellBook,

    // Choices
    pub feats: Vec<String>,
    pub fighting_styles: Vec<ChosenFightingStyle>,
    pub maneuvers: Vec<String>,
    pub weapon_masteries: Vec<String>,

    // Proficiencies
    pub skill_proficiencies: HashMap<Skill, ProficiencyLevel>,
    pub saving_throw_proficiencies: HashSet<Ability>,
    pub weapon_proficiencies: Vec<WeaponProficiency>,
    pub armor_proficiencies: Vec<ArmorCategory>,
    pub languages: Vec<String>,
    pub resistances: Vec<String>,

    // Provenance
    pub benefits: BenefitTracker,
    pub level_history: Vec<LevelRecord>,

    // Species and origin
    pub species: Option<String>,
    pub origin: Option<String>,

    // Equipment
    pub inventory: Inventory,
    pub equipment: Equipment,
}

impl Character {
    /// A level-0 character with no class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            ability_scores: AbilityScores::default(),
            classes: Vec::new(),
            hit_points: HitPoints::new(0),
            hit_dice: HitDice::new(),
            speed: Speed::default(),
            features: Vec::new(),
            resources: ResourceTracker::new(),
            spellbook: SpellBook::default(),
            feats: Vec::new(),
            fighting_styles: Vec::new(),
            maneuvers: Vec::new(),
            weapon_masteries: Vec::new(),
            skill_proficiencies: HashMap::new(),
            saving_throw_proficiencies: HashSet::new(),
            weapon_proficiencies: Vec::new(),
            armor_proficiencies: Vec::new(),
            languages: vec!["Common".to_string()],
            resistances: Vec::new(),
            benefits: BenefitTracker::new(),
            level_history: Vec::new(),
            species: None,
            origin: None,
            inventory: Inventory::default(),
            equipment: Equipment::default(),
        }
    }

    /// Sum of all class levels.
    pub fn total_level(&self) -> u8 {
        self.classes.iter().map(|c| c.level).sum()
    }

    pub fn proficiency_bonus(&self) -> i8 {
        proficiency_bonus_for_level(self.total_level())
    }

    pub fn class_level(&self, class: &str) -> Option<&ClassLevel> {
        self.classes
            .iter()
            .find(|c| c.class.eq_ignore_ascii_case(class))
    }

    pub fn class_level_mut(&mut self, class: &str) -> Option<&mut ClassLevel> {
        self.classes
            .iter_mut()
            .find(|c| c.class.eq_ignore_ascii_case(class))
    }

    /// Levels held in `class`, 0 if none.
    pub fn levels_in(&self, class: &str) -> u8 {
        self.class_level(class).map(|c| c.level).unwrap_or(0)
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn has_feat(&self, name: &str) -> bool {
        self.feats.iter().any(|f| f.eq_ignore_ascii_case(name))
    }

    /// Fighting style chosen through a feature or taken as a feat.
    pub fn has_fighting_style(&self, name: &str) -> bool {
        self.fighting_styles
            .iter()
            .any(|s| s.name.eq_ignore_ascii_case(name))
            || self.has_feat(name)
    }

    pub fn has_mastery(&self, weapon: &str) -> bool {
        self.weapon_masteries
            .iter()
            .any(|w| w.eq_ignore_ascii_case(weapon))
    }

    pub fn skill_modifier(&self, skill: Skill) -> i8 {
        let ability_mod = self.ability_scores.modifier(skill.ability());
        let proficiency = self
            .skill_proficiencies
            .get(&skill)
            .copied()
            .unwrap_or(ProficiencyLevel::None);
        ability_mod + proficiency.bonus(self.proficiency_bonus())
    }

    pub fn saving_throw_modifier(&self, ability: Ability) -> i8 {
        let ability_mod = self.ability_scores.modifier(ability);
        if self.saving_throw_proficiencies.contains(&ability) {
            ability_mod + self.proficiency_bonus()
        } else {
            ability_mod
        }
    }

    pub fn passive_perception(&self) -> i8 {
        10 + self.skill_modifier(Skill::Perception)
    }

    pub fn is_proficient_in(&self, skill: Skill) -> bool {
        self.skill_proficiencies
            .get(&skill)
            .is_some_and(|p| *p != ProficiencyLevel::None)
    }

    pub fn is_proficient_with(&self, weapon: &WeaponItem) -> bool {
        self.weapon_proficiencies.iter().any(|p| match p {
            WeaponProficiency::Category(category) => *category == weapon.category,
            WeaponProficiency::Named(name) => name.eq_ignore_ascii_case(weapon.name()),
        })
    }

    pub fn has_proficiency(&self, proficiency: &Proficiency) -> bool {
        match proficiency {
            Proficiency::Armor(armor) => self.armor_proficiencies.contains(armor),
            Proficiency::Weapon(weapon) => self.weapon_proficiencies.contains(weapon),
            Proficiency::SavingThrow(ability) => self.saving_throw_proficiencies.contains(ability),
        }
    }

    /// Add a proficiency. Returns false if the character already had it.
    pub fn add_proficiency(&mut self, proficiency: Proficiency) -> bool {
        if self.has_proficiency(&proficiency) {
            return false;
        }
        match proficiency {
            Proficiency::Armor(armor) => self.armor_proficiencies.push(armor),
            Proficiency::Weapon(weapon) => self.weapon_proficiencies.push(weapon),
            Proficiency::SavingThrow(ability) => {
                self.saving_throw_proficiencies.insert(ability);
            }
        }
        true
    }

    pub fn remove_proficiency(&mut self, proficiency: &Proficiency) {
        match proficiency {
            Proficiency::Armor(armor) => self.armor_proficiencies.retain(|a| a != armor),
            Proficiency::Weapon(weapon) => self.weapon_proficiencies.retain(|w| w != weapon),
            Proficiency::SavingThrow(ability) => {
                self.saving_throw_proficiencies.remove(ability);
            }
        }
    }

    /// Tracked spell slot of a level, if the character has any.
    pub fn spell_slot(&self, level: u8) -> Option<&ResourceEntry> {
        self.resources.get(&ResourceId::SpellSlot(level))
    }

    /// Record a benefit and apply its effect in one step.
    pub fn apply_benefit(&mut self, source: BenefitSource, benefit: Benefit) {
        match &benefit {
            Benefit::AbilityScore { ability, amount } => {
                self.ability_scores.adjust_extra(*ability, *amount);
            }
            Benefit::Skill(skill) => {
                self.skill_proficiencies
                    .entry(*skill)
                    .and_modify(|p| {
                        if *p == ProficiencyLevel::None || *p == ProficiencyLevel::Half {
                            *p = ProficiencyLevel::Proficient;
                        }
                    })
                    .or_insert(ProficiencyLevel::Proficient);
            }
            Benefit::Language(language) => {
                if !self.languages.iter().any(|l| l.eq_ignore_ascii_case(language)) {
                    self.languages.push(language.clone());
                }
            }
            Benefit::HitPoints(hp) => self.hit_points.increase_maximum(*hp),
            Benefit::Speed(speed) => self.speed.adjust_walk(*speed),
            Benefit::Resistance(damage) => {
                if !self.resistances.iter().any(|r| r.eq_ignore_ascii_case(damage)) {
                    self.resistances.push(damage.clone());
                }
            }
        }
        self.benefits.grant(source, benefit);
    }

    /// Revoke every benefit from a source and undo each effect.
    ///
    /// Skills, languages and resistances stay when another live record
    /// still grants them.
    pub fn revoke_benefits(&mut self, kind: SourceKind, name: &str) -> Vec<BenefitRecord> {
        let revoked = self.benefits.revoke_by_source(kind, name);
        for record in &revoked {
            match &record.benefit {
                Benefit::AbilityScore { ability, amount } => {
                    self.ability_scores.adjust_extra(*ability, -*amount);
                }
                Benefit::Skill(skill) => {
                    if !self.benefits.grants_skill(*skill) {
                        self.skill_proficiencies.remove(skill);
                    }
                }
                Benefit::Language(language) => {
                    if !self.benefits.grants_language(language)
                        && !language.eq_ignore_ascii_case("Common")
                    {
                        self.languages.retain(|l| !l.eq_ignore_ascii_case(language));
                    }
                }
                Benefit::HitPoints(hp) => self.hit_points.decrease_maximum(*hp),
                Benefit::Speed(speed) => self.speed.adjust_walk(-*speed),
                Benefit::Resistance(damage) => {
                    if !self.benefits.grants_resistance(damage) {
                        self.resistances.retain(|r| !r.eq_ignore_ascii_case(damage));
                    }
                }
            }
        }
        revoked
    }
}

/// Proficiency bonus for a total character level.
pub fn proficiency_bonus_for_level(level: u8) -> i8 {
    match level {
        0..=4 => 2,
        5..=8 => 3,
        9..=12 => 4,
        13..=16 => 5,
        _ => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ability_modifier() {
        let scores = AbilityScores::new(10, 12, 14, 8, 15, 3);
        assert_eq!(scores.modifier(Ability::Strength), 0);
        assert_eq!(scores.modifier(Ability::Dexterity), 1);
        assert_eq!(scores.modifier(Ability::Constitution), 2);
        assert_eq!(scores.modifier(Ability::Intelligence), -1);
        assert_eq!(scores.modifier(Ability::Wisdom), 2);
        assert_eq!(scores.modifier(Ability::Charisma), -4);
    }

    #[test]
    fn test_total_recomputed_from_base_and_extra() {
        let mut scores = AbilityScores::standard_array();
        scores.adjust_extra(Ability::Strength, 2);
        assert_eq!(scores.get(Ability::Strength), 17);

        scores.set_base(Ability::Strength, 10);
        assert_eq!(scores.get(Ability::Strength), 12);

        scores.adjust_extra(Ability::Strength, 30);
        assert_eq!(scores.get(Ability::Strength), 30);
    }

    #[test]
    fn test_proficiency_bonus() {
        assert_eq!(proficiency_bonus_for_level(0), 2);
        assert_eq!(proficiency_bonus_for_level(4), 2);
        assert_eq!(proficiency_bonus_for_level(5), 3);
        assert_eq!(proficiency_bonus_for_level(12), 4);
        assert_eq!(proficiency_bonus_for_level(17), 6);
        assert_eq!(proficiency_bonus_for_level(20), 6);
    }

    #[test]
    fn test_apply_and_revoke_benefit() {
        let mut character = Character::new("Tess");
        character.hit_points = HitPoints::new(10);

        character.apply_benefit(BenefitSource::feat("Tough"), Benefit::HitPoints(4));
        character.apply_benefit(
            BenefitSource::feat("Tough"),
            Benefit::AbilityScore {
                ability: Ability::Constitution,
                amount: 1,
            },
        );
        assert_eq!(character.hit_points.maximum, 14);
        assert_eq!(character.ability_scores.extra(Ability::Constitution), 1);

        let revoked = character.revoke_benefits(SourceKind::Feat, "Tough");
        assert_eq!(revoked.len(), 2);
        assert_eq!(character.hit_points.maximum, 10);
        assert_eq!(character.ability_scores.extra(Ability::Constitution), 0);
    }

    #[test]
    fn test_shared_skill_survives_revoke() {
        let mut character = Character::new("Tess");
        character.apply_benefit(BenefitSource::origin("Soldier"), Benefit::Skill(Skill::Athletics));
        character.apply_benefit(BenefitSource::species("Elf"), Benefit::Skill(Skill::Athletics));

        character.revoke_benefits(SourceKind::Species, "Elf");
        assert!(character.is_proficient_in(Skill::Athletics));

        character.revoke_benefits(SourceKind::Origin, "Soldier");
        assert!(!character.is_proficient_in(Skill::Athletics));
    }

    #[test]
    fn test_hp_revoke_floors_at_one() {
        let mut character = Character::new("Tess");
        character.hit_points = HitPoints::new(3);
        character.benefits.grant(BenefitSource::feat("Tough"), Benefit::HitPoints(8));

        character.revoke_benefits(SourceKind::Feat, "Tough");
        assert_eq!(character.hit_points.maximum, 1);
        assert_eq!(character.hit_points.current, 1);
    }

    #[test]
    fn test_hit_dice_recover_half() {
        let mut dice = HitDice::new();
        dice.add(10, 3);
        for _ in 0..3 {
            assert!(dice.spend(10));
        }
        assert!(!dice.spend(10));

        dice.recover_half();
        assert_eq!(dice.remaining[&10], 2);

        dice.remove(10);
        assert_eq!(dice.total[&10], 2);
        assert_eq!(dice.remaining[&10], 2);
    }

    #[test]
    fn test_proficiency_bookkeeping() {
        let mut character = Character::new("Tess");
        let martial = Proficiency::Weapon(WeaponProficiency::Category(WeaponCategory::Martial));
        assert!(character.add_proficiency(martial.clone()));
        assert!(!character.add_proficiency(martial.clone()));

        let longsword = crate::items::get_weapon("Longsword").unwrap();
        assert!(character.is_proficient_with(&longsword));

        character.remove_proficiency(&martial);
        assert!(!character.is_proficient_with(&longsword));
    }
}

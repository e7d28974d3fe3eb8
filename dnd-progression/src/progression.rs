//! Character progression engine.
//!
//! [`ProgressionEngine`] borrows an immutable [`RuleCatalog`] and applies
//! rule-checked changes to a [`Character`]:
//!
//! 1. Level up in a class (hit points, hit dice, proficiencies, features)
//! 2. Resolve the choices a level opens (subclass, skills, ASI or feat)
//! 3. Keep resources in step with levels (feature uses, spell slots)
//! 4. Rest, spend and restore resources
//!
//! Every stat change goes through [`Character::apply_benefit`] so that the
//! benefit ledger can undo it later. Removing a level lives in
//! [`crate::delevel`].

use crate::benefits::{Benefit, BenefitSource, SourceKind};
use crate::catalog::{
    full_caster_slots, pact_slots, CasterType, ClassDefinition, FeatBenefit, FeatCategory, FeatDefinition,
    FeatureDefinition, OriginDefinition, RuleCatalog, SubclassDefinition,
};
use crate::character::{
    proficiency_bonus_for_level, Ability, AsiRecord, Character, ChosenFightingStyle, ClassLevel,
    Feature, FeatureSource, LevelRecord, Proficiency, Skill,
};
use crate::config::ProgressionConfig;
use crate::error::{ProgressionError, Result};
use crate::resources::{ResourceId, RestType};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

// ============================================================================
// Inputs and results
// ============================================================================

/// How hit points are determined for a new level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HpChoice {
    /// Fixed value: half the hit die plus one.
    Average,
    /// A hit die result rolled by the caller.
    Rolled(u8),
}

impl HpChoice {
    /// Roll the hit die now.
    pub fn roll(hit_die: u8) -> Self {
        HpChoice::Rolled(rand::thread_rng().gen_range(1..=hit_die.max(1)))
    }
}

/// A pending skill pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillChoice {
    pub count: u8,
    /// Allowed skills; empty means any skill.
    pub options: Vec<Skill>,
}

impl SkillChoice {
    pub fn any(count: u8) -> Self {
        Self {
            count,
            options: Vec::new(),
        }
    }

    pub fn allows(&self, skill: Skill) -> bool {
        self.options.is_empty() || self.options.contains(&skill)
    }

    /// Skills from the allowed set the character can still pick.
    pub fn remaining_options(&self, character: &Character) -> Vec<Skill> {
        Skill::all()
            .into_iter()
            .filter(|s| self.allows(*s) && !character.is_proficient_in(*s))
            .collect()
    }
}

/// What taking a level would do, computed without touching the character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpPreview {
    pub class_name: String,
    pub old_level: u8,
    pub new_level: u8,
    pub new_total_level: u8,
    pub is_new_class: bool,
    pub hit_die: u8,
    pub hp_average: i32,
    pub hp_min: i32,
    pub hp_max: i32,
    pub features_gained: Vec<String>,
    pub proficiencies_gained: Vec<Proficiency>,
    pub requires_subclass: bool,
    pub skill_choice: Option<SkillChoice>,
    pub asi_available: bool,
    pub requires_spells: bool,
    pub new_proficiency_bonus: i8,
}

/// Outcome of an applied level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpResult {
    pub class_name: String,
    pub old_level: u8,
    pub new_level: u8,
    pub new_total_level: u8,
    pub hp_gained: i32,
    pub features_gained: Vec<String>,
    pub proficiencies_gained: Vec<Proficiency>,
    pub requires_subclass: bool,
    pub skill_choice: Option<SkillChoice>,
    pub asi_available: bool,
    pub requires_spells: bool,
}

impl LevelUpResult {
    pub fn requires_skills(&self) -> bool {
        self.skill_choice.is_some()
    }
}

/// Outcome of choosing a subclass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubclassResult {
    pub subclass: String,
    pub features_gained: Vec<String>,
    /// Skill picks opened by the subclass's features.
    pub skill_choice: Option<SkillChoice>,
}

/// Outcome of a rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestResult {
    pub rest: RestType,
    pub resources_reset: Vec<ResourceId>,
    pub hp_restored: i32,
    pub hit_dice_recovered: u8,
}

/// Limits for an ability score allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoostRules {
    /// Points that must be spent, exactly.
    pub total: u8,
    pub per_ability_cap: u8,
    /// Abilities that may be raised; `None` means any.
    pub allowed: Option<Vec<Ability>>,
    /// No boost may push a score above this.
    pub score_cap: u8,
}

impl BoostRules {
    /// Ability Score Improvement: any abilities, budget from the config.
    pub fn asi(config: &ProgressionConfig) -> Self {
        Self {
            total: config.asi_points,
            per_ability_cap: config.asi_per_ability_cap,
            allowed: None,
            score_cap: config.ability_score_cap,
        }
    }

    /// Origin boosts: three points among the origin's three abilities.
    pub fn origin(origin: &OriginDefinition, score_cap: u8) -> Self {
        Self {
            total: 3,
            per_ability_cap: 2,
            allowed: Some(origin.abilities.clone()),
            score_cap,
        }
    }
}

/// A feat together with the choices it asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatSelection {
    pub feat: String,
    /// Target of the feat's ability choice, if it has one.
    pub ability: Option<Ability>,
    pub skills: Vec<Skill>,
    pub languages: Vec<String>,
}

impl FeatSelection {
    pub fn new(feat: impl Into<String>) -> Self {
        Self {
            feat: feat.into(),
            ..Default::default()
        }
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_skills(mut self, skills: Vec<Skill>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }
}

/// What to do with an Ability Score Improvement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsiChoice {
    Abilities(HashMap<Ability, u8>),
    Feat(FeatSelection),
}

// ============================================================================
// ProgressionEngine
// ============================================================================

/// Applies rule-checked progression changes to characters.
#[derive(Debug, Clone)]
pub struct ProgressionEngine<'a> {
    catalog: &'a RuleCatalog,
    config: ProgressionConfig,
}

impl<'a> ProgressionEngine<'a> {
    pub fn new(catalog: &'a RuleCatalog) -> Self {
        Self::with_config(catalog, ProgressionConfig::default())
    }

    pub fn with_config(catalog: &'a RuleCatalog, config: ProgressionConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'a RuleCatalog {
        self.catalog
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    pub(crate) fn class_def(&self, name: &str) -> Result<&'a ClassDefinition> {
        self.catalog
            .class_by_name(name)
            .ok_or_else(|| ProgressionError::UnknownClass(name.to_string()))
    }

    fn subclass_def(&self, class: &ClassLevel) -> Option<&'a SubclassDefinition> {
        let def = self.catalog.class_by_name(&class.class)?;
        def.subclass(class.subclass.as_deref()?)
    }

    // ========================================================================
    // Level up
    // ========================================================================

    /// Preview a level in `class` without changing the character.
    pub fn level_up_preview(&self, character: &Character, class: &str) -> Result<LevelUpPreview> {
        let def = self.class_def(class)?;
        let old_level = character.levels_in(&def.name);
        let mut scratch = character.clone();
        let result = self.apply_level(&mut scratch, def, HpChoice::Average)?;

        let (hp_min, hp_max) = if character.total_level() == 0 {
            (result.hp_gained, result.hp_gained)
        } else {
            (
                self.level_hit_points(character, 1),
                self.level_hit_points(character, def.hit_die as i32),
            )
        };

        Ok(LevelUpPreview {
            class_name: def.name.clone(),
            old_level,
            new_level: result.new_level,
            new_total_level: result.new_total_level,
            is_new_class: old_level == 0,
            hit_die: def.hit_die,
            hp_average: result.hp_gained,
            hp_min,
            hp_max,
            features_gained: result.features_gained,
            proficiencies_gained: result.proficiencies_gained,
            requires_subclass: result.requires_subclass,
            skill_choice: result.skill_choice,
            asi_available: result.asi_available,
            requires_spells: result.requires_spells,
            new_proficiency_bonus: proficiency_bonus_for_level(result.new_total_level),
        })
    }

    /// Take a level in `class`.
    ///
    /// Applies hit points, a hit die, first-level proficiencies and the
    /// level's features, then reports which choices the level opens. The
    /// choices themselves are made with [`select_subclass`](Self::select_subclass),
    /// [`select_skills`](Self::select_skills) and
    /// [`apply_asi_choice`](Self::apply_asi_choice).
    pub fn level_up(&self, character: &mut Character, class: &str, hp: HpChoice) -> Result<LevelUpResult> {
        let def = self.class_def(class)?;
        let result = self.apply_level(character, def, hp)?;
        info!(
            character = %character.name,
            class = %result.class_name,
            level = result.new_level,
            total_level = result.new_total_level,
            hp_gained = result.hp_gained,
            "level up applied"
        );
        Ok(result)
    }

    fn apply_level(
        &self,
        character: &mut Character,
        def: &'a ClassDefinition,
        hp: HpChoice,
    ) -> Result<LevelUpResult> {
        let total_level = character.total_level();
        if total_level >= self.config.max_level {
            return Err(ProgressionError::MaxLevelReached {
                max: self.config.max_level,
            });
        }

        let old_level = character.levels_in(&def.name);
        let is_new_class = old_level == 0;
        let first_character_level = total_level == 0;
        if is_new_class && !first_character_level && self.config.enforce_multiclass_prerequisites {
            self.check_multiclass(character, def)?;
        }

        // Hit points
        let hp_gained = if first_character_level {
            self.level_hit_points(character, def.hit_die as i32)
        } else {
            match hp {
                HpChoice::Average => self.level_hit_points(character, def.hit_die as i32 / 2 + 1),
                HpChoice::Rolled(roll) => {
                    if self.config.validate_rolled_hp && (roll == 0 || roll > def.hit_die) {
                        return Err(ProgressionError::InvalidHitPointRoll {
                            roll,
                            hit_die: def.hit_die,
                        });
                    }
                    self.level_hit_points(character, roll as i32)
                }
            }
        };
        character.hit_points.increase_maximum(hp_gained);
        character.hit_dice.add(def.hit_die, 1);

        // Class level
        let new_level = match character.class_level_mut(&def.name) {
            Some(class_level) => {
                class_level.level += 1;
                class_level.level
            }
            None => {
                let mut class_level = ClassLevel::new(def.name.clone());
                class_level.level = 1;
                character.classes.push(class_level);
                1
            }
        };
        let new_total_level = character.total_level();
        let mut record = LevelRecord::new(def.name.clone(), new_level, new_total_level, hp_gained);

        // Proficiencies
        if is_new_class {
            for proficiency in def.starting_proficiencies(first_character_level) {
                if character.add_proficiency(proficiency.clone()) {
                    record.proficiencies_gained.push(proficiency);
                }
            }
        }

        // Features
        let (mut features_gained, mut feature_skills) =
            grant_class_features(character, def, new_level);
        let subclass = character
            .class_level(&def.name)
            .and_then(|c| self.subclass_def(c));
        if let Some(sub) = subclass {
            let (names, skills) = grant_subclass_features(character, def, sub, new_level);
            features_gained.extend(names);
            feature_skills += skills;
        }
        self.refresh_resources(character);

        // Choices this level opens
        let starting_skills = if is_new_class {
            def.starting_skill_count(first_character_level)
        } else {
            0
        };
        let skill_choice = match (starting_skills, feature_skills) {
            (0, 0) => None,
            (0, n) => Some(SkillChoice::any(n)),
            (n, m) => Some(SkillChoice {
                count: n + m,
                options: if m == 0 { def.skill_options.clone() } else { Vec::new() },
            }),
        };
        let requires_subclass =
            subclass.is_none() && !def.subclasses.is_empty() && new_level >= def.subclass_level;
        let requires_spells = def.caster.is_some() || subclass.is_some_and(|s| s.caster.is_some());

        character.level_history.push(record);

        Ok(LevelUpResult {
            class_name: def.name.clone(),
            old_level,
            new_level,
            new_total_level,
            hp_gained,
            features_gained,
            proficiencies_gained: character
                .level_history
                .last()
                .map(|r| r.proficiencies_gained.clone())
                .unwrap_or_default(),
            requires_subclass,
            skill_choice,
            asi_available: def.is_asi_level(new_level),
            requires_spells,
        })
    }

    fn check_multiclass(&self, character: &Character, def: &ClassDefinition) -> Result<()> {
        if !def.multiclass_requirement.is_met(&character.ability_scores) {
            return Err(ProgressionError::PrerequisiteNotMet {
                target: def.name.clone(),
                requirement: def.multiclass_requirement.to_string(),
            });
        }
        for class_level in &character.classes {
            if let Some(current) = self.catalog.class_by_name(&class_level.class) {
                if !current.multiclass_requirement.is_met(&character.ability_scores) {
                    return Err(ProgressionError::PrerequisiteNotMet {
                        target: format!("Multiclassing out of {}", current.name),
                        requirement: current.multiclass_requirement.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Hit points for one level given the die result: die + CON, floored at
    /// the configured minimum, plus per-level bonuses.
    fn level_hit_points(&self, character: &Character, die_result: i32) -> i32 {
        let con = character.ability_scores.modifier(Ability::Constitution) as i32;
        (die_result + con).max(self.config.minimum_hp_per_level) + self.per_level_hp_bonus(character)
    }

    /// Extra hit points per level from feats and species (Tough, Dwarven
    /// Toughness).
    pub fn per_level_hp_bonus(&self, character: &Character) -> i32 {
        let from_feats: i32 = character
            .feats
            .iter()
            .filter_map(|name| self.catalog.feat_by_name(name))
            .map(|feat| feat.hit_points_per_level() as i32)
            .sum();
        let from_species = character
            .species
            .as_deref()
            .and_then(|name| self.catalog.species_by_name(name))
            .map(|species| species.hp_per_level as i32)
            .unwrap_or(0);
        from_feats + from_species
    }

    // ========================================================================
    // Resources
    // ========================================================================

    /// Multiclass caster level: full + ceil(half / 2) + floor(third / 3).
    pub fn caster_level(&self, character: &Character) -> u8 {
        let (mut full, mut half, mut third) = (0u8, 0u8, 0u8);
        for class_level in &character.classes {
            match self.caster_type(class_level) {
                Some(CasterType::Full) => full += class_level.level,
                Some(CasterType::Half) => half += class_level.level,
                Some(CasterType::Third) => third += class_level.level,
                Some(CasterType::Pact) | None => {}
            }
        }
        full + half.div_ceil(2) + third / 3
    }

    fn pact_level(&self, character: &Character) -> u8 {
        character
            .classes
            .iter()
            .filter(|c| self.caster_type(c) == Some(CasterType::Pact))
            .map(|c| c.level)
            .sum()
    }

    fn caster_type(&self, class_level: &ClassLevel) -> Option<CasterType> {
        let def = self.catalog.class_by_name(&class_level.class)?;
        def.caster
            .or_else(|| self.subclass_def(class_level).and_then(|s| s.caster))
    }

    /// Bring the resource ledger in line with the character's features and
    /// levels. Entries without a remaining source are dropped; the rest keep
    /// their spent uses.
    pub(crate) fn refresh_resources(&self, character: &mut Character) {
        let mut desired: Vec<(ResourceId, u8, RestType)> = Vec::new();
        let total_level = character.total_level();

        for feature in &character.features {
            let Some(uses) = &feature.uses else {
                continue;
            };
            let level = match feature.source.class_level() {
                Some((class, _)) => character.levels_in(class),
                None => total_level,
            };
            merge_resource(
                &mut desired,
                uses.resource_id(&feature.name),
                uses.maximum(level, character),
                uses.rest,
            );
        }

        for (slot_level, count) in full_caster_slots(self.caster_level(character)) {
            desired.push((ResourceId::SpellSlot(slot_level), count, RestType::LongRest));
        }
        if let Some((slot_level, count)) = pact_slots(self.pact_level(character)) {
            desired.push((ResourceId::PactSlot(slot_level), count, RestType::ShortRest));
        }

        character
            .resources
            .retain(|entry| desired.iter().any(|(id, _, _)| *id == entry.id));
        for (id, maximum, rest) in desired {
            character.resources.track(id, maximum, rest);
        }
    }

    /// Spend one use of a feature's resource. Returns the uses remaining.
    pub fn use_feature(&self, character: &mut Character, feature_name: &str) -> Result<u8> {
        let id = feature_resource(character, feature_name)?;
        let remaining = character.resources.use_resource(&id)?;
        debug!(character = %character.name, resource = %id, remaining, "resource used");
        Ok(remaining)
    }

    /// Give back uses of a feature's resource, clamped at the maximum.
    pub fn restore_feature(&self, character: &mut Character, feature_name: &str, amount: u8) -> Result<u8> {
        let id = feature_resource(character, feature_name)?;
        character.resources.restore(&id, amount)
    }

    /// Take a rest. A long rest also restores hit points, clears temporary
    /// hit points and recovers half the hit dice.
    pub fn rest(&self, character: &mut Character, rest: RestType) -> RestResult {
        let resources_reset = character.resources.reset_for_rest(rest);
        let mut hp_restored = 0;
        let mut hit_dice_recovered = 0;

        if rest == RestType::LongRest {
            let missing = character.hit_points.maximum - character.hit_points.current;
            hp_restored = character.hit_points.heal(missing);
            character.hit_points.temporary = 0;

            let before: u8 = character.hit_dice.remaining.values().sum();
            character.hit_dice.recover_half();
            let after: u8 = character.hit_dice.remaining.values().sum();
            hit_dice_recovered = after.saturating_sub(before);
        }

        info!(
            character = %character.name,
            rest = %rest,
            reset = resources_reset.len(),
            hp_restored,
            "rest taken"
        );
        RestResult {
            rest,
            resources_reset,
            hp_restored,
            hit_dice_recovered,
        }
    }

    // ========================================================================
    // Ability Score Improvements and feats
    // ========================================================================

    /// Whether `level` in `class` grants an Ability Score Improvement.
    pub fn check_asi_available(&self, class: &str, level: u8) -> Result<bool> {
        Ok(self.class_def(class)?.is_asi_level(level))
    }

    /// Whether the character's current level in `class` has an unspent
    /// Ability Score Improvement.
    pub fn has_pending_asi(&self, character: &Character, class: &str) -> bool {
        let Ok(def) = self.class_def(class) else {
            return false;
        };
        let level = character.levels_in(&def.name);
        def.is_asi_level(level)
            && find_record(character, &def.name, level)
                .map(|idx| character.level_history[idx].asi.is_none())
                .unwrap_or(false)
    }

    /// Check an ability allocation against `rules`.
    pub fn validate_ability_boosts(
        &self,
        character: &Character,
        boosts: &HashMap<Ability, u8>,
        rules: &BoostRules,
    ) -> Result<()> {
        let spent: u32 = boosts.values().map(|v| *v as u32).sum();
        if spent != rules.total as u32 {
            return Err(ProgressionError::InvalidAllocation(format!(
                "must allocate exactly {} points, got {}",
                rules.total, spent
            )));
        }

        for (ability, amount) in boosts {
            if *amount == 0 {
                continue;
            }
            if *amount > rules.per_ability_cap {
                return Err(ProgressionError::InvalidAllocation(format!(
                    "cannot add more than {} to {}",
                    rules.per_ability_cap,
                    ability.name()
                )));
            }
            if let Some(allowed) = &rules.allowed {
                if !allowed.contains(ability) {
                    return Err(ProgressionError::InvalidAllocation(format!(
                        "{} cannot be increased by this choice",
                        ability.name()
                    )));
                }
            }
            let new_score = character.ability_scores.get(*ability) as u16 + *amount as u16;
            if new_score > rules.score_cap as u16 {
                return Err(ProgressionError::InvalidAllocation(format!(
                    "{} would exceed {}",
                    ability.name(),
                    rules.score_cap
                )));
            }
        }
        Ok(())
    }

    /// Spend the Ability Score Improvement of the character's current level
    /// in `class`. Returns the benefits granted.
    pub fn apply_asi_choice(&self, character: &mut Character, class: &str, choice: AsiChoice) -> Result<Vec<Benefit>> {
        let def = self.class_def(class)?;
        let level = character.levels_in(&def.name);
        if level == 0 {
            return Err(ProgressionError::NotInClass(def.name.clone()));
        }
        if !def.is_asi_level(level) {
            return Err(ProgressionError::NotAvailable(format!(
                "{} level {} has no Ability Score Improvement",
                def.name, level
            )));
        }
        let record = find_record(character, &def.name, level);
        let asi_source = BenefitSource::asi(&def.name, level);
        let already_spent = record.is_some_and(|idx| character.level_history[idx].asi.is_some())
            || character
                .benefits
                .has_source(SourceKind::AbilityScoreImprovement, &asi_source.name);
        if already_spent {
            return Err(ProgressionError::AlreadyChosen(format!(
                "Ability Score Improvement for {} level {}",
                def.name, level
            )));
        }

        let (granted, asi) = match choice {
            AsiChoice::Abilities(boosts) => {
                self.validate_ability_boosts(character, &boosts, &BoostRules::asi(&self.config))?;
                let mut increases: Vec<(Ability, u8)> =
                    boosts.into_iter().filter(|(_, v)| *v > 0).collect();
                increases.sort();

                let mut granted = Vec::new();
                for (ability, amount) in &increases {
                    let benefit = Benefit::AbilityScore {
                        ability: *ability,
                        amount: *amount as i8,
                    };
                    character.apply_benefit(asi_source.clone(), benefit.clone());
                    granted.push(benefit);
                }
                (granted, AsiRecord::Abilities(increases))
            }
            AsiChoice::Feat(selection) => {
                let granted = self.grant_feat(character, &selection)?;
                let name = character.feats.last().cloned().unwrap_or(selection.feat);
                (granted, AsiRecord::Feat(name))
            }
        };

        if let Some(idx) = record {
            character.level_history[idx].asi = Some(asi.clone());
        }
        self.refresh_resources(character);
        info!(character = %character.name, class = %def.name, level, choice = ?asi, "ability score improvement applied");
        Ok(granted)
    }

    /// Give the character a feat with its choices. Returns the benefits
    /// granted.
    pub fn grant_feat(&self, character: &mut Character, selection: &FeatSelection) -> Result<Vec<Benefit>> {
        let feat = self
            .catalog
            .feat_by_name(&selection.feat)
            .ok_or_else(|| ProgressionError::UnknownFeat(selection.feat.clone()))?;
        let taken = match feat.category {
            FeatCategory::FightingStyle => character.has_fighting_style(&feat.name),
            _ => character.has_feat(&feat.name),
        };
        if taken {
            return Err(ProgressionError::AlreadyChosen(feat.name.clone()));
        }
        if let Some(requirement) = feat.prerequisite.unmet(character) {
            return Err(ProgressionError::PrerequisiteNotMet {
                target: feat.name.clone(),
                requirement,
            });
        }
        validate_feat_selection(character, feat, selection)?;

        let cap = feat.ability_cap(self.config.ability_score_cap);
        let mut granted = Vec::new();
        let mut features = Vec::new();
        for benefit in &feat.benefits {
            match benefit {
                FeatBenefit::Ability { ability, amount } => {
                    push_capped_increase(&mut granted, character, *ability, *amount, cap);
                }
                FeatBenefit::AbilityChoice { amount, .. } => {
                    if let Some(ability) = selection.ability {
                        push_capped_increase(&mut granted, character, ability, *amount, cap);
                    }
                }
                FeatBenefit::Skill(skill) => granted.push(Benefit::Skill(*skill)),
                FeatBenefit::Language(language) => granted.push(Benefit::Language(language.clone())),
                FeatBenefit::HitPoints(hp) => granted.push(Benefit::HitPoints(*hp)),
                FeatBenefit::HitPointsPerLevel(per_level) => {
                    let lump = *per_level as i32 * character.total_level() as i32;
                    if lump > 0 {
                        granted.push(Benefit::HitPoints(lump));
                    }
                }
                FeatBenefit::Speed(speed) => granted.push(Benefit::Speed(*speed)),
                FeatBenefit::Resistance(damage) => granted.push(Benefit::Resistance(damage.clone())),
                FeatBenefit::Feature {
                    name,
                    description,
                    uses,
                } => features.push(Feature {
                    name: name.clone(),
                    description: description.clone(),
                    source: FeatureSource::Feat(feat.name.clone()),
                    uses: uses.clone(),
                }),
                FeatBenefit::SkillChoice(_) | FeatBenefit::LanguageChoice(_) => {}
            }
        }
        granted.extend(selection.skills.iter().map(|s| Benefit::Skill(*s)));
        granted.extend(selection.languages.iter().cloned().map(Benefit::Language));

        let source = BenefitSource::feat(&feat.name);
        for benefit in &granted {
            character.apply_benefit(source.clone(), benefit.clone());
        }
        character.features.extend(features);
        character.feats.push(feat.name.clone());
        self.refresh_resources(character);

        info!(character = %character.name, feat = %feat.name, benefits = granted.len(), "feat granted");
        Ok(granted)
    }

    /// Remove a feat and everything it granted. Returns the benefits
    /// revoked, or `None` if the character did not have the feat.
    pub(crate) fn remove_feat(&self, character: &mut Character, name: &str) -> Option<Vec<Benefit>> {
        let idx = character.feats.iter().position(|f| f.eq_ignore_ascii_case(name))?;
        let feat = character.feats.remove(idx);
        let revoked = character.revoke_benefits(SourceKind::Feat, &feat);
        character
            .features
            .retain(|f| !matches!(&f.source, FeatureSource::Feat(n) if n.eq_ignore_ascii_case(&feat)));
        debug!(character = %character.name, feat = %feat, "feat removed");
        Some(revoked.into_iter().map(|r| r.benefit).collect())
    }

    // ========================================================================
    // Species and origin
    // ========================================================================

    /// Set the character's species, replacing any previous one.
    pub fn set_species(&self, character: &mut Character, name: &str, skills: &[Skill]) -> Result<()> {
        let species = self
            .catalog
            .species_by_name(name)
            .ok_or_else(|| ProgressionError::UnknownSpecies(name.to_string()))?;
        validate_skill_picks(character, &SkillChoice::any(species.skill_choices), skills)?;

        if let Some(previous) = character.species.take() {
            character.revoke_benefits(SourceKind::Species, &previous);
            character
                .features
                .retain(|f| f.source != FeatureSource::Species(previous.clone()));
        }

        character.species = Some(species.name.clone());
        let walk = species.speed as i32 + character.benefits.speed_bonus();
        character.speed.walk = walk.max(0) as u32;

        let source = BenefitSource::species(&species.name);
        for benefit in species
            .benefits
            .iter()
            .cloned()
            .chain(skills.iter().map(|s| Benefit::Skill(*s)))
        {
            character.apply_benefit(source.clone(), benefit);
        }
        for species_trait in &species.traits {
            character.features.push(Feature {
                name: species_trait.name.clone(),
                description: species_trait.description.clone(),
                source: FeatureSource::Species(species.name.clone()),
                uses: species_trait.uses.clone(),
            });
        }
        self.refresh_resources(character);

        info!(character = %character.name, species = %species.name, "species set");
        Ok(())
    }

    /// Set the character's origin: ability boosts, two skills and the origin
    /// feat. Either everything applies or nothing does.
    pub fn set_origin(
        &self,
        character: &mut Character,
        name: &str,
        boosts: &HashMap<Ability, u8>,
        feat: Option<FeatSelection>,
    ) -> Result<()> {
        let origin = self
            .catalog
            .origin_by_name(name)
            .ok_or_else(|| ProgressionError::UnknownOrigin(name.to_string()))?;
        if let Some(current) = &character.origin {
            return Err(ProgressionError::AlreadyChosen(format!("origin {current}")));
        }
        self.validate_ability_boosts(
            character,
            boosts,
            &BoostRules::origin(origin, self.config.ability_score_cap),
        )?;
        let selection = feat.unwrap_or_else(|| FeatSelection::new(&origin.feat));
        if !selection.feat.eq_ignore_ascii_case(&origin.feat) {
            return Err(ProgressionError::NotAvailable(format!(
                "{} grants the {} feat",
                origin.name, origin.feat
            )));
        }

        let mut scratch = character.clone();
        let source = BenefitSource::origin(&origin.name);
        let mut increases: Vec<(Ability, u8)> =
            boosts.iter().filter(|(_, v)| **v > 0).map(|(a, v)| (*a, *v)).collect();
        increases.sort();
        for (ability, amount) in increases {
            scratch.apply_benefit(
                source.clone(),
                Benefit::AbilityScore {
                    ability,
                    amount: amount as i8,
                },
            );
        }
        for skill in &origin.skills {
            scratch.apply_benefit(source.clone(), Benefit::Skill(*skill));
        }
        scratch.origin = Some(origin.name.clone());
        self.grant_feat(&mut scratch, &selection)?;

        *character = scratch;
        info!(character = %character.name, origin = %origin.name, "origin set");
        Ok(())
    }

    // ========================================================================
    // Subclass and skills
    // ========================================================================

    /// Choose a subclass for `class`. Grants the subclass's benefits and
    /// every subclass feature up to the current class level.
    pub fn select_subclass(&self, character: &mut Character, class: &str, subclass: &str) -> Result<SubclassResult> {
        let def = self.class_def(class)?;
        let level = character.levels_in(&def.name);
        if level == 0 {
            return Err(ProgressionError::NotInClass(def.name.clone()));
        }
        if level < def.subclass_level {
            return Err(ProgressionError::NotAvailable(format!(
                "{} subclasses unlock at level {}",
                def.name, def.subclass_level
            )));
        }
        if let Some(current) = character.class_level(&def.name).and_then(|c| c.subclass.clone()) {
            return Err(ProgressionError::AlreadyChosen(current));
        }
        let sub = def
            .subclass(subclass.trim())
            .ok_or_else(|| ProgressionError::UnknownSubclass {
                class: def.name.clone(),
                subclass: subclass.to_string(),
            })?;

        if let Some(class_level) = character.class_level_mut(&def.name) {
            class_level.subclass = Some(sub.name.clone());
        }
        let source = BenefitSource::subclass(&sub.name);
        for benefit in &sub.benefits {
            character.apply_benefit(source.clone(), benefit.clone());
        }

        let mut features_gained = Vec::new();
        let mut skills = 0;
        for feature_level in 1..=level {
            let (names, picks) = grant_subclass_features(character, def, sub, feature_level);
            features_gained.extend(names);
            skills += picks;
        }

        if let Some(idx) = find_record(character, &def.name, level) {
            character.level_history[idx].subclass_chosen = Some(sub.name.clone());
        }
        self.refresh_resources(character);

        info!(character = %character.name, class = %def.name, subclass = %sub.name, "subclass chosen");
        Ok(SubclassResult {
            subclass: sub.name.clone(),
            features_gained,
            skill_choice: (skills > 0).then(|| SkillChoice::any(skills)),
        })
    }

    /// Make the skill picks a level in `class` opened.
    pub fn select_skills(
        &self,
        character: &mut Character,
        class: &str,
        choice: &SkillChoice,
        skills: &[Skill],
    ) -> Result<()> {
        let def = self.class_def(class)?;
        let level = character.levels_in(&def.name);
        if level == 0 {
            return Err(ProgressionError::NotInClass(def.name.clone()));
        }
        validate_skill_picks(character, choice, skills)?;

        let source = BenefitSource::class_level(&def.name, level);
        for skill in skills {
            character.apply_benefit(source.clone(), Benefit::Skill(*skill));
        }
        if let Some(idx) = find_record(character, &def.name, level) {
            character.level_history[idx].skills_chosen.extend_from_slice(skills);
        }

        debug!(character = %character.name, class = %def.name, ?skills, "skills chosen");
        Ok(())
    }

    // ========================================================================
    // Fighting styles, maneuvers, weapon mastery
    // ========================================================================

    fn feature_definition(&self, feature: &Feature) -> Option<&'a FeatureDefinition> {
        match &feature.source {
            FeatureSource::Class { class, level } => self
                .catalog
                .class_by_name(class)?
                .features_at(*level)
                .find(|f| f.name == feature.name),
            FeatureSource::Subclass {
                class,
                subclass,
                level,
            } => self
                .catalog
                .subclass_by_name(class, subclass)?
                .features_at(*level)
                .find(|f| f.name == feature.name),
            _ => None,
        }
    }

    /// Features that grant a fighting style and have not been used for one.
    pub fn open_fighting_style_features(&self, character: &Character) -> Vec<Feature> {
        character
            .features
            .iter()
            .filter(|f| self.feature_definition(f).is_some_and(|d| d.fighting_style))
            .filter(|f| {
                !character
                    .fighting_styles
                    .iter()
                    .any(|s| s.source == f.source && s.granted_by == f.name)
            })
            .cloned()
            .collect()
    }

    /// Choose a fighting style through a feature such as "Fighting Style".
    pub fn select_fighting_style(&self, character: &mut Character, style: &str, feature_name: &str) -> Result<()> {
        let style_def = self
            .catalog
            .fighting_style_by_name(style)
            .ok_or_else(|| ProgressionError::UnknownFightingStyle(style.to_string()))?;
        if character.has_fighting_style(&style_def.name) {
            return Err(ProgressionError::AlreadyChosen(style_def.name.clone()));
        }

        let granting: Vec<&Feature> = character
            .features
            .iter()
            .filter(|f| f.name.eq_ignore_ascii_case(feature_name.trim()))
            .filter(|f| self.feature_definition(f).is_some_and(|d| d.fighting_style))
            .collect();
        if granting.is_empty() {
            return Err(ProgressionError::NotAvailable(format!(
                "{feature_name} does not grant a fighting style"
            )));
        }
        let feature = granting
            .into_iter()
            .find(|f| {
                !character
                    .fighting_styles
                    .iter()
                    .any(|s| s.source == f.source && s.granted_by == f.name)
            })
            .ok_or_else(|| ProgressionError::AlreadyChosen(format!("a fighting style for {feature_name}")))?;

        let chosen = ChosenFightingStyle {
            name: style_def.name.clone(),
            granted_by: feature.name.clone(),
            source: feature.source.clone(),
        };
        character.fighting_styles.push(chosen);
        info!(character = %character.name, style = %style_def.name, "fighting style chosen");
        Ok(())
    }

    /// Maneuvers the character may know, from subclasses such as Battle Master.
    pub fn maneuver_allowance(&self, character: &Character) -> u8 {
        character
            .classes
            .iter()
            .filter_map(|c| self.subclass_def(c).map(|s| s.maneuvers_at(c.level)))
            .sum()
    }

    pub fn learn_maneuver(&self, character: &mut Character, name: &str) -> Result<()> {
        let maneuver = self
            .catalog
            .maneuver_by_name(name)
            .ok_or_else(|| ProgressionError::UnknownManeuver(name.to_string()))?;
        if character.maneuvers.iter().any(|m| m.eq_ignore_ascii_case(&maneuver.name)) {
            return Err(ProgressionError::AlreadyChosen(maneuver.name.clone()));
        }
        let allowance = self.maneuver_allowance(character);
        if character.maneuvers.len() >= allowance as usize {
            return Err(ProgressionError::NotAvailable(format!(
                "no maneuver choices remain ({allowance} known)"
            )));
        }
        character.maneuvers.push(maneuver.name.clone());
        debug!(character = %character.name, maneuver = %maneuver.name, "maneuver learned");
        Ok(())
    }

    /// Weapons the character may master: the best allowance among its
    /// classes, if it has the Weapon Mastery feature.
    pub fn mastery_allowance(&self, character: &Character) -> u8 {
        if !character.has_feature("Weapon Mastery") {
            return 0;
        }
        character
            .classes
            .iter()
            .filter_map(|c| self.catalog.class_by_name(&c.class).map(|d| d.mastery_count(c.level)))
            .max()
            .unwrap_or(0)
    }

    pub fn master_weapon(&self, character: &mut Character, weapon: &str) -> Result<()> {
        let item = self
            .catalog
            .weapon_by_name(weapon)
            .ok_or_else(|| ProgressionError::UnknownWeapon(weapon.to_string()))?;
        if item.mastery.is_none() {
            return Err(ProgressionError::NotAvailable(format!(
                "{} has no mastery property",
                item.name()
            )));
        }
        if character.has_mastery(item.name()) {
            return Err(ProgressionError::AlreadyChosen(item.name().to_string()));
        }
        let allowance = self.mastery_allowance(character);
        if character.weapon_masteries.len() >= allowance as usize {
            return Err(ProgressionError::NotAvailable(format!(
                "no weapon mastery choices remain ({allowance} mastered)"
            )));
        }
        character.weapon_masteries.push(item.name().to_string());
        debug!(character = %character.name, weapon = %item.name(), "weapon mastered");
        Ok(())
    }

    /// Forget a mastered weapon so another can be chosen.
    pub fn forget_weapon_mastery(&self, character: &mut Character, weapon: &str) -> bool {
        let before = character.weapon_masteries.len();
        character
            .weapon_masteries
            .retain(|w| !w.eq_ignore_ascii_case(weapon.trim()));
        before != character.weapon_masteries.len()
    }

    // ========================================================================
    // Spells
    // ========================================================================

    /// Highest spell slot level the character has, counting pact slots.
    pub fn highest_slot_level(&self, character: &Character) -> u8 {
        character
            .resources
            .iter()
            .filter_map(|entry| match entry.id {
                ResourceId::SpellSlot(level) | ResourceId::PactSlot(level) => Some(level),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Learn a spell through `class`. Cantrips need only the class list;
    /// leveled spells also need a slot of that level.
    pub fn learn_spell(&self, character: &mut Character, class: &str, spell: &str) -> Result<()> {
        let spell_def = self
            .catalog
            .spell_by_name(spell)
            .ok_or_else(|| ProgressionError::UnknownSpell(spell.to_string()))?;
        let def = self.class_def(class)?;
        let class_level = character
            .class_level(&def.name)
            .ok_or_else(|| ProgressionError::NotInClass(def.name.clone()))?;

        let subclass = self.subclass_def(class_level);
        let list = match (def.caster, subclass) {
            (Some(_), _) => def.name.as_str(),
            (None, Some(sub)) if sub.caster.is_some() => {
                sub.spell_list.as_deref().unwrap_or(def.name.as_str())
            }
            _ => {
                return Err(ProgressionError::NotAvailable(format!(
                    "{} cannot cast spells",
                    def.name
                )))
            }
        };
        if !spell_def.on_list(list) {
            return Err(ProgressionError::NotAvailable(format!(
                "{} is not on the {} spell list",
                spell_def.name, list
            )));
        }
        if !spell_def.is_cantrip() && spell_def.level > self.highest_slot_level(character) {
            return Err(ProgressionError::NotAvailable(format!(
                "no level {} spell slots",
                spell_def.level
            )));
        }
        if character.spellbook.knows(&spell_def.name) {
            return Err(ProgressionError::AlreadyChosen(spell_def.name.clone()));
        }

        if spell_def.is_cantrip() {
            character.spellbook.cantrips.push(spell_def.name.clone());
        } else {
            character.spellbook.known.push(spell_def.name.clone());
        }
        debug!(character = %character.name, spell = %spell_def.name, "spell learned");
        Ok(())
    }

    pub fn prepare_spell(&self, character: &mut Character, spell: &str) -> Result<()> {
        let spell_def = self
            .catalog
            .spell_by_name(spell)
            .ok_or_else(|| ProgressionError::UnknownSpell(spell.to_string()))?;
        if spell_def.is_cantrip() {
            return Err(ProgressionError::NotAvailable(format!(
                "{} is a cantrip and is always ready",
                spell_def.name
            )));
        }
        if !character.spellbook.knows(&spell_def.name) {
            return Err(ProgressionError::NotAvailable(format!(
                "{} is not known",
                spell_def.name
            )));
        }
        if character.spellbook.is_prepared(&spell_def.name) {
            return Err(ProgressionError::AlreadyChosen(spell_def.name.clone()));
        }
        character.spellbook.prepared.push(spell_def.name.clone());
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Index of the level record for `class` at `class_level`.
pub(crate) fn find_record(character: &Character, class: &str, class_level: u8) -> Option<usize> {
    character
        .level_history
        .iter()
        .rposition(|r| r.class.eq_ignore_ascii_case(class) && r.class_level == class_level)
}

fn grant_feature(
    character: &mut Character,
    def: &FeatureDefinition,
    source: FeatureSource,
    benefit_source: &BenefitSource,
) {
    character.features.push(Feature {
        name: def.name.clone(),
        description: def.description.clone(),
        source,
        uses: def.uses.clone(),
    });
    for benefit in &def.benefits {
        character.apply_benefit(benefit_source.clone(), benefit.clone());
    }
}

/// Grant the class features of one level. Returns their names and the skill
/// picks they open.
fn grant_class_features(character: &mut Character, def: &ClassDefinition, level: u8) -> (Vec<String>, u8) {
    let benefit_source = BenefitSource::class_level(&def.name, level);
    let mut names = Vec::new();
    let mut skills = 0;
    for feature in def.features_at(level) {
        let source = FeatureSource::Class {
            class: def.name.clone(),
            level,
        };
        grant_feature(character, feature, source, &benefit_source);
        names.push(feature.name.clone());
        skills += feature.skill_choices;
    }
    (names, skills)
}

fn grant_subclass_features(
    character: &mut Character,
    def: &ClassDefinition,
    sub: &SubclassDefinition,
    level: u8,
) -> (Vec<String>, u8) {
    let benefit_source = BenefitSource::class_level(&def.name, level);
    let mut names = Vec::new();
    let mut skills = 0;
    for feature in sub.features_at(level) {
        let source = FeatureSource::Subclass {
            class: def.name.clone(),
            subclass: sub.name.clone(),
            level,
        };
        grant_feature(character, feature, source, &benefit_source);
        names.push(feature.name.clone());
        skills += feature.skill_choices;
    }
    (names, skills)
}

/// Add a resource to the desired set. Two features feeding one pool keep the
/// larger maximum and the more frequent reset.
fn merge_resource(desired: &mut Vec<(ResourceId, u8, RestType)>, id: ResourceId, maximum: u8, rest: RestType) {
    fn frequency(rest: RestType) -> u8 {
        match rest {
            RestType::ShortRest => 0,
            RestType::LongRest => 1,
            RestType::Daily => 2,
        }
    }

    match desired.iter_mut().find(|(existing, _, _)| *existing == id) {
        Some(entry) => {
            entry.1 = entry.1.max(maximum);
            if frequency(rest) < frequency(entry.2) {
                entry.2 = rest;
            }
        }
        None => desired.push((id, maximum, rest)),
    }
}

fn feature_resource(character: &Character, feature_name: &str) -> Result<ResourceId> {
    let name = feature_name.trim();
    match character.features.iter().find(|f| f.name.eq_ignore_ascii_case(name)) {
        Some(feature) => match &feature.uses {
            Some(uses) => Ok(uses.resource_id(&feature.name)),
            None => Err(ProgressionError::NotAvailable(format!(
                "{} has no limited uses",
                feature.name
            ))),
        },
        None => {
            let id = ResourceId::feature(name);
            if character.resources.contains(&id) {
                Ok(id)
            } else {
                Err(ProgressionError::UnknownResource(name.to_string()))
            }
        }
    }
}

fn push_capped_increase(granted: &mut Vec<Benefit>, character: &Character, ability: Ability, amount: u8, cap: u8) {
    let room = cap.saturating_sub(character.ability_scores.get(ability));
    let amount = amount.min(room);
    if amount > 0 {
        granted.push(Benefit::AbilityScore {
            ability,
            amount: amount as i8,
        });
    }
}

fn validate_skill_picks(character: &Character, choice: &SkillChoice, skills: &[Skill]) -> Result<()> {
    if skills.len() != choice.count as usize {
        return Err(ProgressionError::InvalidSkillChoice(format!(
            "choose exactly {} skills, got {}",
            choice.count,
            skills.len()
        )));
    }
    let mut seen = HashSet::new();
    for skill in skills {
        if !seen.insert(*skill) {
            return Err(ProgressionError::InvalidSkillChoice(format!(
                "{} chosen twice",
                skill.name()
            )));
        }
        if !choice.allows(*skill) {
            return Err(ProgressionError::InvalidSkillChoice(format!(
                "{} is not one of the options",
                skill.name()
            )));
        }
        if character.is_proficient_in(*skill) {
            return Err(ProgressionError::InvalidSkillChoice(format!(
                "already proficient in {}",
                skill.name()
            )));
        }
    }
    Ok(())
}

fn validate_feat_selection(character: &Character, feat: &FeatDefinition, selection: &FeatSelection) -> Result<()> {
    match (feat.ability_choice(), selection.ability) {
        (Some((options, _)), Some(ability)) if !options.contains(&ability) => {
            return Err(ProgressionError::InvalidAllocation(format!(
                "{} cannot increase {}",
                feat.name,
                ability.name()
            )));
        }
        (Some(_), None) => {
            return Err(ProgressionError::NoSelection(format!(
                "ability score for {}",
                feat.name
            )));
        }
        (None, Some(_)) => {
            return Err(ProgressionError::InvalidAllocation(format!(
                "{} has no ability score choice",
                feat.name
            )));
        }
        _ => {}
    }

    validate_skill_picks(character, &SkillChoice::any(feat.skill_choices()), &selection.skills)?;

    let expected = feat.language_choices() as usize;
    if selection.languages.len() != expected {
        return Err(ProgressionError::InvalidAllocation(format!(
            "{} grants {} languages, got {}",
            feat.name,
            expected,
            selection.languages.len()
        )));
    }
    for language in &selection.languages {
        if character.languages.iter().any(|l| l.eq_ignore_ascii_case(language)) {
            return Err(ProgressionError::AlreadyChosen(language.clone()));
        }
    }
    Ok(())
}

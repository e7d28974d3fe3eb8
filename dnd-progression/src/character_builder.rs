//! Character builder for level 1 characters.
//!
//! Collects species, origin, ability scores and class choices, then builds
//! the character through the [`ProgressionEngine`] so every grant lands in
//! the benefit ledger and the level history.

use crate::catalog::FeatCategory;
use crate::character::{Ability, AbilityScores, Character, Skill};
use crate::error::ProgressionError;
use crate::progression::{FeatSelection, HpChoice, ProgressionEngine};
use rand::Rng;
use std::collections::HashMap;
use tracing::info;

/// Method for determining ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbilityMethod {
    /// Standard array: 15, 14, 13, 12, 10, 8
    #[default]
    StandardArray,
    /// Point buy: 27 points, scores 8-15
    PointBuy,
    /// Roll 4d6, drop lowest, 6 times
    Rolled,
}

impl AbilityMethod {
    pub fn name(&self) -> &'static str {
        match self {
            AbilityMethod::StandardArray => "Standard Array",
            AbilityMethod::PointBuy => "Point Buy",
            AbilityMethod::Rolled => "Rolled",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AbilityMethod::StandardArray => "Assign 15, 14, 13, 12, 10, 8 to your abilities",
            AbilityMethod::PointBuy => "Spend 27 points to customize your scores (8-15 range)",
            AbilityMethod::Rolled => "Roll 4d6, drop the lowest die, six times",
        }
    }

    pub fn all() -> &'static [AbilityMethod] {
        &[
            AbilityMethod::StandardArray,
            AbilityMethod::PointBuy,
            AbilityMethod::Rolled,
        ]
    }
}

/// Standard array values.
pub const STANDARD_ARRAY: [u8; 6] = [15, 14, 13, 12, 10, 8];

/// Total points available for point buy.
pub const POINT_BUY_TOTAL: u8 = 27;

/// Point buy costs for each score value.
pub fn point_buy_cost(score: u8) -> Option<u8> {
    match score {
        8 => Some(0),
        9 => Some(1),
        10 => Some(2),
        11 => Some(3),
        12 => Some(4),
        13 => Some(5),
        14 => Some(7),
        15 => Some(9),
        _ => None,
    }
}

/// Builder for level 1 characters.
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    name: Option<String>,
    species: Option<String>,
    species_skills: Vec<Skill>,
    species_feat: Option<FeatSelection>,
    origin: Option<String>,
    origin_boosts: HashMap<Ability, u8>,
    origin_feat: Option<FeatSelection>,
    class: Option<String>,
    ability_scores: Option<AbilityScores>,
    ability_method: AbilityMethod,
    selected_skills: Vec<Skill>,
}

/// Error from character building.
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderError {
    MissingName,
    MissingSpecies,
    MissingOrigin,
    MissingClass,
    MissingAbilityScores,
    InvalidAbilityScores(String),
    SpeciesFeatNotAllowed(String),
    Progression(ProgressionError),
}

impl std::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuilderError::MissingName => write!(f, "Character name is required"),
            BuilderError::MissingSpecies => write!(f, "Species selection is required"),
            BuilderError::MissingOrigin => write!(f, "Origin selection is required"),
            BuilderError::MissingClass => write!(f, "Class selection is required"),
            BuilderError::MissingAbilityScores => write!(f, "Ability scores are required"),
            BuilderError::InvalidAbilityScores(reason) => write!(f, "Invalid ability scores: {reason}"),
            BuilderError::SpeciesFeatNotAllowed(species) => {
                write!(f, "{species} does not grant an extra Origin feat")
            }
            BuilderError::Progression(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for BuilderError {}

impl From<ProgressionError> for BuilderError {
    fn from(e: ProgressionError) -> Self {
        BuilderError::Progression(e)
    }
}

impl CharacterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the species and any skills its traits let the player pick.
    pub fn species(mut self, species: impl Into<String>, skills: Vec<Skill>) -> Self {
        self.species = Some(species.into());
        self.species_skills = skills;
        self
    }

    /// Extra Origin feat for species with the Versatile trait.
    pub fn species_feat(mut self, selection: FeatSelection) -> Self {
        self.species_feat = Some(selection);
        self
    }

    /// Set the origin and its ability boosts (+2/+1 or +1/+1/+1 among the
    /// origin's three abilities).
    pub fn origin(mut self, origin: impl Into<String>, boosts: HashMap<Ability, u8>) -> Self {
        self.origin = Some(origin.into());
        self.origin_boosts = boosts;
        self
    }

    /// Choices for an origin feat that needs them (Skilled, for example).
    pub fn origin_feat(mut self, selection: FeatSelection) -> Self {
        self.origin_feat = Some(selection);
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set ability scores from standard array assignment.
    ///
    /// `assignment` maps each standard array value (15, 14, 13, 12, 10, 8) to an ability.
    pub fn standard_array(mut self, assignment: [(u8, Ability); 6]) -> Self {
        let mut scores = AbilityScores::default();
        for (value, ability) in assignment {
            scores.set_base(ability, value);
        }
        self.ability_scores = Some(scores);
        self.ability_method = AbilityMethod::StandardArray;
        self
    }

    pub fn point_buy(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self.ability_method = AbilityMethod::PointBuy;
        self
    }

    pub fn rolled(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self.ability_method = AbilityMethod::Rolled;
        self
    }

    /// Set the skills selected from class options.
    pub fn skills(mut self, skills: Vec<Skill>) -> Self {
        self.selected_skills = skills;
        self
    }

    /// Build the character: species, then origin, then the first class
    /// level and its skill picks.
    pub fn build(self, engine: &ProgressionEngine<'_>) -> Result<Character, BuilderError> {
        let name = self.name.ok_or(BuilderError::MissingName)?;
        let species = self.species.ok_or(BuilderError::MissingSpecies)?;
        let origin = self.origin.ok_or(BuilderError::MissingOrigin)?;
        let class = self.class.ok_or(BuilderError::MissingClass)?;
        let scores = self
            .ability_scores
            .ok_or(BuilderError::MissingAbilityScores)?;
        validate_scores(&scores, self.ability_method).map_err(BuilderError::InvalidAbilityScores)?;

        let mut character = Character::new(&name);
        character.ability_scores = scores;

        engine.set_species(&mut character, &species, &self.species_skills)?;
        if let Some(selection) = &self.species_feat {
            let versatile = engine
                .catalog()
                .species_by_name(&species)
                .is_some_and(|s| s.traits.iter().any(|t| t.name == "Versatile"));
            let origin_feat = engine
                .catalog()
                .feat_by_name(&selection.feat)
                .is_some_and(|f| f.category == FeatCategory::Origin);
            if !versatile || !origin_feat {
                return Err(BuilderError::SpeciesFeatNotAllowed(species));
            }
            engine.grant_feat(&mut character, selection)?;
        }
        engine.set_origin(&mut character, &origin, &self.origin_boosts, self.origin_feat)?;

        let result = engine.level_up(&mut character, &class, HpChoice::Average)?;
        match result.skill_choice {
            Some(choice) => engine.select_skills(&mut character, &class, &choice, &self.selected_skills)?,
            None if !self.selected_skills.is_empty() => {
                return Err(ProgressionError::InvalidSkillChoice(format!("{class} grants no skill choices")).into());
            }
            None => {}
        }

        info!(character = %character.name, species = %species, origin = %origin, class = %class, "character built");
        Ok(character)
    }
}

fn validate_scores(scores: &AbilityScores, method: AbilityMethod) -> Result<(), String> {
    match method {
        AbilityMethod::StandardArray => {
            let mut values: Vec<u8> = Ability::all().iter().map(|a| scores.base(*a)).collect();
            values.sort_by(|a, b| b.cmp(a));
            if values != STANDARD_ARRAY {
                return Err("each standard array value must be used exactly once".to_string());
            }
            Ok(())
        }
        AbilityMethod::PointBuy => validate_point_buy(scores),
        AbilityMethod::Rolled => {
            for ability in Ability::all() {
                let score = scores.base(ability);
                if !(3..=18).contains(&score) {
                    return Err(format!(
                        "{} score {} is out of range (3-18)",
                        ability.abbreviation(),
                        score
                    ));
                }
            }
            Ok(())
        }
    }
}

/// Roll 4d6, drop lowest, for ability score generation.
pub fn roll_4d6_drop_lowest() -> u8 {
    let mut rng = rand::thread_rng();
    let mut rolls: Vec<u8> = (0..4).map(|_| rng.gen_range(1..=6)).collect();
    rolls.sort();
    rolls[1..].iter().sum()
}

/// Roll a full set of ability scores (6 values), highest first.
pub fn roll_ability_scores() -> [u8; 6] {
    let mut scores = [0u8; 6];
    for score in scores.iter_mut() {
        *score = roll_4d6_drop_lowest();
    }
    scores.sort_by(|a, b| b.cmp(a));
    scores
}

/// Validate point buy base scores.
pub fn validate_point_buy(scores: &AbilityScores) -> Result<(), String> {
    let mut total_cost = 0u8;

    for ability in Ability::all() {
        let score = scores.base(ability);
        let cost = point_buy_cost(score).ok_or_else(|| {
            format!(
                "{} score {} is out of range (8-15)",
                ability.abbreviation(),
                score
            )
        })?;
        total_cost += cost;
    }

    if total_cost > POINT_BUY_TOTAL {
        return Err(format!(
            "Total point cost {total_cost} exceeds maximum {POINT_BUY_TOTAL}"
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RuleCatalog;
    use crate::testing::assert_benefits_consistent;

    fn soldier_boosts() -> HashMap<Ability, u8> {
        HashMap::from([(Ability::Strength, 2), (Ability::Constitution, 1)])
    }

    fn fighter_array() -> [(u8, Ability); 6] {
        [
            (15, Ability::Strength),
            (14, Ability::Constitution),
            (13, Ability::Dexterity),
            (12, Ability::Wisdom),
            (10, Ability::Intelligence),
            (8, Ability::Charisma),
        ]
    }

    #[test]
    fn test_build_dwarf_fighter() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let character = CharacterBuilder::new()
            .name("Thorin")
            .species("Dwarf", vec![])
            .origin("Soldier", soldier_boosts())
            .class("Fighter")
            .standard_array(fighter_array())
            .skills(vec![Skill::Perception, Skill::Survival])
            .build(&engine)
            .expect("Should build successfully");

        assert_eq!(character.name, "Thorin");
        assert_eq!(character.total_level(), 1);
        assert_eq!(character.ability_scores.get(Ability::Strength), 17);
        assert_eq!(character.ability_scores.base(Ability::Strength), 15);
        assert_eq!(character.ability_scores.get(Ability::Constitution), 15);
        // Fighter d10 + CON 2 + Dwarven Toughness 1
        assert_eq!(character.hit_points.maximum, 13);
        assert!(character.has_feat("Savage Attacker"));
        assert!(character.is_proficient_in(Skill::Athletics));
        assert!(character.is_proficient_in(Skill::Intimidation));
        assert!(character.is_proficient_in(Skill::Survival));
        assert!(character.has_feature("Dwarven Resilience"));
        assert_benefits_consistent(&character);
    }

    #[test]
    fn test_human_versatile_feat() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let builder = CharacterBuilder::new()
            .name("Mara")
            .species("Human", vec![Skill::Stealth])
            .species_feat(FeatSelection::new("Alert"))
            .origin("Soldier", soldier_boosts())
            .class("Fighter")
            .standard_array(fighter_array())
            .skills(vec![Skill::Perception, Skill::Survival]);

        let character = builder.clone().build(&engine).expect("Should build successfully");
        assert!(character.has_feat("Alert"));
        assert!(character.has_feat("Savage Attacker"));
        assert!(character.is_proficient_in(Skill::Stealth));

        let err = builder
            .species("Dwarf", vec![])
            .build(&engine)
            .unwrap_err();
        assert_eq!(err, BuilderError::SpeciesFeatNotAllowed("Dwarf".to_string()));
    }

    #[test]
    fn test_missing_fields_and_bad_scores() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);

        let err = CharacterBuilder::new().build(&engine).unwrap_err();
        assert_eq!(err, BuilderError::MissingName);

        let err = CharacterBuilder::new()
            .name("Odd")
            .species("Elf", vec![])
            .origin("Sage", HashMap::from([(Ability::Intelligence, 2), (Ability::Wisdom, 1)]))
            .class("Wizard")
            .point_buy(AbilityScores::new(15, 15, 15, 15, 8, 8))
            .build(&engine)
            .unwrap_err();
        assert!(matches!(err, BuilderError::InvalidAbilityScores(_)));
    }

    #[test]
    fn test_engine_errors_are_wrapped() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let err = CharacterBuilder::new()
            .name("Lost")
            .species("Elf", vec![])
            .origin("Nowhere", HashMap::new())
            .class("Fighter")
            .standard_array(fighter_array())
            .build(&engine)
            .unwrap_err();
        assert_eq!(
            err,
            BuilderError::Progression(ProgressionError::UnknownOrigin("Nowhere".to_string()))
        );
        assert_eq!(err.to_string(), "Unknown origin: Nowhere");
    }

    #[test]
    fn test_point_buy_validation() {
        assert!(validate_point_buy(&AbilityScores::new(15, 15, 15, 8, 8, 8)).is_ok());
        assert!(validate_point_buy(&AbilityScores::new(15, 15, 15, 15, 8, 8)).is_err());
        assert!(validate_point_buy(&AbilityScores::new(16, 8, 8, 8, 8, 8)).is_err());
    }

    #[test]
    fn test_roll_ability_scores_sorted() {
        let scores = roll_ability_scores();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert!(scores.iter().all(|s| (3..=18).contains(s)));
    }
}

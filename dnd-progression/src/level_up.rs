//! Interactive level-up flow.
//!
//! [`LevelUpFlow`] walks one level-up attempt through its steps:
//!
//! ```text
//! SelectClass -> Confirm -> [SelectSubclass] -> [SelectSkills] -> [SelectAsi -> SelectAbilities | SelectFeat] -> Complete
//! ```
//!
//! A full copy of the character is taken when the flow starts. Cancelling
//! at any step before `Complete` restores it, so a level is applied with all
//! of its choices or not at all. Errors leave the flow on its current step
//! with the message stored for display.

use crate::character::{Ability, Character, Skill};
use crate::error::{ProgressionError, Result};
use crate::progression::{
    AsiChoice, FeatSelection, HpChoice, LevelUpPreview, LevelUpResult, ProgressionEngine, SkillChoice,
};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Steps of a level-up attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelUpStep {
    Idle,
    SelectClass,
    Confirm,
    SelectSubclass,
    SelectSkills,
    SelectAsi,
    SelectAbilities,
    SelectFeat,
    Complete,
}

impl LevelUpStep {
    pub fn name(&self) -> &'static str {
        match self {
            LevelUpStep::Idle => "idle",
            LevelUpStep::SelectClass => "choosing a class",
            LevelUpStep::Confirm => "confirming the level",
            LevelUpStep::SelectSubclass => "choosing a subclass",
            LevelUpStep::SelectSkills => "choosing skills",
            LevelUpStep::SelectAsi => "choosing an ability score improvement",
            LevelUpStep::SelectAbilities => "allocating ability points",
            LevelUpStep::SelectFeat => "choosing a feat",
            LevelUpStep::Complete => "finished",
        }
    }
}

/// The two ways to spend an Ability Score Improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsiPath {
    Abilities,
    Feat,
}

/// One level-up attempt.
#[derive(Debug, Clone)]
pub struct LevelUpFlow {
    step: LevelUpStep,
    snapshot: Option<Character>,
    class: Option<String>,
    preview: Option<LevelUpPreview>,
    result: Option<LevelUpResult>,
    pending: VecDeque<LevelUpStep>,
    skill_choices: VecDeque<SkillChoice>,
    message: Option<String>,
}

impl Default for LevelUpFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelUpFlow {
    pub fn new() -> Self {
        Self {
            step: LevelUpStep::Idle,
            snapshot: None,
            class: None,
            preview: None,
            result: None,
            pending: VecDeque::new(),
            skill_choices: VecDeque::new(),
            message: None,
        }
    }

    pub fn step(&self) -> LevelUpStep {
        self.step
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn preview(&self) -> Option<&LevelUpPreview> {
        self.preview.as_ref()
    }

    pub fn result(&self) -> Option<&LevelUpResult> {
        self.result.as_ref()
    }

    /// Last error message, cleared when a step succeeds.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The skill pick the `SelectSkills` step is waiting for.
    pub fn current_skill_choice(&self) -> Option<&SkillChoice> {
        self.skill_choices.front()
    }

    /// True between starting and completing (or cancelling) a level.
    pub fn is_in_progress(&self) -> bool {
        !matches!(self.step, LevelUpStep::Idle | LevelUpStep::Complete)
    }

    /// Start a level-up, snapshotting the character.
    pub fn show(&mut self, character: &Character) -> Result<()> {
        self.require(&[LevelUpStep::Idle, LevelUpStep::Complete], "start a level up")?;
        *self = Self::new();
        self.snapshot = Some(character.clone());
        self.step = LevelUpStep::SelectClass;
        Ok(())
    }

    /// Pick the class to level. May be called again from `Confirm` to change
    /// the pick.
    pub fn select_class(&mut self, engine: &ProgressionEngine<'_>, character: &Character, class: &str) -> Result<()> {
        self.require(&[LevelUpStep::SelectClass, LevelUpStep::Confirm], "select a class")?;
        let preview = engine.level_up_preview(character, class);
        let preview = self.track(preview)?;
        self.class = Some(preview.class_name.clone());
        self.preview = Some(preview);
        self.step = LevelUpStep::Confirm;
        Ok(())
    }

    /// Apply the level and route to the choices it opens.
    pub fn confirm(&mut self, engine: &ProgressionEngine<'_>, character: &mut Character, hp: HpChoice) -> Result<()> {
        self.require(&[LevelUpStep::Confirm], "confirm")?;
        let class = self.selected_class()?;
        let result = engine.level_up(character, &class, hp);
        let result = self.track(result)?;

        if result.requires_subclass {
            self.pending.push_back(LevelUpStep::SelectSubclass);
        }
        if let Some(choice) = &result.skill_choice {
            self.pending.push_back(LevelUpStep::SelectSkills);
            self.skill_choices.push_back(choice.clone());
        }
        if result.asi_available {
            self.pending.push_back(LevelUpStep::SelectAsi);
        }
        self.result = Some(result);
        self.advance();
        Ok(())
    }

    pub fn choose_subclass(&mut self, engine: &ProgressionEngine<'_>, character: &mut Character, subclass: &str) -> Result<()> {
        self.require(&[LevelUpStep::SelectSubclass], "choose a subclass")?;
        let class = self.selected_class()?;
        let result = engine.select_subclass(character, &class, subclass);
        let result = self.track(result)?;

        if let Some(choice) = result.skill_choice {
            self.pending.push_front(LevelUpStep::SelectSkills);
            self.skill_choices.push_front(choice);
        }
        if let Some(level) = self.result.as_mut() {
            level.features_gained.extend(result.features_gained);
        }
        self.advance();
        Ok(())
    }

    pub fn choose_skills(&mut self, engine: &ProgressionEngine<'_>, character: &mut Character, skills: &[Skill]) -> Result<()> {
        self.require(&[LevelUpStep::SelectSkills], "choose skills")?;
        let class = self.selected_class()?;
        let choice = match self.skill_choices.front() {
            Some(choice) => choice.clone(),
            None => return self.track(Err(ProgressionError::NoSelection("skill choice".to_string()))),
        };
        let result = engine.select_skills(character, &class, &choice, skills);
        self.track(result)?;
        self.skill_choices.pop_front();
        self.advance();
        Ok(())
    }

    pub fn choose_asi_path(&mut self, path: AsiPath) -> Result<()> {
        self.require(&[LevelUpStep::SelectAsi], "choose an improvement")?;
        self.step = match path {
            AsiPath::Abilities => LevelUpStep::SelectAbilities,
            AsiPath::Feat => LevelUpStep::SelectFeat,
        };
        self.message = None;
        Ok(())
    }

    pub fn allocate_abilities(
        &mut self,
        engine: &ProgressionEngine<'_>,
        character: &mut Character,
        boosts: HashMap<Ability, u8>,
    ) -> Result<()> {
        self.require(&[LevelUpStep::SelectAbilities], "allocate ability points")?;
        let class = self.selected_class()?;
        let result = engine.apply_asi_choice(character, &class, AsiChoice::Abilities(boosts));
        self.track(result)?;
        self.advance();
        Ok(())
    }

    pub fn choose_feat(
        &mut self,
        engine: &ProgressionEngine<'_>,
        character: &mut Character,
        selection: FeatSelection,
    ) -> Result<()> {
        self.require(&[LevelUpStep::SelectFeat], "choose a feat")?;
        let class = self.selected_class()?;
        let result = engine.apply_asi_choice(character, &class, AsiChoice::Feat(selection));
        self.track(result)?;
        self.advance();
        Ok(())
    }

    /// Step back without cancelling: from the ASI sub-steps to the ASI
    /// choice, or from `Confirm` to class selection.
    pub fn back(&mut self) -> Result<()> {
        match self.step {
            LevelUpStep::SelectAbilities | LevelUpStep::SelectFeat => {
                self.step = LevelUpStep::SelectAsi;
            }
            LevelUpStep::Confirm => {
                self.step = LevelUpStep::SelectClass;
                self.preview = None;
                self.class = None;
            }
            step => {
                return self.track(Err(ProgressionError::InvalidStep {
                    action: "go back",
                    step: step.name(),
                }))
            }
        }
        self.message = None;
        Ok(())
    }

    /// Abandon the attempt. Before `Complete` the character is restored to
    /// the snapshot taken by [`show`](Self::show).
    pub fn cancel(&mut self, character: &mut Character) {
        if self.is_in_progress() {
            if let Some(snapshot) = self.snapshot.take() {
                *character = snapshot;
            }
            debug!(character = %character.name, step = self.step.name(), "level up cancelled");
        }
        *self = Self::new();
    }

    /// Leave the `Complete` step.
    pub fn finish(&mut self) -> Result<()> {
        self.require(&[LevelUpStep::Complete], "finish")?;
        *self = Self::new();
        Ok(())
    }

    fn advance(&mut self) {
        self.step = self.pending.pop_front().unwrap_or(LevelUpStep::Complete);
        self.message = None;
    }

    fn selected_class(&mut self) -> Result<String> {
        match &self.class {
            Some(class) => Ok(class.clone()),
            None => self.track(Err(ProgressionError::NoSelection("class".to_string()))),
        }
    }

    fn require(&mut self, allowed: &[LevelUpStep], action: &'static str) -> Result<()> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            self.track(Err(ProgressionError::InvalidStep {
                action,
                step: self.step.name(),
            }))
        }
    }

    /// Store the error message, if any, and pass the result through.
    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.message = None,
            Err(e) => self.message = Some(e.to_string()),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RuleCatalog;
    use crate::testing::{fighter, new_character};

    #[test]
    fn test_first_level_routes_to_skills() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = new_character("Tess");
        let mut flow = LevelUpFlow::new();

        flow.show(&character).unwrap();
        flow.select_class(&engine, &character, "fighter").unwrap();
        assert_eq!(flow.step(), LevelUpStep::Confirm);
        assert_eq!(flow.preview().unwrap().hp_average, 12);

        flow.confirm(&engine, &mut character, HpChoice::Average).unwrap();
        assert_eq!(flow.step(), LevelUpStep::SelectSkills);
        assert_eq!(flow.current_skill_choice().unwrap().count, 2);

        flow.choose_skills(&engine, &mut character, &[Skill::Athletics, Skill::Survival])
            .unwrap();
        assert_eq!(flow.step(), LevelUpStep::Complete);
        assert!(!flow.is_in_progress());
        flow.finish().unwrap();
        assert_eq!(flow.step(), LevelUpStep::Idle);
    }

    #[test]
    fn test_asi_level_routes_to_select_asi() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 3);
        engine
            .select_subclass(&mut character, "Fighter", "Champion")
            .unwrap();
        let mut flow = LevelUpFlow::new();

        flow.show(&character).unwrap();
        flow.select_class(&engine, &character, "Fighter").unwrap();
        flow.confirm(&engine, &mut character, HpChoice::Average).unwrap();
        assert_eq!(flow.step(), LevelUpStep::SelectAsi);

        flow.choose_asi_path(AsiPath::Abilities).unwrap();
        let err = flow
            .allocate_abilities(&engine, &mut character, HashMap::from([(Ability::Strength, 1)]))
            .unwrap_err();
        assert!(matches!(err, ProgressionError::InvalidAllocation(_)));
        assert_eq!(flow.step(), LevelUpStep::SelectAbilities);
        assert!(flow.message().is_some());

        flow.back().unwrap();
        flow.choose_asi_path(AsiPath::Feat).unwrap();
        flow.choose_feat(&engine, &mut character, FeatSelection::new("Durable"))
            .unwrap();
        assert_eq!(flow.step(), LevelUpStep::Complete);
        assert!(character.has_feat("Durable"));
        assert!(flow.message().is_none());
    }

    #[test]
    fn test_subclass_then_subclass_skills() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 2);
        let mut flow = LevelUpFlow::new();

        flow.show(&character).unwrap();
        flow.select_class(&engine, &character, "Fighter").unwrap();
        flow.confirm(&engine, &mut character, HpChoice::Average).unwrap();
        assert_eq!(flow.step(), LevelUpStep::SelectSubclass);

        assert!(flow.choose_subclass(&engine, &mut character, "Nope").is_err());
        assert_eq!(flow.step(), LevelUpStep::SelectSubclass);

        flow.choose_subclass(&engine, &mut character, "Battle Master").unwrap();
        assert_eq!(flow.step(), LevelUpStep::SelectSkills);
        assert_eq!(flow.current_skill_choice().unwrap().count, 1);
        assert!(flow
            .result()
            .unwrap()
            .features_gained
            .contains(&"Combat Superiority".to_string()));

        flow.choose_skills(&engine, &mut character, &[Skill::Insight]).unwrap();
        assert_eq!(flow.step(), LevelUpStep::Complete);
    }

    #[test]
    fn test_cancel_restores_snapshot() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 2);
        let before = character.clone();
        let mut flow = LevelUpFlow::new();

        flow.show(&character).unwrap();
        flow.select_class(&engine, &character, "Fighter").unwrap();
        flow.confirm(&engine, &mut character, HpChoice::Average).unwrap();
        assert_eq!(character.total_level(), 3);
        assert!(flow.is_in_progress());

        flow.cancel(&mut character);
        assert_eq!(character, before);
        assert_eq!(flow.step(), LevelUpStep::Idle);
    }

    #[test]
    fn test_cancel_after_complete_keeps_level() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 1);
        let mut flow = LevelUpFlow::new();

        flow.show(&character).unwrap();
        flow.select_class(&engine, &character, "Fighter").unwrap();
        flow.confirm(&engine, &mut character, HpChoice::Average).unwrap();
        assert_eq!(flow.step(), LevelUpStep::Complete);

        flow.cancel(&mut character);
        assert_eq!(character.total_level(), 2);
    }

    #[test]
    fn test_wrong_step_and_failed_prerequisite() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 1);
        let mut flow = LevelUpFlow::new();

        let err = flow
            .confirm(&engine, &mut character, HpChoice::Average)
            .unwrap_err();
        assert_eq!(
            err,
            ProgressionError::InvalidStep {
                action: "confirm",
                step: "idle",
            }
        );

        flow.show(&character).unwrap();
        let err = flow
            .select_class(&engine, &character, "Wizard")
            .unwrap_err();
        assert!(matches!(err, ProgressionError::PrerequisiteNotMet { .. }));
        assert_eq!(flow.step(), LevelUpStep::SelectClass);
        assert_eq!(flow.message(), Some("Wizard requires INT 13"));

        flow.select_class(&engine, &character, "Fighter").unwrap();
        flow.back().unwrap();
        assert_eq!(flow.step(), LevelUpStep::SelectClass);
        assert!(flow.preview().is_none());
    }
}

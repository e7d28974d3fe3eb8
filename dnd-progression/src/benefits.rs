//! Provenance ledger for stat modifications.
//!
//! Every ability bump, skill, language, hit point or speed bonus that comes
//! from a feat, origin, species, subclass, class level or Ability Score
//! Improvement is recorded here with its source. The tracker never touches
//! the character; [`Character::apply_benefit`](crate::character::Character::apply_benefit)
//! and [`Character::revoke_benefits`](crate::character::Character::revoke_benefits)
//! pair each record with its effect.

use crate::character::{Ability, Skill};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of thing granted a benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Feat,
    Origin,
    Species,
    Subclass,
    /// Choices made when gaining a class level (skill picks).
    ClassLevel,
    AbilityScoreImprovement,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Feat => "feat",
            SourceKind::Origin => "origin",
            SourceKind::Species => "species",
            SourceKind::Subclass => "subclass",
            SourceKind::ClassLevel => "class level",
            SourceKind::AbilityScoreImprovement => "ability score improvement",
        }
    }
}

/// A named source of benefits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BenefitSource {
    pub kind: SourceKind,
    pub name: String,
}

impl BenefitSource {
    pub fn new(kind: SourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn feat(name: impl Into<String>) -> Self {
        Self::new(SourceKind::Feat, name)
    }

    pub fn origin(name: impl Into<String>) -> Self {
        Self::new(SourceKind::Origin, name)
    }

    pub fn species(name: impl Into<String>) -> Self {
        Self::new(SourceKind::Species, name)
    }

    pub fn subclass(name: impl Into<String>) -> Self {
        Self::new(SourceKind::Subclass, name)
    }

    pub fn class_level(class: &str, level: u8) -> Self {
        Self::new(SourceKind::ClassLevel, format!("{class} level {level}"))
    }

    pub fn asi(class: &str, level: u8) -> Self {
        Self::new(
            SourceKind::AbilityScoreImprovement,
            format!("{class} level {level}"),
        )
    }

    pub fn matches(&self, kind: SourceKind, name: &str) -> bool {
        self.kind == kind && self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for BenefitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind.name())
    }
}

/// A single discrete stat effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Benefit {
    AbilityScore { ability: Ability, amount: i8 },
    Skill(Skill),
    Language(String),
    HitPoints(i32),
    Speed(i32),
    Resistance(String),
}

impl fmt::Display for Benefit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Benefit::AbilityScore { ability, amount } => write!(f, "{amount:+} {}", ability.name()),
            Benefit::Skill(skill) => write!(f, "{} proficiency", skill.name()),
            Benefit::Language(language) => write!(f, "{language} language"),
            Benefit::HitPoints(hp) => write!(f, "{hp:+} hit points"),
            Benefit::Speed(speed) => write!(f, "{speed:+} ft. speed"),
            Benefit::Resistance(damage) => write!(f, "{damage} resistance"),
        }
    }
}

/// A benefit together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitRecord {
    pub source: BenefitSource,
    pub benefit: Benefit,
}

/// Append-only record of live benefits, removed a source at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitTracker {
    records: Vec<BenefitRecord>,
}

impl BenefitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a benefit. The caller applies the matching effect.
    pub fn grant(&mut self, source: BenefitSource, benefit: Benefit) {
        self.records.push(BenefitRecord { source, benefit });
    }

    /// Remove and return every record from a source.
    pub fn revoke_by_source(&mut self, kind: SourceKind, name: &str) -> Vec<BenefitRecord> {
        let (revoked, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|r| r.source.matches(kind, name));
        self.records = kept;
        revoked
    }

    /// Records granted by a source, for "granted by this feat" listings.
    pub fn benefits_by_source(&self, kind: SourceKind, name: &str) -> Vec<&BenefitRecord> {
        self.records
            .iter()
            .filter(|r| r.source.matches(kind, name))
            .collect()
    }

    /// Records of one source kind.
    pub fn benefits_by_kind(&self, kind: SourceKind) -> Vec<&BenefitRecord> {
        self.records.iter().filter(|r| r.source.kind == kind).collect()
    }

    /// Distinct sources with live records, in grant order.
    pub fn sources(&self) -> Vec<&BenefitSource> {
        let mut sources: Vec<&BenefitSource> = Vec::new();
        for record in &self.records {
            if !sources.contains(&&record.source) {
                sources.push(&record.source);
            }
        }
        sources
    }

    pub fn has_source(&self, kind: SourceKind, name: &str) -> bool {
        self.records.iter().any(|r| r.source.matches(kind, name))
    }

    /// Sum of live ability bonuses for one ability.
    pub fn ability_bonus(&self, ability: Ability) -> i32 {
        self.records
            .iter()
            .filter_map(|r| match r.benefit {
                Benefit::AbilityScore { ability: a, amount } if a == ability => {
                    Some(amount as i32)
                }
                _ => None,
            })
            .sum()
    }

    pub fn grants_skill(&self, skill: Skill) -> bool {
        self.records
            .iter()
            .any(|r| r.benefit == Benefit::Skill(skill))
    }

    pub fn grants_language(&self, language: &str) -> bool {
        self.records.iter().any(|r| match &r.benefit {
            Benefit::Language(l) => l.eq_ignore_ascii_case(language),
            _ => false,
        })
    }

    pub fn grants_resistance(&self, damage: &str) -> bool {
        self.records.iter().any(|r| match &r.benefit {
            Benefit::Resistance(d) => d.eq_ignore_ascii_case(damage),
            _ => false,
        })
    }

    pub fn hit_point_bonus(&self) -> i32 {
        self.records
            .iter()
            .filter_map(|r| match r.benefit {
                Benefit::HitPoints(hp) => Some(hp),
                _ => None,
            })
            .sum()
    }

    pub fn speed_bonus(&self) -> i32 {
        self.records
            .iter()
            .filter_map(|r| match r.benefit {
                Benefit::Speed(speed) => Some(speed),
                _ => None,
            })
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BenefitRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn str_bonus(amount: i8) -> Benefit {
        Benefit::AbilityScore {
            ability: Ability::Strength,
            amount,
        }
    }

    #[test]
    fn test_grant_and_query() {
        let mut tracker = BenefitTracker::new();
        tracker.grant(BenefitSource::feat("Athlete"), str_bonus(1));
        tracker.grant(BenefitSource::origin("Soldier"), str_bonus(2));
        tracker.grant(BenefitSource::origin("Soldier"), Benefit::Skill(Skill::Athletics));

        assert_eq!(tracker.ability_bonus(Ability::Strength), 3);
        assert_eq!(tracker.ability_bonus(Ability::Dexterity), 0);
        assert_eq!(tracker.benefits_by_source(SourceKind::Origin, "Soldier").len(), 2);
        assert!(tracker.grants_skill(Skill::Athletics));
        assert_eq!(tracker.sources().len(), 2);
    }

    #[test]
    fn test_revoke_by_source_returns_only_that_source() {
        let mut tracker = BenefitTracker::new();
        tracker.grant(BenefitSource::feat("Tough"), Benefit::HitPoints(8));
        tracker.grant(BenefitSource::asi("Fighter", 4), str_bonus(2));

        let revoked = tracker.revoke_by_source(SourceKind::Feat, "tough");
        assert_eq!(revoked.len(), 1);
        assert_eq!(revoked[0].benefit, Benefit::HitPoints(8));
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.hit_point_bonus(), 0);
        assert_eq!(tracker.ability_bonus(Ability::Strength), 2);
    }

    #[test]
    fn test_same_name_different_kind_is_distinct() {
        let mut tracker = BenefitTracker::new();
        tracker.grant(BenefitSource::class_level("Rogue", 1), Benefit::Skill(Skill::Stealth));
        tracker.grant(BenefitSource::asi("Rogue", 1), str_bonus(1));

        let revoked = tracker.revoke_by_source(SourceKind::ClassLevel, "Rogue level 1");
        assert_eq!(revoked.len(), 1);
        assert!(tracker.has_source(SourceKind::AbilityScoreImprovement, "Rogue level 1"));
    }

    #[test]
    fn test_benefit_display() {
        assert_eq!(str_bonus(2).to_string(), "+2 Strength");
        assert_eq!(Benefit::Speed(10).to_string(), "+10 ft. speed");
        assert_eq!(
            BenefitSource::asi("Fighter", 4).to_string(),
            "Fighter level 4 (ability score improvement)"
        );
    }
}

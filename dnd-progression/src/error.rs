//! Error taxonomy for progression operations.
//!
//! Every engine operation returns one of these as a value. None of them are
//! fatal: the caller shows the message and keeps its current step.

use thiserror::Error;

/// Errors from progression, resource and benefit operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("{target} requires {requirement}")]
    PrerequisiteNotMet { target: String, requirement: String },

    #[error("Invalid allocation: {0}")]
    InvalidAllocation(String),

    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("Unknown subclass '{subclass}' for {class}")]
    UnknownSubclass { class: String, subclass: String },

    #[error("Unknown feat: {0}")]
    UnknownFeat(String),

    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    #[error("Unknown origin: {0}")]
    UnknownOrigin(String),

    #[error("Unknown fighting style: {0}")]
    UnknownFightingStyle(String),

    #[error("Unknown maneuver: {0}")]
    UnknownManeuver(String),

    #[error("Unknown spell: {0}")]
    UnknownSpell(String),

    #[error("Unknown weapon: {0}")]
    UnknownWeapon(String),

    #[error("No tracked resource named {0}")]
    UnknownResource(String),

    #[error("{0} has no uses remaining")]
    ResourceExhausted(String),

    #[error("Nothing selected: {0}")]
    NoSelection(String),

    #[error("Character has no levels in {0}")]
    NotInClass(String),

    #[error("Character is already at the maximum level ({max})")]
    MaxLevelReached { max: u8 },

    #[error("Hit point roll {roll} is outside 1..={hit_die}")]
    InvalidHitPointRoll { roll: u8, hit_die: u8 },

    #[error("Invalid skill choice: {0}")]
    InvalidSkillChoice(String),

    #[error("{0} has already been chosen")]
    AlreadyChosen(String),

    #[error("Not available: {0}")]
    NotAvailable(String),

    #[error("Cannot {action} while {step}")]
    InvalidStep {
        action: &'static str,
        step: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ProgressionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ProgressionError::PrerequisiteNotMet {
            target: "Wizard".to_string(),
            requirement: "INT 13".to_string(),
        };
        assert_eq!(err.to_string(), "Wizard requires INT 13");

        let err = ProgressionError::ResourceExhausted("Second Wind".to_string());
        assert_eq!(err.to_string(), "Second Wind has no uses remaining");
    }
}

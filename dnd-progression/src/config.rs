//! Tunable rules for the progression engine.

/// Configuration for a [`ProgressionEngine`](crate::progression::ProgressionEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionConfig {
    /// Highest total character level.
    pub max_level: u8,

    /// Highest score an ability can reach through boosts.
    pub ability_score_cap: u8,

    /// Points granted by an Ability Score Improvement.
    pub asi_points: u8,

    /// Most points a single ability can take from one Ability Score Improvement.
    pub asi_per_ability_cap: u8,

    /// Whether multiclassing checks the ability score prerequisites.
    pub enforce_multiclass_prerequisites: bool,

    /// Whether rolled hit points must lie within the class hit die.
    pub validate_rolled_hp: bool,

    /// Floor for the hit points gained on a single level.
    pub minimum_hp_per_level: i32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            max_level: 20,
            ability_score_cap: 20,
            asi_points: 2,
            asi_per_ability_cap: 2,
            enforce_multiclass_prerequisites: true,
            validate_rolled_hp: true,
            minimum_hp_per_level: 1,
        }
    }
}

impl ProgressionConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum total level.
    pub fn with_max_level(mut self, level: u8) -> Self {
        self.max_level = level;
        self
    }

    /// Set the ability score cap.
    pub fn with_ability_score_cap(mut self, cap: u8) -> Self {
        self.ability_score_cap = cap;
        self
    }

    /// Set the Ability Score Improvement budget and per-ability cap.
    pub fn with_asi_rules(mut self, points: u8, per_ability_cap: u8) -> Self {
        self.asi_points = points;
        self.asi_per_ability_cap = per_ability_cap;
        self
    }

    /// Enable or disable multiclass prerequisite checks.
    pub fn with_multiclass_prerequisites(mut self, enforce: bool) -> Self {
        self.enforce_multiclass_prerequisites = enforce;
        self
    }

    /// Enable or disable rolled hit point validation.
    pub fn with_rolled_hp_validation(mut self, validate: bool) -> Self {
        self.validate_rolled_hp = validate;
        self
    }

    /// Set the minimum hit points gained per level.
    pub fn with_minimum_hp_per_level(mut self, minimum: i32) -> Self {
        self.minimum_hp_per_level = minimum;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProgressionConfig::default();
        assert_eq!(config.max_level, 20);
        assert_eq!(config.asi_points, 2);
        assert_eq!(config.asi_per_ability_cap, 2);
        assert!(config.validate_rolled_hp);
    }

    #[test]
    fn test_builder_setters() {
        let config = ProgressionConfig::new()
            .with_max_level(10)
            .with_rolled_hp_validation(false)
            .with_multiclass_prerequisites(false);
        assert_eq!(config.max_level, 10);
        assert!(!config.validate_rolled_hp);
        assert!(!config.enforce_multiclass_prerequisites);
    }
}

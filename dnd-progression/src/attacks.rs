//! Attack list derivation.
//!
//! [`generate_attacks`] reads the equipped weapons, proficiencies, ability
//! modifiers and combat options of a character and produces one [`Attack`]
//! per weapon. Nothing is cached; call it again after any change.

use crate::character::{Ability, Character};
use crate::items::{Hand, WeaponDamageType, WeaponItem, WeaponMastery};
use serde::{Deserialize, Serialize};

/// Bonus to ranged attack rolls from the Archery fighting style.
pub const ARCHERY_BONUS: i8 = 2;

/// Bonus to damage from the Dueling fighting style.
pub const DUELING_BONUS: i8 = 2;

/// One ready-to-roll weapon attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    pub hand: Hand,
    /// Total to add to the d20.
    pub attack_bonus: i8,
    /// Damage expression such as "1d8+3".
    pub damage: String,
    /// Damage when a versatile weapon is wielded in two hands.
    pub two_handed_damage: Option<String>,
    pub damage_type: WeaponDamageType,
    /// Ability whose modifier is applied.
    pub ability: Ability,
    /// Normal and long range in feet.
    pub range: Option<(u32, u32)>,
    pub proficient: bool,
    /// Mastery property the character can use with this weapon.
    pub mastery: Option<WeaponMastery>,
}

impl Attack {
    pub fn is_versatile(&self) -> bool {
        self.two_handed_damage.is_some()
    }
}

/// Attacks for every equipped weapon, main hand first.
pub fn generate_attacks(character: &Character) -> Vec<Attack> {
    let dual_wielding = character.equipment.off_hand.is_some();
    character
        .equipment
        .weapons()
        .into_iter()
        .map(|(hand, weapon)| weapon_attack(character, weapon, hand, dual_wielding))
        .collect()
}

fn weapon_attack(character: &Character, weapon: &WeaponItem, hand: Hand, dual_wielding: bool) -> Attack {
    let ability = attack_ability(character, weapon);
    let ability_mod = character.ability_scores.modifier(ability);
    let proficient = character.is_proficient_with(weapon);

    let mut attack_bonus = ability_mod;
    if proficient {
        attack_bonus += character.proficiency_bonus();
    }
    if weapon.is_ranged() && character.has_fighting_style("Archery") {
        attack_bonus += ARCHERY_BONUS;
    }

    // Off-hand attacks only add a penalty unless the style removes the limit
    let mut damage_mod = if hand == Hand::Off && ability_mod > 0 && !character.has_fighting_style("Two-Weapon Fighting") {
        0
    } else {
        ability_mod
    };
    let dueling = hand == Hand::Main
        && !weapon.is_ranged()
        && !weapon.is_two_handed()
        && !dual_wielding
        && character.has_fighting_style("Dueling");
    if dueling {
        damage_mod += DUELING_BONUS;
    }

    let mastery = weapon
        .mastery
        .filter(|_| character.has_feature("Weapon Mastery") && character.has_mastery(weapon.name()));

    Attack {
        name: weapon.name().to_string(),
        hand,
        attack_bonus,
        damage: damage_expression(&weapon.damage_dice, damage_mod),
        // Dueling needs one hand free, so it never applies to the two-handed grip
        two_handed_damage: weapon
            .versatile_damage()
            .map(|dice| damage_expression(dice, if dueling { damage_mod - DUELING_BONUS } else { damage_mod })),
        damage_type: weapon.damage_type,
        ability,
        range: weapon.range,
        proficient,
        mastery,
    }
}

/// Ranged weapons use DEX. Finesse weapons, and Monk weapons in the hands of
/// a character with Martial Arts, use the better of STR and DEX.
fn attack_ability(character: &Character, weapon: &WeaponItem) -> Ability {
    if weapon.is_ranged() {
        return Ability::Dexterity;
    }
    let either = weapon.is_finesse() || (weapon.is_monk_weapon() && character.has_feature("Martial Arts"));
    if either
        && character.ability_scores.modifier(Ability::Dexterity)
            > character.ability_scores.modifier(Ability::Strength)
    {
        Ability::Dexterity
    } else {
        Ability::Strength
    }
}

/// Format dice plus a modifier: "1d8+3", "1d8-1" or "1d8".
pub fn damage_expression(dice: &str, modifier: i8) -> String {
    match modifier {
        0 => dice.to_string(),
        m if m > 0 => format!("{dice}+{m}"),
        m => format!("{dice}{m}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RuleCatalog;
    use crate::character::AbilityScores;
    use crate::items::get_weapon;
    use crate::progression::ProgressionEngine;
    use crate::testing::{fighter, new_character};

    fn equip(character: &mut Character, name: &str, hand: Hand) {
        character.equipment.equip(get_weapon(name).unwrap(), hand);
    }

    #[test]
    fn test_damage_expression() {
        assert_eq!(damage_expression("1d8", 3), "1d8+3");
        assert_eq!(damage_expression("1d8", -1), "1d8-1");
        assert_eq!(damage_expression("2d6", 0), "2d6");
    }

    #[test]
    fn test_no_weapons_no_attacks() {
        let character = new_character("Tess");
        assert!(generate_attacks(&character).is_empty());
    }

    #[test]
    fn test_versatile_weapon_single_entry() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 1);
        equip(&mut character, "Longsword", Hand::Main);

        let attacks = generate_attacks(&character);
        assert_eq!(attacks.len(), 1);
        let attack = &attacks[0];
        // STR 16 (+3), proficiency +2
        assert_eq!(attack.attack_bonus, 5);
        assert_eq!(attack.damage, "1d8+3");
        assert_eq!(attack.two_handed_damage.as_deref(), Some("1d10+3"));
        assert_eq!(attack.ability, Ability::Strength);
        assert!(attack.proficient);
        assert!(attack.is_versatile());
    }

    #[test]
    fn test_finesse_and_ranged_use_dexterity() {
        let mut character = new_character("Vex");
        character.ability_scores = AbilityScores::new(10, 18, 12, 10, 10, 10);
        equip(&mut character, "Rapier", Hand::Main);

        let attacks = generate_attacks(&character);
        assert_eq!(attacks[0].ability, Ability::Dexterity);
        // Untrained: no proficiency bonus
        assert!(!attacks[0].proficient);
        assert_eq!(attacks[0].attack_bonus, 4);

        character.equipment.equip(get_weapon("Longbow").unwrap(), Hand::Main);
        let attacks = generate_attacks(&character);
        assert_eq!(attacks[0].ability, Ability::Dexterity);
        assert_eq!(attacks[0].range, Some((150, 600)));
    }

    #[test]
    fn test_off_hand_drops_positive_modifier() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 1);
        equip(&mut character, "Scimitar", Hand::Main);
        equip(&mut character, "Dagger", Hand::Off);

        let attacks = generate_attacks(&character);
        assert_eq!(attacks.len(), 2);
        assert_eq!(attacks[0].hand, Hand::Main);
        assert_eq!(attacks[0].damage, "1d6+3");
        assert_eq!(attacks[1].hand, Hand::Off);
        assert_eq!(attacks[1].damage, "1d4");

        engine
            .select_fighting_style(&mut character, "Two-Weapon Fighting", "Fighting Style")
            .unwrap();
        let attacks = generate_attacks(&character);
        assert_eq!(attacks[1].damage, "1d4+3");
    }

    #[test]
    fn test_dueling_and_archery() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 1);
        engine
            .select_fighting_style(&mut character, "Dueling", "Fighting Style")
            .unwrap();
        equip(&mut character, "Longsword", Hand::Main);

        let attacks = generate_attacks(&character);
        assert_eq!(attacks[0].damage, "1d8+5");
        assert_eq!(attacks[0].two_handed_damage.as_deref(), Some("1d10+3"));

        equip(&mut character, "Dagger", Hand::Off);
        let attacks = generate_attacks(&character);
        assert_eq!(attacks[0].damage, "1d8+3");

        let mut archer = fighter(&engine, 1);
        engine
            .select_fighting_style(&mut archer, "Archery", "Fighting Style")
            .unwrap();
        equip(&mut archer, "Longbow", Hand::Main);
        // DEX 14 (+2), proficiency +2, Archery +2
        assert_eq!(generate_attacks(&archer)[0].attack_bonus, 6);
    }

    #[test]
    fn test_mastery_requires_feature_and_choice() {
        let catalog = RuleCatalog::srd();
        let engine = ProgressionEngine::new(&catalog);
        let mut character = fighter(&engine, 1);
        equip(&mut character, "Greatsword", Hand::Main);
        assert_eq!(generate_attacks(&character)[0].mastery, None);

        engine.master_weapon(&mut character, "Greatsword").unwrap();
        assert_eq!(
            generate_attacks(&character)[0].mastery,
            Some(WeaponMastery::Graze)
        );

        let mut untrained = new_character("Pip");
        untrained.weapon_masteries.push("Greatsword".to_string());
        equip(&mut untrained, "Greatsword", Hand::Main);
        assert_eq!(generate_attacks(&untrained)[0].mastery, None);
    }
}

//! Spell slot progression tables and built-in spells.

use super::SpellDefinition;

/// Spell slots for a full caster (or a multiclass caster level), as
/// `(slot level, count)` pairs.
pub fn full_caster_slots(caster_level: u8) -> Vec<(u8, u8)> {
    let slots: &[(u8, &[u8])] = &[
        (1, &[2]),
        (2, &[3]),
        (3, &[4, 2]),
        (4, &[4, 3]),
        (5, &[4, 3, 2]),
        (6, &[4, 3, 3]),
        (7, &[4, 3, 3, 1]),
        (8, &[4, 3, 3, 2]),
        (9, &[4, 3, 3, 3, 1]),
        (10, &[4, 3, 3, 3, 2]),
        (11, &[4, 3, 3, 3, 2, 1]),
        (12, &[4, 3, 3, 3, 2, 1]),
        (13, &[4, 3, 3, 3, 2, 1, 1]),
        (14, &[4, 3, 3, 3, 2, 1, 1]),
        (15, &[4, 3, 3, 3, 2, 1, 1, 1]),
        (16, &[4, 3, 3, 3, 2, 1, 1, 1]),
        (17, &[4, 3, 3, 3, 2, 1, 1, 1, 1]),
        (18, &[4, 3, 3, 3, 3, 1, 1, 1, 1]),
        (19, &[4, 3, 3, 3, 3, 2, 1, 1, 1]),
        (20, &[4, 3, 3, 3, 3, 2, 2, 1, 1]),
    ];

    let level = caster_level.min(20);
    slots
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, s)| {
            s.iter()
                .enumerate()
                .map(|(i, &count)| ((i + 1) as u8, count))
                .collect()
        })
        .unwrap_or_default()
}

/// Warlock Pact Magic slots: `(slot level, count)`.
pub fn pact_slots(warlock_level: u8) -> Option<(u8, u8)> {
    let (count, slot_level) = match warlock_level {
        1 => (1, 1),
        2 => (2, 1),
        3..=4 => (2, 2),
        5..=6 => (2, 3),
        7..=8 => (2, 4),
        9..=10 => (2, 5),
        11..=16 => (3, 5),
        17..=20 => (4, 5),
        _ => return None,
    };
    Some((slot_level, count))
}

fn spell(name: &str, level: u8, school: &str, classes: &[&str], description: &str) -> SpellDefinition {
    SpellDefinition {
        name: name.to_string(),
        level,
        school: school.to_string(),
        classes: classes.iter().map(|c| c.to_string()).collect(),
        description: description.to_string(),
    }
}

pub(super) fn srd_spells() -> Vec<SpellDefinition> {
    vec![
        // Cantrips
        spell("Eldritch Blast", 0, "Evocation", &["Warlock"], "A beam of crackling energy deals 1d10 Force damage."),
        spell("Fire Bolt", 0, "Evocation", &["Sorcerer", "Wizard"], "Hurl a mote of fire for 1d10 Fire damage."),
        spell("Guidance", 0, "Divination", &["Cleric", "Druid"], "Add 1d4 to one ability check."),
        spell("Light", 0, "Evocation", &["Bard", "Cleric", "Sorcerer", "Wizard"], "An object sheds bright light."),
        spell("Mage Hand", 0, "Conjuration", &["Bard", "Sorcerer", "Warlock", "Wizard"], "A spectral hand manipulates objects."),
        spell("Minor Illusion", 0, "Illusion", &["Bard", "Sorcerer", "Warlock", "Wizard"], "Create a sound or image."),
        spell("Produce Flame", 0, "Conjuration", &["Druid"], "A flame in your hand sheds light and can be hurled."),
        spell("Sacred Flame", 0, "Evocation", &["Cleric"], "Radiant flame descends on a creature."),
        spell("Vicious Mockery", 0, "Enchantment", &["Bard"], "Insults deal Psychic damage and impose Disadvantage."),

        // Level 1
        spell("Bless", 1, "Enchantment", &["Cleric", "Paladin"], "Up to three creatures add 1d4 to attacks and saves."),
        spell("Cure Wounds", 1, "Abjuration", &["Bard", "Cleric", "Druid", "Paladin", "Ranger"], "Restore 2d8 + modifier hit points."),
        spell("Detect Magic", 1, "Divination", &["Bard", "Cleric", "Druid", "Paladin", "Ranger", "Sorcerer", "Wizard"], "Sense magic within 30 feet."),
        spell("Divine Smite", 1, "Evocation", &["Paladin"], "A weapon hit deals extra Radiant damage."),
        spell("Healing Word", 1, "Abjuration", &["Bard", "Cleric", "Druid"], "Restore 2d4 + modifier hit points at range."),
        spell("Hex", 1, "Enchantment", &["Warlock"], "Curse a creature to take extra Necrotic damage."),
        spell("Hunter's Mark", 1, "Divination", &["Ranger"], "Mark a quarry to deal extra Force damage."),
        spell("Magic Missile", 1, "Evocation", &["Sorcerer", "Wizard"], "Three darts of magical force hit automatically."),
        spell("Shield", 1, "Abjuration", &["Sorcerer", "Wizard"], "+5 AC until the start of your next turn."),
        spell("Sleep", 1, "Enchantment", &["Bard", "Sorcerer", "Wizard"], "Creatures in an area may fall Unconscious."),
        spell("Thunderwave", 1, "Evocation", &["Bard", "Druid", "Sorcerer", "Wizard"], "A wave of thunder pushes creatures away."),

        // Level 2
        spell("Hold Person", 2, "Enchantment", &["Bard", "Cleric", "Druid", "Sorcerer", "Warlock", "Wizard"], "Paralyze a Humanoid."),
        spell("Misty Step", 2, "Conjuration", &["Sorcerer", "Warlock", "Wizard"], "Teleport up to 30 feet."),
        spell("Spiritual Weapon", 2, "Evocation", &["Cleric"], "A floating spectral weapon attacks."),

        // Level 3
        spell("Counterspell", 3, "Abjuration", &["Sorcerer", "Warlock", "Wizard"], "Interrupt a creature casting a spell."),
        spell("Fireball", 3, "Evocation", &["Sorcerer", "Wizard"], "A burst of flame deals 8d6 Fire damage."),
        spell("Revivify", 3, "Necromancy", &["Cleric", "Druid", "Paladin", "Ranger"], "Return a creature that died within a minute."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_caster_slots() {
        assert_eq!(full_caster_slots(1), vec![(1, 2)]);
        assert_eq!(full_caster_slots(5), vec![(1, 4), (2, 3), (3, 2)]);
        assert_eq!(full_caster_slots(20).len(), 9);
        assert!(full_caster_slots(0).is_empty());
    }

    #[test]
    fn test_pact_slots() {
        assert_eq!(pact_slots(0), None);
        assert_eq!(pact_slots(1), Some((1, 1)));
        assert_eq!(pact_slots(5), Some((3, 2)));
        assert_eq!(pact_slots(11), Some((5, 3)));
    }
}

//! Built-in class, subclass and maneuver tables.

use super::{
    CasterType, ClassDefinition, FeatureDefinition, ManeuverDefinition, MulticlassRequirement,
    SubclassDefinition, UsesDefinition, UsesFormula,
};
use crate::benefits::Benefit;
use crate::character::{Ability, Skill, WeaponProficiency};
use crate::items::{ArmorCategory, WeaponCategory};
use crate::resources::RestType;

const STANDARD_ASI: [u8; 5] = [4, 8, 12, 16, 19];

fn feature(level: u8, name: &str, description: &str) -> FeatureDefinition {
    FeatureDefinition::new(level, name, description)
}

fn uses(formula: UsesFormula, rest: RestType) -> UsesDefinition {
    UsesDefinition::new(formula, rest)
}

fn simple() -> WeaponProficiency {
    WeaponProficiency::Category(WeaponCategory::Simple)
}

fn martial() -> WeaponProficiency {
    WeaponProficiency::Category(WeaponCategory::Martial)
}

fn named(weapons: &[&str]) -> Vec<WeaponProficiency> {
    weapons
        .iter()
        .map(|w| WeaponProficiency::Named(w.to_string()))
        .collect()
}

fn subclass(name: &str, description: &str, features: Vec<FeatureDefinition>) -> SubclassDefinition {
    SubclassDefinition {
        name: name.to_string(),
        description: description.to_string(),
        features,
        caster: None,
        spellcasting_ability: None,
        spell_list: None,
        benefits: Vec::new(),
        maneuvers_known: Vec::new(),
    }
}

pub(super) fn srd_classes() -> Vec<ClassDefinition> {
    vec![
        barbarian(),
        bard(),
        cleric(),
        druid(),
        fighter(),
        monk(),
        paladin(),
        ranger(),
        rogue(),
        sorcerer(),
        warlock(),
        wizard(),
    ]
}

fn barbarian() -> ClassDefinition {
    ClassDefinition {
        name: "Barbarian".to_string(),
        description: "A fierce warrior of primal rage.".to_string(),
        hit_die: 12,
        multiclass_requirement: MulticlassRequirement::All(vec![(Ability::Strength, 13)]),
        saving_throws: vec![Ability::Strength, Ability::Constitution],
        skill_count: 2,
        skill_options: vec![
            Skill::AnimalHandling,
            Skill::Athletics,
            Skill::Intimidation,
            Skill::Nature,
            Skill::Perception,
            Skill::Survival,
        ],
        multiclass_skill_count: 0,
        armor: vec![ArmorCategory::Light, ArmorCategory::Medium, ArmorCategory::Shields],
        weapons: vec![simple(), martial()],
        multiclass_armor: vec![ArmorCategory::Shields],
        multiclass_weapons: vec![martial()],
        subclass_level: 3,
        asi_levels: STANDARD_ASI.to_vec(),
        caster: None,
        spellcasting_ability: None,
        weapon_mastery: vec![(1, 2), (4, 3), (10, 4)],
        features: vec![
            feature(1, "Rage", "Enter a rage as a Bonus Action: resistance to Bludgeoning, Piercing and Slashing damage and a bonus to Strength-based damage.")
                .with_uses(uses(
                    UsesFormula::ByClassLevel(vec![(1, 2), (3, 3), (6, 4), (12, 5), (17, 6)]),
                    RestType::LongRest,
                )),
            feature(1, "Unarmored Defense", "While not wearing armor, AC equals 10 + DEX + CON."),
            feature(1, "Weapon Mastery", "Use the mastery properties of weapons you have mastered."),
            feature(2, "Danger Sense", "Advantage on Dexterity saving throws unless Incapacitated."),
            feature(2, "Reckless Attack", "Advantage on Strength attacks this turn; attacks against you have Advantage."),
            feature(3, "Primal Knowledge", "Gain proficiency in another Barbarian skill.")
                .with_skill_choices(1),
            feature(5, "Extra Attack", "Attack twice when you take the Attack action."),
            feature(5, "Fast Movement", "Speed increases by 10 feet while not wearing Heavy armor.")
                .with_benefit(Benefit::Speed(10)),
            feature(7, "Feral Instinct", "Advantage on Initiative rolls."),
            feature(7, "Instinctive Pounce", "Move up to half your Speed when you enter a rage."),
            feature(9, "Brutal Strike", "Forgo Advantage from Reckless Attack to deal extra damage and impose an effect."),
            feature(11, "Relentless Rage", "Drop to 1 HP instead of 0 on a successful Constitution save while raging."),
            feature(13, "Improved Brutal Strike", "New Brutal Strike effects."),
            feature(15, "Persistent Rage", "Rage lasts 10 minutes without needing to be extended."),
            feature(18, "Indomitable Might", "Strength checks and saves use at least your Strength score."),
            feature(20, "Primal Champion", "Strength and Constitution increase by 4, to a maximum of 25.")
                .with_benefit(Benefit::AbilityScore { ability: Ability::Strength, amount: 4 })
                .with_benefit(Benefit::AbilityScore { ability: Ability::Constitution, amount: 4 }),
        ],
        subclasses: vec![subclass(
            "Path of the Berserker",
            "Channel rage into violent fury.",
            vec![
                feature(3, "Frenzy", "Deal extra damage with Reckless Attack while raging."),
                feature(6, "Mindless Rage", "Immune to Charmed and Frightened while raging."),
                feature(10, "Retaliation", "Make a melee attack as a Reaction when damaged."),
                feature(14, "Intimidating Presence", "Frighten creatures in a 30-foot emanation.")
                    .with_uses(uses(UsesFormula::Fixed(1), RestType::LongRest)),
            ],
        )],
    }
}

fn bard() -> ClassDefinition {
    ClassDefinition {
        name: "Bard".to_string(),
        description: "An inspiring magician whose power echoes the music of creation.".to_string(),
        hit_die: 8,
        multiclass_requirement: MulticlassRequirement::All(vec![(Ability::Charisma, 13)]),
        saving_throws: vec![Ability::Dexterity, Ability::Charisma],
        skill_count: 3,
        skill_options: Vec::new(),
        multiclass_skill_count: 1,
        armor: vec![ArmorCategory::Light],
        weapons: vec![simple()],
        multiclass_armor: vec![ArmorCategory::Light],
        multiclass_weapons: Vec::new(),
        subclass_level: 3,
        asi_levels: STANDARD_ASI.to_vec(),
        caster: Some(CasterType::Full),
        spellcasting_ability: Some(Ability::Charisma),
        weapon_mastery: Vec::new(),
        features: vec![
            feature(1, "Bardic Inspiration", "Give an ally a Bardic Inspiration die as a Bonus Action.")
                .with_uses(uses(UsesFormula::AbilityModifier(Ability::Charisma), RestType::LongRest)),
            feature(1, "Spellcasting", "Cast Bard spells using Charisma."),
            feature(2, "Expertise", "Gain Expertise in two skills you are proficient in."),
            feature(2, "Jack of All Trades", "Add half your Proficiency Bonus to ability checks without proficiency."),
            feature(5, "Font of Inspiration", "Regain all Bardic Inspiration on a Short or Long Rest.")
                .with_uses(
                    uses(UsesFormula::AbilityModifier(Ability::Charisma), RestType::ShortRest)
                        .with_pool("Bardic Inspiration"),
                ),
            feature(7, "Countercharm", "Use a Reaction to let an ally reroll a save against Charmed or Frightened."),
            feature(10, "Magical Secrets", "Prepare spells from the Cleric, Druid and Wizard lists."),
            feature(18, "Superior Inspiration", "Regain Bardic Inspiration when you roll Initiative."),
            feature(20, "Words of Creation", "Always have Power Word Heal and Power Word Kill prepared."),
        ],
        subclasses: vec![subclass(
            "College of Lore",
            "Plumb the depths of magical knowledge.",
            vec![
                feature(3, "Bonus Proficiencies", "Gain proficiency with three skills of your choice.")
                    .with_skill_choices(3),
                feature(3, "Cutting Words", "Use a Reaction and Bardic Inspiration to subtract from a roll."),
                feature(6, "Magical Discoveries", "Learn two spells from other class lists."),
                feature(14, "Peerless Skill", "Add Bardic Inspiration to a failed ability check."),
            ],
        )],
    }
}

fn cleric() -> ClassDefinition {
    ClassDefinition {
        name: "Cleric".to_string(),
        description: "A miraculous priest of divine power.".to_string(),
        hit_die: 8,
        multiclass_requirement: MulticlassRequirement::All(vec![(Ability::Wisdom, 13)]),
        saving_throws: vec![Ability::Wisdom, Ability::Charisma],
        skill_count: 2,
        skill_options: vec![
            Skill::History,
            Skill::Insight,
            Skill::Medicine,
            Skill::Persuasion,
            Skill::Religion,
        ],
        multiclass_skill_count: 0,
        armor: vec![ArmorCategory::Light, ArmorCategory::Medium, ArmorCategory::Shields],
        weapons: vec![simple()],
        multiclass_armor: vec![ArmorCategory::Light, ArmorCategory::Medium, ArmorCategory::Shields],
        multiclass_weapons: Vec::new(),
        subclass_level: 3,
        asi_levels: STANDARD_ASI.to_vec(),
        caster: Some(CasterType::Full),
        spellcasting_ability: Some(Ability::Wisdom),
        weapon_mastery: Vec::new(),
        features: vec![
            feature(1, "Spellcasting", "Cast Cleric spells using Wisdom."),
            feature(1, "Divine Order", "Choose Protector or Thaumaturge."),
            feature(2, "Channel Divinity", "Channel divine energy for Divine Spark or Turn Undead.")
                .with_uses(uses(
                    UsesFormula::ByClassLevel(vec![(2, 2), (6, 3), (18, 4)]),
                    RestType::ShortRest,
                )),
            feature(5, "Sear Undead", "Turn Undead also deals Radiant damage."),
            feature(7, "Blessed Strikes", "Divine Strike or Potent Spellcasting."),
            feature(10, "Divine Intervention", "Cast any Cleric spell of level 5 or lower without a slot.")
                .with_uses(uses(UsesFormula::Fixed(1), RestType::LongRest)),
            feature(14, "Improved Blessed Strikes", "Blessed Strikes grows stronger."),
            feature(20, "Greater Divine Intervention", "Divine Intervention can cast Wish."),
        ],
        subclasses: vec![subclass(
            "Life Domain",
            "Focus on the vibrant positive energy that sustains all life.",
            vec![
                feature(3, "Disciple of Life", "Healing spells restore extra hit points."),
                feature(3, "Preserve Life", "Channel Divinity to heal creatures within 30 feet."),
                feature(6, "Blessed Healer", "Heal yourself when you heal others."),
                feature(17, "Supreme Healing", "Healing dice use their maximum value."),
            ],
        )],
    }
}

fn druid() -> ClassDefinition {
    ClassDefinition {
        name: "Druid".to_string(),
        description: "A nature priest of primal power.".to_string(),
        hit_die: 8,
        multiclass_requirement: MulticlassRequirement::All(vec![(Ability::Wisdom, 13)]),
        saving_throws: vec![Ability::Intelligence, Ability::Wisdom],
        skill_count: 2,
        skill_options: vec![
            Skill::Arcana,
            Skill::AnimalHandling,
            Skill::Insight,
            Skill::Medicine,
            Skill::Nature,
            Skill::Perception,
            Skill::Religion,
            Skill::Survival,
        ],
        multiclass_skill_count: 0,
        armor: vec![ArmorCategory::Light, ArmorCategory::Shields],
        weapons: vec![simple()],
        multiclass_armor: vec![ArmorCategory::Light, ArmorCategory::Shields],
        multiclass_weapons: Vec::new(),
        subclass_level: 3,
        asi_levels: STANDARD_ASI.to_vec(),
        caster: Some(CasterType::Full),
        spellcasting_ability: Some(Ability::Wisdom),
        weapon_mastery: Vec::new(),
        features: vec![
            feature(1, "Spellcasting", "Cast Druid spells using Wisdom."),
            feature(1, "Druidic", "Know the secret language of Druids.")
                .with_benefit(Benefit::Language("Druidic".to_string())),
            feature(1, "Primal Order", "Choose Magician or Warden."),
            feature(2, "Wild Shape", "Shape-shift into a Beast form you have learned.")
                .with_uses(uses(
                    UsesFormula::ByClassLevel(vec![(2, 2), (6, 3), (17, 4)]),
                    RestType::ShortRest,
                )),
            feature(2, "Wild Companion", "Expend a Wild Shape use to cast Find Familiar."),
            feature(5, "Wild Resurgence", "Trade spell slots for Wild Shape uses."),
            feature(7, "Elemental Fury", "Potent Spellcasting or Primal Strike."),
            feature(15, "Improved Elemental Fury", "Elemental Fury grows stronger."),
            feature(18, "Beast Spells", "Cast spells while in Wild Shape."),
            feature(20, "Archdruid", "Regain Wild Shape uses on Initiative and convert them to spell slots."),
        ],
        subclasses: vec![subclass(
            "Circle of the Land",
            "Draw on the magic of the land itself.",
            vec![
                feature(3, "Circle of the Land Spells", "Always have land spells prepared."),
                feature(3, "Land's Aid", "Expend Wild Shape to damage foes and heal allies."),
                feature(6, "Natural Recovery", "Recover spell slots during a Short Rest.")
                    .with_uses(uses(UsesFormula::Fixed(1), RestType::LongRest)),
                feature(10, "Nature's Ward", "Immune to Poisoned and resistant to a land damage type.")
                    .with_benefit(Benefit::Resistance("Poison".to_string())),
                feature(14, "Nature's Sanctuary", "Create a sanctuary of spectral trees."),
            ],
        )],
    }
}

fn fighter() -> ClassDefinition {
    let mut battle_master = subclass(
        "Battle Master",
        "Master sophisticated battle maneuvers.",
        vec![
            feature(3, "Combat Superiority", "Fuel maneuvers with Superiority Dice.")
                .with_uses(
                    uses(
                        UsesFormula::ByClassLevel(vec![(3, 4), (7, 5), (15, 6)]),
                        RestType::ShortRest,
                    )
                    .with_pool("Superiority Dice"),
                ),
            feature(3, "Student of War", "Gain proficiency with one skill of your choice.")
                .with_skill_choices(1),
            feature(7, "Know Your Enemy", "Learn a creature's immunities, resistances and vulnerabilities."),
            feature(10, "Improved Combat Superiority", "Superiority Dice become d10s."),
            feature(15, "Relentless", "Regain a Superiority Die when you roll Initiative with none."),
            feature(18, "Ultimate Combat Superiority", "Superiority Dice become d12s."),
        ],
    );
    battle_master.maneuvers_known = vec![(3, 3), (7, 5), (10, 7), (15, 9)];

    ClassDefinition {
        name: "Fighter".to_string(),
        description: "A master of all arms and armor.".to_string(),
        hit_die: 10,
        multiclass_requirement: MulticlassRequirement::Any(vec![
            (Ability::Strength, 13),
            (Ability::Dexterity, 13),
        ]),
        saving_throws: vec![Ability::Strength, Ability::Constitution],
        skill_count: 2,
        skill_options: vec![
            Skill::Acrobatics,
            Skill::AnimalHandling,
            Skill::Athletics,
            Skill::History,
            Skill::Insight,
            Skill::Intimidation,
            Skill::Perception,
            Skill::Persuasion,
            Skill::Survival,
        ],
        multiclass_skill_count: 0,
        armor: vec![
            ArmorCategory::Light,
            ArmorCategory::Medium,
            ArmorCategory::Heavy,
            ArmorCategory::Shields,
        ],
        weapons: vec![simple(), martial()],
        multiclass_armor: vec![ArmorCategory::Light, ArmorCategory::Medium, ArmorCategory::Shields],
        multiclass_weapons: vec![simple(), martial()],
        subclass_level: 3,
        asi_levels: vec![4, 6, 8, 12, 14, 16, 19],
        caster: None,
        spellcasting_ability: None,
        weapon_mastery: vec![(1, 3), (4, 4), (10, 5), (16, 6)],
        features: vec![
            feature(1, "Fighting Style", "Gain a Fighting Style feat of your choice.")
                .grants_fighting_style(),
            feature(1, "Second Wind", "Regain 1d10 + Fighter level hit points as a Bonus Action.")
                .with_uses(uses(
                    UsesFormula::ByClassLevel(vec![(1, 2), (4, 3), (10, 4)]),
                    RestType::ShortRest,
                )),
            feature(1, "Weapon Mastery", "Use the mastery properties of weapons you have mastered."),
            feature(2, "Action Surge", "Take one additional action on your turn.")
                .with_uses(uses(
                    UsesFormula::ByClassLevel(vec![(2, 1), (17, 2)]),
                    RestType::ShortRest,
                )),
            feature(2, "Tactical Mind", "Expend Second Wind to add 1d10 to a failed ability check."),
            feature(5, "Extra Attack", "Attack twice when you take the Attack action."),
            feature(5, "Tactical Shift", "Move half your Speed without provoking when you use Second Wind."),
            feature(9, "Indomitable", "Reroll a failed saving throw.")
                .with_uses(uses(
                    UsesFormula::ByClassLevel(vec![(9, 1), (13, 2), (17, 3)]),
                    RestType::LongRest,
                )),
            feature(9, "Tactical Master", "Replace a weapon's mastery property with Push, Sap or Slow."),
            feature(11, "Two Extra Attacks", "Attack three times when you take the Attack action."),
            feature(13, "Studied Attacks", "Gain Advantage on your next attack after a miss."),
            feature(20, "Three Extra Attacks", "Attack four times when you take the Attack action."),
        ],
        subclasses: vec![
            subclass(
                "Champion",
                "Pursue physical excellence in combat.",
                vec![
                    feature(3, "Improved Critical", "Weapon attacks score a Critical Hit on 19 or 20."),
                    feature(3, "Remarkable Athlete", "Advantage on Initiative and Strength (Athletics) checks."),
                    feature(7, "Additional Fighting Style", "Gain another Fighting Style feat.")
                        .grants_fighting_style(),
                    feature(10, "Heroic Warrior", "Gain Heroic Inspiration at the start of each turn if you lack it."),
                    feature(15, "Superior Critical", "Weapon attacks score a Critical Hit on 18-20."),
                    feature(18, "Survivor", "Regain hit points each turn while Bloodied."),
                ],
            ),
            battle_master,
        ],
    }
}

fn monk() -> ClassDefinition {
    ClassDefinition {
        name: "Monk".to_string(),
        description: "A martial artist of supernatural focus.".to_string(),
        hit_die: 8,
        multiclass_requirement: MulticlassRequirement::All(vec![
            (Ability::Dexterity, 13),
            (Ability::Wisdom, 13),
        ]),
        saving_throws: vec![Ability::Strength, Ability::Dexterity],
        skill_count: 2,
        skill_options: vec![
            Skill::Acrobatics,
            Skill::Athletics,
            Skill::History,
            Skill::Insight,
            Skill::Religion,
            Skill::Stealth,
        ],
        multiclass_skill_count: 0,
        armor: Vec::new(),
        weapons: vec![simple()],
        multiclass_armor: Vec::new(),
        multiclass_weapons: Vec::new(),
        subclass_level: 3,
        asi_levels: STANDARD_ASI.to_vec(),
        caster: None,
        spellcasting_ability: None,
        weapon_mastery: Vec::new(),
        features: vec![
            feature(1, "Martial Arts", "Use Dexterity for Monk weapons and Unarmed Strikes; roll Martial Arts dice for damage."),
            feature(1, "Unarmored Defense", "While unarmored without a shield, AC equals 10 + DEX + WIS."),
            feature(2, "Monk's Focus", "Spend Focus Points on Flurry of Blows, Patient Defense and Step of the Wind.")
                .with_uses(uses(UsesFormula::ClassLevel, RestType::ShortRest).focus_points()),
            feature(2, "Unarmored Movement", "Speed increases by 10 feet while unarmored.")
                .with_benefit(Benefit::Speed(10)),
            feature(2, "Uncanny Metabolism", "Regain all Focus Points and heal when you roll Initiative.")
                .with_uses(uses(UsesFormula::Fixed(1), RestType::LongRest)),
            feature(3, "Deflect Attacks", "Reduce damage from attacks that hit you."),
            feature(4, "Slow Fall", "Reduce falling damage."),
            feature(5, "Extra Attack", "Attack twice when you take the Attack action."),
            feature(5, "Stunning Strike", "Spend a Focus Point to try to stun a creature you hit."),
            feature(6, "Empowered Strikes", "Unarmed Strikes can deal Force damage."),
            feature(7, "Evasion", "Take no damage on successful Dexterity saves against area effects."),
            feature(9, "Acrobatic Movement", "Move along vertical surfaces and across liquids."),
            feature(10, "Heightened Focus", "Focus Point options improve."),
            feature(10, "Self-Restoration", "End Charmed, Frightened or Poisoned on yourself."),
            feature(13, "Deflect Energy", "Deflect Attacks works against any damage type."),
            feature(14, "Disciplined Survivor", "Proficiency in all saving throws."),
            feature(15, "Perfect Focus", "Regain Focus Points when you roll Initiative with few left."),
            feature(18, "Superior Defense", "Spend Focus Points for resistance to all damage but Force."),
            feature(20, "Body and Mind", "Dexterity and Wisdom increase by 4, to a maximum of 25.")
                .with_benefit(Benefit::AbilityScore { ability: Ability::Dexterity, amount: 4 })
                .with_benefit(Benefit::AbilityScore { ability: Ability::Wisdom, amount: 4 }),
        ],
        subclasses: vec![subclass(
            "Warrior of the Open Hand",
            "Master unarmed combat techniques.",
            vec![
                feature(3, "Open Hand Technique", "Flurry of Blows can push, topple or deny Reactions."),
                feature(6, "Wholeness of Body", "Heal yourself as a Bonus Action.")
                    .with_uses(uses(UsesFormula::AbilityModifier(Ability::Wisdom), RestType::LongRest)),
                feature(11, "Fleet Step", "Use Step of the Wind alongside other Bonus Actions."),
                feature(17, "Quivering Palm", "Set up lethal vibrations in a creature you hit."),
            ],
        )],
    }
}

fn paladin() -> ClassDefinition {
    ClassDefinition {
        name: "Paladin".to_string(),
        description: "A devout warrior bound by a sacred oath.".to_string(),
        hit_die: 10,
        multiclass_requirement: MulticlassRequirement::All(vec![
            (Ability::Strength, 13),
            (Ability::Charisma, 13),
        ]),
        saving_throws: vec![Ability::Wisdom, Ability::Charisma],
        skill_count: 2,
        skill_options: vec![
            Skill::Athletics,
            Skill::Insight,
            Skill::Intimidation,
            Skill::Medicine,
            Skill::Persuasion,
            Skill::Religion,
        ],
        multiclass_skill_count: 0,
        armor: vec![
            ArmorCategory::Light,
            ArmorCategory::Medium,
            ArmorCategory::Heavy,
            ArmorCategory::Shields,
        ],
        weapons: vec![simple(), martial()],
        multiclass_armor: vec![ArmorCategory::Light, ArmorCategory::Medium, ArmorCategory::Shields],
        multiclass_weapons: vec![simple(), martial()],
        subclass_level: 3,
        asi_levels: STANDARD_ASI.to_vec(),
        caster: Some(CasterType::Half),
        spellcasting_ability: Some(Ability::Charisma),
        weapon_mastery: vec![(1, 2)],
        features: vec![
            feature(1, "Lay On Hands", "Restore hit points from a pool equal to five times your Paladin level.")
                .with_uses(uses(UsesFormula::ClassLevelTimes(5), RestType::LongRest)),
            feature(1, "Spellcasting", "Cast Paladin spells using Charisma."),
            feature(1, "Weapon Mastery", "Use the mastery properties of weapons you have mastered."),
            feature(2, "Fighting Style", "Gain a Fighting Style feat of your choice.")
                .grants_fighting_style(),
            feature(2, "Paladin's Smite", "Always have Divine Smite prepared."),
            feature(3, "Channel Divinity", "Channel divine energy for Divine Sense or your oath's options.")
                .with_uses(uses(
                    UsesFormula::ByClassLevel(vec![(3, 2), (11, 3)]),
                    RestType::ShortRest,
                )),
            feature(5, "Extra Attack", "Attack twice when you take the Attack action."),
            feature(5, "Faithful Steed", "Always have Find Steed prepared."),
            feature(6, "Aura of Protection", "Allies within 10 feet add your Charisma modifier to saves."),
            feature(9, "Abjure Foes", "Channel Divinity to frighten foes."),
            feature(10, "Aura of Courage", "You and allies in your aura are immune to Frightened."),
            feature(11, "Radiant Strikes", "Melee weapon hits deal an extra 1d8 Radiant damage."),
            feature(14, "Restoring Touch", "Lay On Hands can end conditions."),
            feature(18, "Aura Expansion", "Your auras extend to 30 feet."),
        ],
        subclasses: vec![subclass(
            "Oath of Devotion",
            "Uphold the ideals of justice and order.",
            vec![
                feature(3, "Sacred Weapon", "Channel Divinity to imbue a weapon with positive energy."),
                feature(7, "Aura of Devotion", "You and allies in your aura are immune to Charmed."),
                feature(15, "Smite of Protection", "Divine Smite grants Half Cover to allies."),
                feature(20, "Holy Nimbus", "Emanate holy light that damages enemies.")
                    .with_uses(uses(UsesFormula::Fixed(1), RestType::LongRest)),
            ],
        )],
    }
}

fn ranger() -> ClassDefinition {
    ClassDefinition {
        name: "Ranger".to_string(),
        description: "A wandering warrior imbued with primal magic.".to_string(),
        hit_die: 10,
        multiclass_requirement: MulticlassRequirement::All(vec![
            (Ability::Dexterity, 13),
            (Ability::Wisdom, 13),
        ]),
        saving_throws: vec![Ability::Strength, Ability::Dexterity],
        skill_count: 3,
        skill_options: vec![
            Skill::AnimalHandling,
            Skill::Athletics,
            Skill::Insight,
            Skill::Investigation,
            Skill::Nature,
            Skill::Perception,
            Skill::Stealth,
            Skill::Survival,
        ],
        multiclass_skill_count: 1,
        armor: vec![ArmorCategory::Light, ArmorCategory::Medium, ArmorCategory::Shields],
        weapons: vec![simple(), martial()],
        multiclass_armor: vec![ArmorCategory::Light, ArmorCategory::Medium, ArmorCategory::Shields],
        multiclass_weapons: vec![martial()],
        subclass_level: 3,
        asi_levels: STANDARD_ASI.to_vec(),
        caster: Some(CasterType::Half),
        spellcasting_ability: Some(Ability::Wisdom),
        weapon_mastery: vec![(1, 2)],
        features: vec![
            feature(1, "Spellcasting", "Cast Ranger spells using Wisdom."),
            feature(1, "Favored Enemy", "Cast Hunter's Mark without a spell slot.")
                .with_uses(uses(
                    UsesFormula::ByClassLevel(vec![(1, 2), (5, 3), (9, 4), (13, 5), (17, 6)]),
                    RestType::LongRest,
                )),
            feature(1, "Weapon Mastery", "Use the mastery properties of weapons you have mastered."),
            feature(2, "Deft Explorer", "Gain Expertise in one skill and learn two languages."),
            feature(2, "Fighting Style", "Gain a Fighting Style feat of your choice.")
                .grants_fighting_style(),
            feature(5, "Extra Attack", "Attack twice when you take the Attack action."),
            feature(6, "Roving", "Speed increases by 10 feet; gain Climb and Swim Speeds.")
                .with_benefit(Benefit::Speed(10)),
            feature(9, "Expertise", "Gain Expertise in two skills."),
            feature(10, "Tireless", "Gain Temporary Hit Points as a Magic action.")
                .with_uses(uses(UsesFormula::AbilityModifier(Ability::Wisdom), RestType::LongRest)),
            feature(13, "Relentless Hunter", "Damage can't break concentration on Hunter's Mark."),
            feature(14, "Nature's Veil", "Become Invisible as a Bonus Action.")
                .with_uses(uses(UsesFormula::AbilityModifier(Ability::Wisdom), RestType::LongRest)),
            feature(17, "Precise Hunter", "Advantage on attacks against your Hunter's Mark target."),
            feature(18, "Feral Senses", "Gain Blindsight with a range of 30 feet."),
            feature(20, "Foe Slayer", "Hunter's Mark damage die becomes a d10."),
        ],
        subclasses: vec![subclass(
            "Hunter",
            "Protect nature and people from destruction.",
            vec![
                feature(3, "Hunter's Lore", "Learn a marked creature's immunities and resistances."),
                feature(3, "Hunter's Prey", "Choose Colossus Slayer or Horde Breaker."),
                feature(7, "Defensive Tactics", "Choose Escape the Horde or Multiattack Defense."),
                feature(11, "Superior Hunter's Prey", "Hunter's Mark damage spreads to a second creature."),
                feature(15, "Superior Hunter's Defense", "Gain resistance to damage as a Reaction."),
            ],
        )],
    }
}

fn rogue() -> ClassDefinition {
    let mut arcane_trickster = subclass(
        "Arcane Trickster",
        "Enhance stealth and agility with arcane spells.",
        vec![
            feature(3, "Spellcasting", "Cast Wizard spells using Intelligence."),
            feature(3, "Mage Hand Legerdemain", "Your Mage Hand is invisible and can pick locks."),
            feature(9, "Magical Ambush", "Spells cast while hidden impose Disadvantage on saves."),
            feature(13, "Versatile Trickster", "Use Mage Hand to distract a creature."),
            feature(17, "Spell Thief", "Steal a spell cast at you.")
                .with_uses(uses(UsesFormula::Fixed(1), RestType::LongRest)),
        ],
    );
    arcane_trickster.caster = Some(CasterType::Third);
    arcane_trickster.spellcasting_ability = Some(Ability::Intelligence);
    arcane_trickster.spell_list = Some("Wizard".to_string());

    ClassDefinition {
        name: "Rogue".to_string(),
        description: "A dexterous expert in stealth and subterfuge.".to_string(),
        hit_die: 8,
        multiclass_requirement: MulticlassRequirement::All(vec![(Ability::Dexterity, 13)]),
        saving_throws: vec![Ability::Dexterity, Ability::Intelligence],
        skill_count: 4,
        skill_options: vec![
            Skill::Acrobatics,
            Skill::Athletics,
            Skill::Deception,
            Skill::Insight,
            Skill::Intimidation,
            Skill::Investigation,
            Skill::Perception,
            Skill::Persuasion,
            Skill::SleightOfHand,
            Skill::Stealth,
        ],
        multiclass_skill_count: 1,
        armor: vec![ArmorCategory::Light],
        weapons: {
            let mut weapons = vec![simple()];
            weapons.extend(named(&["Hand Crossbow", "Rapier", "Scimitar", "Shortsword", "Whip"]));
            weapons
        },
        multiclass_armor: vec![ArmorCategory::Light],
        multiclass_weapons: named(&["Hand Crossbow", "Rapier", "Scimitar", "Shortsword", "Whip"]),
        subclass_level: 3,
        asi_levels: vec![4, 8, 10, 12, 16, 19],
        caster: None,
        spellcasting_ability: None,
        weapon_mastery: vec![(1, 2)],
        features: vec![
            feature(1, "Expertise", "Gain Expertise in two skills you are proficient in."),
            feature(1, "Sneak Attack", "Deal extra damage once per turn with Advantage or a nearby ally."),
            feature(1, "Thieves' Cant", "Know the secret language of rogues.")
                .with_benefit(Benefit::Language("Thieves' Cant".to_string())),
            feature(1, "Weapon Mastery", "Use the mastery properties of weapons you have mastered."),
            feature(2, "Cunning Action", "Dash, Disengage or Hide as a Bonus Action."),
            feature(3, "Steady Aim", "Give yourself Advantage on your next attack if you haven't moved."),
            feature(5, "Cunning Strike", "Trade Sneak Attack dice for effects."),
            feature(5, "Uncanny Dodge", "Halve the damage of an attack as a Reaction."),
            feature(7, "Evasion", "Take no damage on successful Dexterity saves against area effects."),
            feature(7, "Reliable Talent", "Treat d20 rolls of 9 or lower as 10 on proficient checks."),
            feature(11, "Improved Cunning Strike", "Use two Cunning Strike effects at once."),
            feature(14, "Devious Strikes", "New Cunning Strike effects."),
            feature(15, "Slippery Mind", "Proficiency in Wisdom and Charisma saving throws."),
            feature(18, "Elusive", "No attack roll has Advantage against you."),
            feature(20, "Stroke of Luck", "Turn a failed d20 test into a 20.")
                .with_uses(uses(UsesFormula::Fixed(1), RestType::ShortRest)),
        ],
        subclasses: vec![
            subclass(
                "Thief",
                "Hunt for treasure as a classic adventurer.",
                vec![
                    feature(3, "Fast Hands", "Use an object or Sleight of Hand as a Bonus Action."),
                    feature(3, "Second-Story Work", "Gain a Climb Speed and jump farther."),
                    feature(9, "Supreme Sneak", "Gain the Stealth Attack Cunning Strike option."),
                    feature(13, "Use Magic Device", "Ignore class restrictions on magic items."),
                    feature(17, "Thief's Reflexes", "Take two turns in the first round of combat."),
                ],
            ),
            arcane_trickster,
        ],
    }
}

fn sorcerer() -> ClassDefinition {
    let mut draconic = subclass(
        "Draconic Sorcery",
        "Breathe the magic of dragons.",
        vec![
            feature(3, "Draconic Resilience", "Your hit point maximum increases and scales cover you."),
            feature(3, "Draconic Spells", "Always have draconic spells prepared."),
            feature(6, "Elemental Affinity", "Resistance to and bonus damage with a chosen element."),
            feature(14, "Dragon Wings", "Sprout draconic wings and gain a Fly Speed.")
                .with_uses(uses(UsesFormula::Fixed(1), RestType::LongRest)),
            feature(18, "Dragon Companion", "Cast Summon Dragon without Material components."),
        ],
    );
    draconic.benefits = vec![Benefit::Language("Draconic".to_string())];

    ClassDefinition {
        name: "Sorcerer".to_string(),
        description: "A dazzling mage filled with innate magic.".to_string(),
        hit_die: 6,
        multiclass_requirement: MulticlassRequirement::All(vec![(Ability::Charisma, 13)]),
        saving_throws: vec![Ability::Constitution, Ability::Charisma],
        skill_count: 2,
        skill_options: vec![
            Skill::Arcana,
            Skill::Deception,
            Skill::Insight,
            Skill::Intimidation,
            Skill::Persuasion,
            Skill::Religion,
        ],
        multiclass_skill_count: 0,
        armor: Vec::new(),
        weapons: vec![simple()],
        multiclass_armor: Vec::new(),
        multiclass_weapons: Vec::new(),
        subclass_level: 3,
        asi_levels: STANDARD_ASI.to_vec(),
        caster: Some(CasterType::Full),
        spellcasting_ability: Some(Ability::Charisma),
        weapon_mastery: Vec::new(),
        features: vec![
            feature(1, "Spellcasting", "Cast Sorcerer spells using Charisma."),
            feature(1, "Innate Sorcery", "Unleash sorcery for one minute as a Bonus Action.")
                .with_uses(uses(UsesFormula::Fixed(2), RestType::LongRest)),
            feature(2, "Font of Magic", "Convert between Sorcery Points and spell slots.")
                .with_uses(uses(UsesFormula::ClassLevel, RestType::LongRest).with_pool("Sorcery Points")),
            feature(2, "Metamagic", "Learn two Metamagic options."),
            feature(5, "Sorcerous Restoration", "Regain Sorcery Points on a Short Rest.")
                .with_uses(uses(UsesFormula::Fixed(1), RestType::LongRest)),
            feature(7, "Sorcery Incarnate", "Use Innate Sorcery by spending Sorcery Points."),
            feature(20, "Arcane Apotheosis", "Use one Metamagic option each turn for free."),
        ],
        subclasses: vec![draconic],
    }
}

fn warlock() -> ClassDefinition {
    ClassDefinition {
        name: "Warlock".to_string(),
        description: "An occultist empowered by a pact with an otherworldly patron.".to_string(),
        hit_die: 8,
        multiclass_requirement: MulticlassRequirement::All(vec![(Ability::Charisma, 13)]),
        saving_throws: vec![Ability::Wisdom, Ability::Charisma],
        skill_count: 2,
        skill_options: vec![
            Skill::Arcana,
            Skill::Deception,
            Skill::History,
            Skill::Intimidation,
            Skill::Investigation,
            Skill::Nature,
            Skill::Religion,
        ],
        multiclass_skill_count: 0,
        armor: vec![ArmorCategory::Light],
        weapons: vec![simple()],
        multiclass_armor: vec![ArmorCategory::Light],
        multiclass_weapons: Vec::new(),
        subclass_level: 3,
        asi_levels: STANDARD_ASI.to_vec(),
        caster: Some(CasterType::Pact),
        spellcasting_ability: Some(Ability::Charisma),
        weapon_mastery: Vec::new(),
        features: vec![
            feature(1, "Eldritch Invocations", "Gain occult invocations."),
            feature(1, "Pact Magic", "Cast Warlock spells using Charisma with slots regained on a Short Rest."),
            feature(2, "Magical Cunning", "Regain half your Pact Magic slots with a one-minute rite.")
                .with_uses(uses(UsesFormula::Fixed(1), RestType::LongRest)),
            feature(9, "Contact Patron", "Always have Contact Other Plane prepared."),
            feature(11, "Mystic Arcanum", "Cast a level 6 spell once per Long Rest."),
            feature(20, "Eldritch Master", "Magical Cunning restores all Pact Magic slots."),
        ],
        subclasses: vec![subclass(
            "Fiend Patron",
            "Make a deal with the Lower Planes.",
            vec![
                feature(3, "Dark One's Blessing", "Gain Temporary Hit Points when you reduce an enemy to 0."),
                feature(6, "Dark One's Own Luck", "Add 1d10 to an ability check or saving throw.")
                    .with_uses(uses(UsesFormula::AbilityModifier(Ability::Charisma), RestType::LongRest)),
                feature(10, "Fiendish Resilience", "Choose a damage type to resist after each rest."),
                feature(14, "Hurl Through Hell", "Send a creature you hit through the Lower Planes.")
                    .with_uses(uses(UsesFormula::Fixed(1), RestType::LongRest)),
            ],
        )],
    }
}

fn wizard() -> ClassDefinition {
    ClassDefinition {
        name: "Wizard".to_string(),
        description: "A scholarly magic-user of arcane power.".to_string(),
        hit_die: 6,
        multiclass_requirement: MulticlassRequirement::All(vec![(Ability::Intelligence, 13)]),
        saving_throws: vec![Ability::Intelligence, Ability::Wisdom],
        skill_count: 2,
        skill_options: vec![
            Skill::Arcana,
            Skill::History,
            Skill::Insight,
            Skill::Investigation,
            Skill::Medicine,
            Skill::Nature,
            Skill::Religion,
        ],
        multiclass_skill_count: 0,
        armor: Vec::new(),
        weapons: vec![simple()],
        multiclass_armor: Vec::new(),
        multiclass_weapons: Vec::new(),
        subclass_level: 3,
        asi_levels: STANDARD_ASI.to_vec(),
        caster: Some(CasterType::Full),
        spellcasting_ability: Some(Ability::Intelligence),
        weapon_mastery: Vec::new(),
        features: vec![
            feature(1, "Spellcasting", "Cast Wizard spells from your spellbook using Intelligence."),
            feature(1, "Ritual Adept", "Cast Ritual spells from your spellbook without preparing them."),
            feature(1, "Arcane Recovery", "Recover expended spell slots once per day during a Short Rest.")
                .with_uses(uses(UsesFormula::Fixed(1), RestType::Daily)),
            feature(2, "Scholar", "Gain Expertise in an academic skill."),
            feature(5, "Memorize Spell", "Swap a prepared spell during a Short Rest."),
            feature(18, "Spell Mastery", "Cast a level 1 and a level 2 spell at will."),
            feature(20, "Signature Spells", "Cast two level 3 spells once each without a slot."),
        ],
        subclasses: vec![subclass(
            "Evoker",
            "Create powerful elemental effects.",
            vec![
                feature(3, "Evocation Savant", "Add Evocation spells to your spellbook for free."),
                feature(3, "Potent Cantrip", "Cantrips deal half damage on a miss or save."),
                feature(6, "Sculpt Spells", "Protect allies from your Evocation spells."),
                feature(10, "Empowered Evocation", "Add Intelligence to Evocation spell damage."),
                feature(14, "Overchannel", "Deal maximum damage with a spell of level 5 or lower.")
                    .with_uses(uses(UsesFormula::Fixed(1), RestType::LongRest)),
            ],
        )],
    }
}

pub(super) fn srd_maneuvers() -> Vec<ManeuverDefinition> {
    let maneuver = |name: &str, description: &str| ManeuverDefinition {
        name: name.to_string(),
        description: description.to_string(),
    };
    vec![
        maneuver("Commander's Strike", "Forgo an attack so an ally can strike with a Reaction, adding the Superiority Die to damage."),
        maneuver("Disarming Attack", "Add the Superiority Die to damage and force the target to drop an item."),
        maneuver("Distracting Strike", "Add the Superiority Die to damage; the next ally attack has Advantage."),
        maneuver("Evasive Footwork", "Add the Superiority Die to AC while moving."),
        maneuver("Feinting Attack", "Gain Advantage on your next attack and add the Superiority Die to damage."),
        maneuver("Goading Attack", "Add the Superiority Die to damage; the target has Disadvantage against others."),
        maneuver("Lunging Attack", "Increase reach by 5 feet and add the Superiority Die to damage."),
        maneuver("Maneuvering Attack", "Add the Superiority Die to damage and let an ally move without provoking."),
        maneuver("Menacing Attack", "Add the Superiority Die to damage and frighten the target."),
        maneuver("Parry", "Reduce melee damage by the Superiority Die plus STR or DEX modifier."),
        maneuver("Precision Attack", "Add the Superiority Die to an attack roll."),
        maneuver("Pushing Attack", "Add the Superiority Die to damage and push the target 15 feet."),
        maneuver("Rally", "Grant an ally Temporary Hit Points equal to the Superiority Die plus half your level."),
        maneuver("Riposte", "Attack a creature that misses you, adding the Superiority Die to damage."),
        maneuver("Sweeping Attack", "Deal Superiority Die damage to a second creature near the target."),
        maneuver("Trip Attack", "Add the Superiority Die to damage and knock the target Prone."),
    ]
}

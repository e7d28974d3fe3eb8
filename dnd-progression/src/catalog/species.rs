//! Built-in species and origins.

use super::{OriginDefinition, SpeciesDefinition, TraitDefinition, UsesDefinition, UsesFormula};
use crate::benefits::Benefit;
use crate::character::{Ability, Skill};
use crate::resources::RestType;

fn species(name: &str, description: &str, speed: u32) -> SpeciesDefinition {
    SpeciesDefinition {
        name: name.to_string(),
        description: description.to_string(),
        speed,
        traits: Vec::new(),
        benefits: Vec::new(),
        hp_per_level: 0,
        skill_choices: 0,
    }
}

fn species_trait(name: &str, description: &str) -> TraitDefinition {
    TraitDefinition {
        name: name.to_string(),
        description: description.to_string(),
        uses: None,
    }
}

fn limited_trait(name: &str, description: &str, formula: UsesFormula, rest: RestType) -> TraitDefinition {
    TraitDefinition {
        uses: Some(UsesDefinition::new(formula, rest)),
        ..species_trait(name, description)
    }
}

pub(super) fn srd_species() -> Vec<SpeciesDefinition> {
    let mut aasimar = species("Aasimar", "Mortals bearing a spark of the Upper Planes.", 30);
    aasimar.traits = vec![
        species_trait("Celestial Resistance", "Resistance to Necrotic and Radiant damage."),
        species_trait("Darkvision", "See in dim light within 60 feet as if it were bright light."),
        limited_trait("Healing Hands", "Touch a creature to restore hit points.", UsesFormula::Fixed(1), RestType::LongRest),
        limited_trait("Celestial Revelation", "Transform for one minute.", UsesFormula::Fixed(1), RestType::LongRest),
    ];
    aasimar.benefits = vec![
        Benefit::Resistance("Necrotic".to_string()),
        Benefit::Resistance("Radiant".to_string()),
    ];

    let mut dragonborn = species("Dragonborn", "Descendants of dragons with a draconic ancestry.", 30);
    dragonborn.traits = vec![
        limited_trait("Breath Weapon", "Exhale destructive energy in a cone or line.", UsesFormula::ProficiencyBonus, RestType::LongRest),
        species_trait("Damage Resistance", "Resistance to your ancestry's damage type."),
        species_trait("Darkvision", "See in dim light within 60 feet as if it were bright light."),
    ];
    dragonborn.benefits = vec![Benefit::Resistance("Fire".to_string())];

    let mut dwarf = species("Dwarf", "Hardy folk raised from the earth.", 30);
    dwarf.traits = vec![
        species_trait("Darkvision", "See in dim light within 120 feet as if it were bright light."),
        species_trait("Dwarven Resilience", "Resistance to Poison damage and Advantage on saves against Poisoned."),
        species_trait("Dwarven Toughness", "Hit point maximum increases by 1 per level."),
        limited_trait("Stonecunning", "Gain Tremorsense for 10 minutes.", UsesFormula::ProficiencyBonus, RestType::LongRest),
    ];
    dwarf.benefits = vec![Benefit::Resistance("Poison".to_string())];
    dwarf.hp_per_level = 1;

    let mut elf = species("Elf", "Magical people of otherworldly grace.", 30);
    elf.traits = vec![
        species_trait("Darkvision", "See in dim light within 60 feet as if it were bright light."),
        species_trait("Fey Ancestry", "Advantage on saves against Charmed."),
        species_trait("Keen Senses", "Proficiency in Perception."),
        species_trait("Trance", "Finish a Long Rest in 4 hours."),
    ];
    elf.benefits = vec![Benefit::Skill(Skill::Perception), Benefit::Language("Elvish".to_string())];

    let mut gnome = species("Gnome", "Magical folk with clever minds.", 30);
    gnome.traits = vec![
        species_trait("Darkvision", "See in dim light within 60 feet as if it were bright light."),
        species_trait("Gnomish Cunning", "Advantage on Intelligence, Wisdom and Charisma saves."),
    ];
    gnome.benefits = vec![Benefit::Language("Gnomish".to_string())];

    let mut goliath = species("Goliath", "Descendants of giants.", 35);
    goliath.traits = vec![
        limited_trait("Giant Ancestry", "Use a supernatural boon from your giant ancestry.", UsesFormula::ProficiencyBonus, RestType::LongRest),
        limited_trait("Large Form", "Become Large for 10 minutes.", UsesFormula::Fixed(1), RestType::LongRest),
        species_trait("Powerful Build", "Count as one size larger for carrying capacity."),
    ];

    let mut halfling = species("Halfling", "Small folk of comfort and luck.", 30);
    halfling.traits = vec![
        species_trait("Brave", "Advantage on saves against Frightened."),
        species_trait("Halfling Nimbleness", "Move through the space of larger creatures."),
        species_trait("Luck", "Reroll a 1 on a d20 test."),
        species_trait("Naturally Stealthy", "Hide behind larger creatures."),
    ];

    let mut human = species("Human", "Ambitious and adaptable people.", 30);
    human.traits = vec![
        species_trait("Resourceful", "Gain Heroic Inspiration after a Long Rest."),
        species_trait("Skillful", "Gain proficiency in one skill of your choice."),
        species_trait("Versatile", "Gain an Origin feat of your choice."),
    ];
    human.skill_choices = 1;

    let mut orc = species("Orc", "Tireless folk gifted with endurance.", 30);
    orc.traits = vec![
        limited_trait("Adrenaline Rush", "Dash as a Bonus Action and gain Temporary Hit Points.", UsesFormula::ProficiencyBonus, RestType::ShortRest),
        species_trait("Darkvision", "See in dim light within 120 feet as if it were bright light."),
        limited_trait("Relentless Endurance", "Drop to 1 hit point instead of 0.", UsesFormula::Fixed(1), RestType::LongRest),
    ];

    let mut tiefling = species("Tiefling", "People touched by the Lower Planes.", 30);
    tiefling.traits = vec![
        species_trait("Darkvision", "See in dim light within 60 feet as if it were bright light."),
        species_trait("Fiendish Legacy", "Resistance to a legacy damage type and innate spells."),
        species_trait("Otherworldly Presence", "Know the Thaumaturgy cantrip."),
    ];
    tiefling.benefits = vec![Benefit::Resistance("Fire".to_string()), Benefit::Language("Infernal".to_string())];

    vec![
        aasimar, dragonborn, dwarf, elf, gnome, goliath, halfling, human, orc, tiefling,
    ]
}

fn origin(
    name: &str,
    description: &str,
    abilities: [Ability; 3],
    feat: &str,
    skills: [Skill; 2],
) -> OriginDefinition {
    OriginDefinition {
        name: name.to_string(),
        description: description.to_string(),
        abilities: abilities.to_vec(),
        feat: feat.to_string(),
        skills: skills.to_vec(),
    }
}

pub(super) fn srd_origins() -> Vec<OriginDefinition> {
    use Ability::*;
    vec![
        origin("Acolyte", "Devoted to service in a temple.", [Intelligence, Wisdom, Charisma], "Magic Initiate (Cleric)", [Skill::Insight, Skill::Religion]),
        origin("Artisan", "Apprenticed to a master crafter.", [Strength, Dexterity, Intelligence], "Crafter", [Skill::Investigation, Skill::Persuasion]),
        origin("Charlatan", "Sold false wares and fake fortunes.", [Dexterity, Constitution, Charisma], "Skilled", [Skill::Deception, Skill::SleightOfHand]),
        origin("Criminal", "Made ends meet in dark alleys.", [Dexterity, Constitution, Intelligence], "Alert", [Skill::SleightOfHand, Skill::Stealth]),
        origin("Entertainer", "Performed for crowds.", [Strength, Dexterity, Charisma], "Musician", [Skill::Acrobatics, Skill::Performance]),
        origin("Farmer", "Grew up close to the land.", [Strength, Constitution, Wisdom], "Tough", [Skill::AnimalHandling, Skill::Nature]),
        origin("Guard", "Kept watch on a city wall.", [Strength, Intelligence, Wisdom], "Alert", [Skill::Athletics, Skill::Perception]),
        origin("Guide", "Led travelers through the wilds.", [Dexterity, Constitution, Wisdom], "Magic Initiate (Druid)", [Skill::Stealth, Skill::Survival]),
        origin("Hermit", "Lived in seclusion.", [Constitution, Wisdom, Charisma], "Healer", [Skill::Medicine, Skill::Religion]),
        origin("Merchant", "Traded goods along busy roads.", [Constitution, Intelligence, Charisma], "Lucky", [Skill::AnimalHandling, Skill::Persuasion]),
        origin("Noble", "Raised in a castle among wealth.", [Strength, Intelligence, Charisma], "Skilled", [Skill::History, Skill::Persuasion]),
        origin("Sage", "Spent formative years among scholars.", [Constitution, Intelligence, Wisdom], "Magic Initiate (Wizard)", [Skill::Arcana, Skill::History]),
        origin("Sailor", "Lived as a seafarer.", [Strength, Dexterity, Wisdom], "Tavern Brawler", [Skill::Acrobatics, Skill::Perception]),
        origin("Scribe", "Copied texts in a scriptorium.", [Dexterity, Intelligence, Wisdom], "Skilled", [Skill::Investigation, Skill::Perception]),
        origin("Soldier", "Trained for war from a young age.", [Strength, Dexterity, Constitution], "Savage Attacker", [Skill::Athletics, Skill::Intimidation]),
        origin("Wayfarer", "Grew up on the streets.", [Dexterity, Wisdom, Charisma], "Lucky", [Skill::Insight, Skill::Stealth]),
    ]
}

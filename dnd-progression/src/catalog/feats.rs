//! Built-in feats, including fighting styles and epic boons.

use super::{FeatBenefit, FeatCategory, FeatDefinition, FeatPrerequisite, UsesDefinition, UsesFormula};
use crate::character::{Ability, Skill};
use crate::resources::RestType;

use Ability::*;

fn feat(name: &str, category: FeatCategory, description: &str) -> FeatDefinition {
    let prerequisite = match category {
        FeatCategory::Origin => FeatPrerequisite::default(),
        FeatCategory::General => FeatPrerequisite {
            min_level: 4,
            ..Default::default()
        },
        FeatCategory::FightingStyle => FeatPrerequisite {
            fighting_style_feature: true,
            ..Default::default()
        },
        FeatCategory::EpicBoon => FeatPrerequisite {
            min_level: 19,
            ..Default::default()
        },
    };
    FeatDefinition {
        name: name.to_string(),
        description: description.to_string(),
        category,
        prerequisite,
        benefits: Vec::new(),
    }
}

trait FeatExt {
    fn benefit(self, benefit: FeatBenefit) -> Self;
    fn plus_one(self, options: &[Ability]) -> Self;
    fn requires(self, abilities: &[(Ability, u8)]) -> Self;
    fn requires_spellcasting(self) -> Self;
    fn feature(self, name: &str, description: &str, uses: Option<UsesDefinition>) -> Self;
}

impl FeatExt for FeatDefinition {
    fn benefit(mut self, benefit: FeatBenefit) -> Self {
        self.benefits.push(benefit);
        self
    }

    fn plus_one(self, options: &[Ability]) -> Self {
        self.benefit(FeatBenefit::AbilityChoice {
            options: options.to_vec(),
            amount: 1,
        })
    }

    fn requires(mut self, abilities: &[(Ability, u8)]) -> Self {
        self.prerequisite.abilities = abilities.to_vec();
        self
    }

    fn requires_spellcasting(mut self) -> Self {
        self.prerequisite.spellcasting = true;
        self
    }

    fn feature(self, name: &str, description: &str, uses: Option<UsesDefinition>) -> Self {
        self.benefit(FeatBenefit::Feature {
            name: name.to_string(),
            description: description.to_string(),
            uses,
        })
    }
}

pub(super) fn srd_feats() -> Vec<FeatDefinition> {
    let all = Ability::all();
    let mental = [Intelligence, Wisdom, Charisma];
    vec![
        // Origin feats
        feat("Alert", FeatCategory::Origin, "Add your Proficiency Bonus to Initiative and swap Initiative with an ally."),
        feat("Crafter", FeatCategory::Origin, "Gain tool proficiencies and craft faster and cheaper."),
        feat("Healer", FeatCategory::Origin, "Use a Healer's Kit to restore hit points and reroll healing 1s."),
        feat("Lucky", FeatCategory::Origin, "Spend Luck Points to gain Advantage or impose Disadvantage.")
            .feature(
                "Luck Points",
                "Spend a point for Advantage on a d20 test or to impose Disadvantage on an attack against you.",
                Some(UsesDefinition::new(UsesFormula::ProficiencyBonus, RestType::LongRest)),
            ),
        feat("Magic Initiate (Cleric)", FeatCategory::Origin, "Learn two Cleric cantrips and one level 1 Cleric spell.")
            .feature("Magic Initiate (Cleric)", "Cast the chosen level 1 spell once without a slot.", Some(UsesDefinition::new(UsesFormula::Fixed(1), RestType::LongRest))),
        feat("Magic Initiate (Druid)", FeatCategory::Origin, "Learn two Druid cantrips and one level 1 Druid spell.")
            .feature("Magic Initiate (Druid)", "Cast the chosen level 1 spell once without a slot.", Some(UsesDefinition::new(UsesFormula::Fixed(1), RestType::LongRest))),
        feat("Magic Initiate (Wizard)", FeatCategory::Origin, "Learn two Wizard cantrips and one level 1 Wizard spell.")
            .feature("Magic Initiate (Wizard)", "Cast the chosen level 1 spell once without a slot.", Some(UsesDefinition::new(UsesFormula::Fixed(1), RestType::LongRest))),
        feat("Musician", FeatCategory::Origin, "Give Heroic Inspiration to allies after a rest."),
        feat("Savage Attacker", FeatCategory::Origin, "Roll weapon damage dice twice once per turn and use either roll."),
        feat("Skilled", FeatCategory::Origin, "Gain proficiency in any combination of three skills or tools.")
            .benefit(FeatBenefit::SkillChoice(3)),
        feat("Tavern Brawler", FeatCategory::Origin, "Unarmed Strikes deal 1d4 damage and can push."),
        feat("Tough", FeatCategory::Origin, "Your hit point maximum increases by twice your level, and by 2 on every later level.")
            .benefit(FeatBenefit::HitPointsPerLevel(2)),

        // General feats
        feat("Actor", FeatCategory::General, "Mimic voices and gain Advantage on disguise checks.")
            .requires(&[(Charisma, 13)])
            .benefit(FeatBenefit::Ability { ability: Charisma, amount: 1 }),
        feat("Athlete", FeatCategory::General, "Gain a Climb Speed and stand up quickly.")
            .requires(&[(Strength, 13), (Dexterity, 13)])
            .plus_one(&[Strength, Dexterity]),
        feat("Charger", FeatCategory::General, "Dash into an improved attack.")
            .requires(&[(Strength, 13), (Dexterity, 13)])
            .plus_one(&[Strength, Dexterity]),
        feat("Crossbow Expert", FeatCategory::General, "Ignore Loading and fire in melee without Disadvantage.")
            .requires(&[(Dexterity, 13)])
            .benefit(FeatBenefit::Ability { ability: Dexterity, amount: 1 }),
        feat("Dual Wielder", FeatCategory::General, "Attack with a second non-Light weapon as a Bonus Action.")
            .requires(&[(Strength, 13), (Dexterity, 13)])
            .plus_one(&[Strength, Dexterity]),
        feat("Durable", FeatCategory::General, "Advantage on Death Saving Throws and faster Hit Dice healing.")
            .benefit(FeatBenefit::Ability { ability: Constitution, amount: 1 }),
        feat("Elemental Adept", FeatCategory::General, "Spells ignore resistance to a chosen damage type.")
            .requires_spellcasting()
            .plus_one(&mental),
        feat("Fey Touched", FeatCategory::General, "Learn Misty Step and a level 1 Divination or Enchantment spell.")
            .plus_one(&mental),
        feat("Great Weapon Master", FeatCategory::General, "Heavy weapons deal extra damage equal to your Proficiency Bonus.")
            .requires(&[(Strength, 13)])
            .benefit(FeatBenefit::Ability { ability: Strength, amount: 1 }),
        feat("Keen Mind", FeatCategory::General, "Study as a Bonus Action and gain proficiency in a knowledge skill.")
            .requires(&[(Intelligence, 13)])
            .benefit(FeatBenefit::Ability { ability: Intelligence, amount: 1 })
            .benefit(FeatBenefit::SkillChoice(1)),
        feat("Linguist", FeatCategory::General, "Learn three languages and create ciphers.")
            .requires(&[(Intelligence, 13)])
            .benefit(FeatBenefit::Ability { ability: Intelligence, amount: 1 })
            .benefit(FeatBenefit::LanguageChoice(3)),
        feat("Mobile", FeatCategory::General, "Your Speed increases by 10 feet.")
            .requires(&[(Dexterity, 13), (Constitution, 13)])
            .plus_one(&[Dexterity, Constitution])
            .benefit(FeatBenefit::Speed(10)),
        feat("Observant", FeatCategory::General, "Search as a Bonus Action and gain a perception skill.")
            .requires(&[(Intelligence, 13), (Wisdom, 13)])
            .plus_one(&[Intelligence, Wisdom])
            .benefit(FeatBenefit::SkillChoice(1)),
        feat("Polearm Master", FeatCategory::General, "Bonus attack with a polearm's butt end and reactive strikes.")
            .requires(&[(Strength, 13), (Dexterity, 13)])
            .plus_one(&[Strength, Dexterity]),
        feat("Sentinel", FeatCategory::General, "Stop foes with Opportunity Attacks.")
            .requires(&[(Strength, 13), (Dexterity, 13)])
            .plus_one(&[Strength, Dexterity]),
        feat("Skill Expert", FeatCategory::General, "Gain a skill proficiency and Expertise in one skill.")
            .plus_one(&all)
            .benefit(FeatBenefit::SkillChoice(1)),
        feat("War Caster", FeatCategory::General, "Advantage on Concentration saves and cast spells as Opportunity Attacks.")
            .requires_spellcasting()
            .plus_one(&mental),
        feat("Infernal Constitution", FeatCategory::General, "Resistance to Cold and Poison damage.")
            .benefit(FeatBenefit::Ability { ability: Constitution, amount: 1 })
            .benefit(FeatBenefit::Resistance("Cold".to_string()))
            .benefit(FeatBenefit::Resistance("Poison".to_string())),
        feat("Acrobat", FeatCategory::General, "Gain proficiency in Acrobatics.")
            .benefit(FeatBenefit::Ability { ability: Dexterity, amount: 1 })
            .benefit(FeatBenefit::Skill(Skill::Acrobatics)),

        // Fighting styles
        feat("Archery", FeatCategory::FightingStyle, "+2 bonus to attack rolls with Ranged weapons."),
        feat("Blind Fighting", FeatCategory::FightingStyle, "Gain Blindsight with a range of 10 feet."),
        feat("Defense", FeatCategory::FightingStyle, "+1 bonus to AC while wearing armor."),
        feat("Dueling", FeatCategory::FightingStyle, "+2 damage with a one-handed melee weapon and no other weapon."),
        feat("Great Weapon Fighting", FeatCategory::FightingStyle, "Treat 1s and 2s on two-handed weapon damage dice as 3s."),
        feat("Interception", FeatCategory::FightingStyle, "Reduce damage to a nearby ally as a Reaction."),
        feat("Protection", FeatCategory::FightingStyle, "Impose Disadvantage on attacks against a nearby ally."),
        feat("Two-Weapon Fighting", FeatCategory::FightingStyle, "Add your ability modifier to the damage of the extra Light weapon attack."),

        // Epic boons
        feat("Boon of Combat Prowess", FeatCategory::EpicBoon, "Turn a missed attack into a hit once per turn.")
            .plus_one(&all),
        feat("Boon of Fortitude", FeatCategory::EpicBoon, "Your hit point maximum increases by 40.")
            .plus_one(&all)
            .benefit(FeatBenefit::HitPoints(40)),
        feat("Boon of Recovery", FeatCategory::EpicBoon, "Regain half your hit points once per Long Rest.")
            .plus_one(&all)
            .feature(
                "Last Stand",
                "Drop to 1 hit point instead of 0 and regain half your hit points.",
                Some(UsesDefinition::new(UsesFormula::Fixed(1), RestType::LongRest)),
            ),
        feat("Boon of Speed", FeatCategory::EpicBoon, "Your Speed increases by 30 feet.")
            .plus_one(&all)
            .benefit(FeatBenefit::Speed(30)),
    ]
}

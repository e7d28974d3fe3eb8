//! Items, equipment and the standard weapon table.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Items and Inventory
// ============================================================================

/// Inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub quantity: u32,
    pub weight: f32,
    pub value_gp: f32,
    pub description: Option<String>,
    pub item_type: ItemType,
    pub magical: bool,
}

impl Item {
    pub fn new(name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            name: name.into(),
            quantity: 1,
            weight: 0.0,
            value_gp: 0.0,
            description: None,
            item_type,
            magical: false,
        }
    }

    /// Weapons, armor, shields and unique magic items don't stack.
    pub fn is_stackable(&self) -> bool {
        match self.item_type {
            ItemType::Weapon | ItemType::Armor | ItemType::Shield => false,
            ItemType::Wondrous => false,
            ItemType::Potion | ItemType::Scroll | ItemType::Adventuring | ItemType::Other => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    Weapon,
    Armor,
    Shield,
    Potion,
    Scroll,
    Wondrous,
    Adventuring,
    Other,
}

/// Carried items and coin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<Item>,
    pub gold: f32,
}

impl Inventory {
    /// Add an item, stacking it onto an existing entry when the type allows.
    pub fn add_item(&mut self, item: Item) {
        if item.is_stackable() {
            if let Some(existing) = self.items.iter_mut().find(|i| i.name == item.name) {
                existing.quantity += item.quantity;
                return;
            }
        }
        self.items.push(item);
    }

    /// Remove a quantity of an item by name (case-insensitive).
    /// Returns false if there aren't enough.
    pub fn remove_item(&mut self, name: &str, quantity: u32) -> bool {
        if let Some(idx) = self
            .items
            .iter()
            .position(|i| i.name.eq_ignore_ascii_case(name))
        {
            if self.items[idx].quantity >= quantity {
                self.items[idx].quantity -= quantity;
                if self.items[idx].quantity == 0 {
                    self.items.remove(idx);
                }
                return true;
            }
        }
        false
    }

    pub fn find_item(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.find_item(name).is_some()
    }

    pub fn total_weight(&self) -> f32 {
        self.items
            .iter()
            .map(|i| i.weight * i.quantity as f32)
            .sum()
    }
}

// ============================================================================
// Proficiency categories
// ============================================================================

/// Weapon training category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponCategory {
    Simple,
    Martial,
}

impl WeaponCategory {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponCategory::Simple => "Simple weapons",
            WeaponCategory::Martial => "Martial weapons",
        }
    }
}

/// Armor training category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorCategory {
    Light,
    Medium,
    Heavy,
    Shields,
}

impl ArmorCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ArmorCategory::Light => "Light armor",
            ArmorCategory::Medium => "Medium armor",
            ArmorCategory::Heavy => "Heavy armor",
            ArmorCategory::Shields => "Shields",
        }
    }
}

// ============================================================================
// Weapons
// ============================================================================

/// Weapon damage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponDamageType {
    Slashing,
    Piercing,
    Bludgeoning,
}

impl WeaponDamageType {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponDamageType::Slashing => "slashing",
            WeaponDamageType::Piercing => "piercing",
            WeaponDamageType::Bludgeoning => "bludgeoning",
        }
    }
}

/// Weapon properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponProperty {
    Finesse,
    Light,
    Heavy,
    TwoHanded,
    Versatile(String),
    Thrown,
    Ammunition,
    Loading,
    Reach,
}

/// Weapon mastery properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponMastery {
    Cleave,
    Graze,
    Nick,
    Push,
    Sap,
    Slow,
    Topple,
    Vex,
}

impl WeaponMastery {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponMastery::Cleave => "Cleave",
            WeaponMastery::Graze => "Graze",
            WeaponMastery::Nick => "Nick",
            WeaponMastery::Push => "Push",
            WeaponMastery::Sap => "Sap",
            WeaponMastery::Slow => "Slow",
            WeaponMastery::Topple => "Topple",
            WeaponMastery::Vex => "Vex",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WeaponMastery::Cleave => "On a melee hit, make one more attack against a second creature within 5 feet of the first. You don't add your ability modifier to its damage unless negative. Once per turn.",
            WeaponMastery::Graze => "On a miss, deal damage equal to the ability modifier you used for the attack roll.",
            WeaponMastery::Nick => "The extra attack of the Light property can be made as part of the Attack action instead of as a Bonus Action. Once per turn.",
            WeaponMastery::Push => "On a hit, push a Large or smaller creature up to 10 feet straight away from you.",
            WeaponMastery::Sap => "On a hit, the target has Disadvantage on its next attack roll before the start of your next turn.",
            WeaponMastery::Slow => "On a hit that deals damage, reduce the target's Speed by 10 feet until the start of your next turn.",
            WeaponMastery::Topple => "On a hit, the target makes a Constitution save (DC 8 + ability modifier + proficiency bonus) or has the Prone condition.",
            WeaponMastery::Vex => "On a hit that deals damage, you have Advantage on your next attack roll against that creature before the end of your next turn.",
        }
    }

    pub fn from_name(name: &str) -> Option<WeaponMastery> {
        Self::all()
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn all() -> [WeaponMastery; 8] {
        [
            WeaponMastery::Cleave,
            WeaponMastery::Graze,
            WeaponMastery::Nick,
            WeaponMastery::Push,
            WeaponMastery::Sap,
            WeaponMastery::Slow,
            WeaponMastery::Topple,
            WeaponMastery::Vex,
        ]
    }
}

impl fmt::Display for WeaponMastery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A weapon with its rules properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponItem {
    pub base: Item,
    pub category: WeaponCategory,
    pub damage_dice: String,
    pub damage_type: WeaponDamageType,
    pub properties: Vec<WeaponProperty>,
    /// Normal and long range in feet, for ranged and thrown weapons.
    pub range: Option<(u32, u32)>,
    /// Ranged weapon (as opposed to a melee weapon that can be thrown).
    #[serde(default)]
    pub ranged: bool,
    pub mastery: Option<WeaponMastery>,
}

impl WeaponItem {
    pub fn new(
        name: impl Into<String>,
        damage_dice: impl Into<String>,
        damage_type: WeaponDamageType,
    ) -> Self {
        let mut base = Item::new(name, ItemType::Weapon);
        base.quantity = 1;
        Self {
            base,
            category: WeaponCategory::Simple,
            damage_dice: damage_dice.into(),
            damage_type,
            properties: Vec::new(),
            range: None,
            ranged: false,
            mastery: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn martial(mut self) -> Self {
        self.category = WeaponCategory::Martial;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.base.weight = weight;
        self
    }

    pub fn with_value(mut self, value_gp: f32) -> Self {
        self.base.value_gp = value_gp;
        self
    }

    pub fn with_properties(mut self, properties: Vec<WeaponProperty>) -> Self {
        self.properties = properties;
        self
    }

    /// Range for a thrown melee weapon.
    pub fn with_range(mut self, normal: u32, long: u32) -> Self {
        self.range = Some((normal, long));
        self
    }

    /// Mark as a ranged weapon with the given range.
    pub fn ranged(mut self, normal: u32, long: u32) -> Self {
        self.range = Some((normal, long));
        self.ranged = true;
        self
    }

    pub fn with_mastery(mut self, mastery: WeaponMastery) -> Self {
        self.mastery = Some(mastery);
        self
    }

    pub fn magical(mut self) -> Self {
        self.base.magical = true;
        self
    }

    pub fn is_finesse(&self) -> bool {
        self.properties.contains(&WeaponProperty::Finesse)
    }

    pub fn is_light(&self) -> bool {
        self.properties.contains(&WeaponProperty::Light)
    }

    pub fn is_ranged(&self) -> bool {
        self.ranged
    }

    pub fn is_two_handed(&self) -> bool {
        self.properties.contains(&WeaponProperty::TwoHanded)
    }

    pub fn is_heavy(&self) -> bool {
        self.properties.contains(&WeaponProperty::Heavy)
    }

    pub fn versatile_damage(&self) -> Option<&str> {
        self.properties.iter().find_map(|p| match p {
            WeaponProperty::Versatile(dice) => Some(dice.as_str()),
            _ => None,
        })
    }

    /// Simple melee weapons without Heavy or Two-Handed (plus shortswords)
    /// count as Monk weapons.
    pub fn is_monk_weapon(&self) -> bool {
        if self.base.name.eq_ignore_ascii_case("Shortsword") {
            return true;
        }
        self.category == WeaponCategory::Simple
            && !self.ranged
            && !self.is_heavy()
            && !self.is_two_handed()
    }
}

// ============================================================================
// Equipment
// ============================================================================

/// Which hand a weapon is held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    Main,
    Off,
}

/// What the character is actively wielding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub main_hand: Option<WeaponItem>,
    pub off_hand: Option<WeaponItem>,
    pub shield: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equip a weapon, returning whatever was in that hand.
    pub fn equip(&mut self, weapon: WeaponItem, hand: Hand) -> Option<WeaponItem> {
        match hand {
            Hand::Main => self.main_hand.replace(weapon),
            Hand::Off => self.off_hand.replace(weapon),
        }
    }

    pub fn unequip(&mut self, hand: Hand) -> Option<WeaponItem> {
        match hand {
            Hand::Main => self.main_hand.take(),
            Hand::Off => self.off_hand.take(),
        }
    }

    /// Equipped weapons, main hand first.
    pub fn weapons(&self) -> Vec<(Hand, &WeaponItem)> {
        let mut weapons = Vec::new();
        if let Some(weapon) = &self.main_hand {
            weapons.push((Hand::Main, weapon));
        }
        if let Some(weapon) = &self.off_hand {
            weapons.push((Hand::Off, weapon));
        }
        weapons
    }
}

// ============================================================================
// Standard weapons
// ============================================================================

/// Get a standard weapon by name.
pub fn get_weapon(name: &str) -> Option<WeaponItem> {
    WEAPONS
        .iter()
        .find(|w| w.base.name.eq_ignore_ascii_case(name))
        .cloned()
}

lazy_static::lazy_static! {
    /// Standard weapons with their mastery properties.
    pub static ref WEAPONS: Vec<WeaponItem> = vec![
        // Simple Melee Weapons
        WeaponItem::new("Club", "1d4", WeaponDamageType::Bludgeoning)
            .with_weight(2.0)
            .with_value(0.1)
            .with_properties(vec![WeaponProperty::Light])
            .with_mastery(WeaponMastery::Slow),
        WeaponItem::new("Dagger", "1d4", WeaponDamageType::Piercing)
            .with_weight(1.0)
            .with_value(2.0)
            .with_properties(vec![WeaponProperty::Finesse, WeaponProperty::Light, WeaponProperty::Thrown])
            .with_range(20, 60)
            .with_mastery(WeaponMastery::Nick),
        WeaponItem::new("Greatclub", "1d8", WeaponDamageType::Bludgeoning)
            .with_weight(10.0)
            .with_value(0.2)
            .with_properties(vec![WeaponProperty::TwoHanded])
            .with_mastery(WeaponMastery::Push),
        WeaponItem::new("Handaxe", "1d6", WeaponDamageType::Slashing)
            .with_weight(2.0)
            .with_value(5.0)
            .with_properties(vec![WeaponProperty::Light, WeaponProperty::Thrown])
            .with_range(20, 60)
            .with_mastery(WeaponMastery::Vex),
        WeaponItem::new("Javelin", "1d6", WeaponDamageType::Piercing)
            .with_weight(2.0)
            .with_value(0.5)
            .with_properties(vec![WeaponProperty::Thrown])
            .with_range(30, 120)
            .with_mastery(WeaponMastery::Slow),
        WeaponItem::new("Light Hammer", "1d4", WeaponDamageType::Bludgeoning)
            .with_weight(2.0)
            .with_value(2.0)
            .with_properties(vec![WeaponProperty::Light, WeaponProperty::Thrown])
            .with_range(20, 60)
            .with_mastery(WeaponMastery::Nick),
        WeaponItem::new("Mace", "1d6", WeaponDamageType::Bludgeoning)
            .with_weight(4.0)
            .with_value(5.0)
            .with_mastery(WeaponMastery::Sap),
        WeaponItem::new("Quarterstaff", "1d6", WeaponDamageType::Bludgeoning)
            .with_weight(4.0)
            .with_value(0.2)
            .with_properties(vec![WeaponProperty::Versatile("1d8".to_string())])
            .with_mastery(WeaponMastery::Topple),
        WeaponItem::new("Sickle", "1d4", WeaponDamageType::Slashing)
            .with_weight(2.0)
            .with_value(1.0)
            .with_properties(vec![WeaponProperty::Light])
            .with_mastery(WeaponMastery::Nick),
        WeaponItem::new("Spear", "1d6", WeaponDamageType::Piercing)
            .with_weight(3.0)
            .with_value(1.0)
            .with_properties(vec![WeaponProperty::Thrown, WeaponProperty::Versatile("1d8".to_string())])
            .with_range(20, 60)
            .with_mastery(WeaponMastery::Sap),

        // Simple Ranged Weapons
        WeaponItem::new("Dart", "1d4", WeaponDamageType::Piercing)
            .with_weight(0.25)
            .with_value(0.05)
            .with_properties(vec![WeaponProperty::Finesse, WeaponProperty::Thrown])
            .ranged(20, 60)
            .with_mastery(WeaponMastery::Vex),
        WeaponItem::new("Light Crossbow", "1d8", WeaponDamageType::Piercing)
            .with_weight(5.0)
            .with_value(25.0)
            .with_properties(vec![WeaponProperty::Ammunition, WeaponProperty::Loading, WeaponProperty::TwoHanded])
            .ranged(80, 320)
            .with_mastery(WeaponMastery::Slow),
        WeaponItem::new("Shortbow", "1d6", WeaponDamageType::Piercing)
            .with_weight(2.0)
            .with_value(25.0)
            .with_properties(vec![WeaponProperty::Ammunition, WeaponProperty::TwoHanded])
            .ranged(80, 320)
            .with_mastery(WeaponMastery::Vex),
        WeaponItem::new("Sling", "1d4", WeaponDamageType::Bludgeoning)
            .with_value(0.1)
            .with_properties(vec![WeaponProperty::Ammunition])
            .ranged(30, 120)
            .with_mastery(WeaponMastery::Slow),

        // Martial Melee Weapons
        WeaponItem::new("Battleaxe", "1d8", WeaponDamageType::Slashing)
            .martial()
            .with_weight(4.0)
            .with_value(10.0)
            .with_properties(vec![WeaponProperty::Versatile("1d10".to_string())])
            .with_mastery(WeaponMastery::Topple),
        WeaponItem::new("Flail", "1d8", WeaponDamageType::Bludgeoning)
            .martial()
            .with_weight(2.0)
            .with_value(10.0)
            .with_mastery(WeaponMastery::Sap),
        WeaponItem::new("Glaive", "1d10", WeaponDamageType::Slashing)
            .martial()
            .with_weight(6.0)
            .with_value(20.0)
            .with_properties(vec![WeaponProperty::Heavy, WeaponProperty::Reach, WeaponProperty::TwoHanded])
            .with_mastery(WeaponMastery::Graze),
        WeaponItem::new("Greataxe", "1d12", WeaponDamageType::Slashing)
            .martial()
            .with_weight(7.0)
            .with_value(30.0)
            .with_properties(vec![WeaponProperty::Heavy, WeaponProperty::TwoHanded])
            .with_mastery(WeaponMastery::Cleave),
        WeaponItem::new("Greatsword", "2d6", WeaponDamageType::Slashing)
            .martial()
            .with_weight(6.0)
            .with_value(50.0)
            .with_properties(vec![WeaponProperty::Heavy, WeaponProperty::TwoHanded])
            .with_mastery(WeaponMastery::Graze),
        WeaponItem::new("Halberd", "1d10", WeaponDamageType::Slashing)
            .martial()
            .with_weight(6.0)
            .with_value(20.0)
            .with_properties(vec![WeaponProperty::Heavy, WeaponProperty::Reach, WeaponProperty::TwoHanded])
            .with_mastery(WeaponMastery::Cleave),
        WeaponItem::new("Lance", "1d10", WeaponDamageType::Piercing)
            .martial()
            .with_weight(6.0)
            .with_value(10.0)
            .with_properties(vec![WeaponProperty::Heavy, WeaponProperty::Reach, WeaponProperty::TwoHanded])
            .with_mastery(WeaponMastery::Topple),
        WeaponItem::new("Longsword", "1d8", WeaponDamageType::Slashing)
            .martial()
            .with_weight(3.0)
            .with_value(15.0)
            .with_properties(vec![WeaponProperty::Versatile("1d10".to_string())])
            .with_mastery(WeaponMastery::Sap),
        WeaponItem::new("Maul", "2d6", WeaponDamageType::Bludgeoning)
            .martial()
            .with_weight(10.0)
            .with_value(10.0)
            .with_properties(vec![WeaponProperty::Heavy, WeaponProperty::TwoHanded])
            .with_mastery(WeaponMastery::Topple),
        WeaponItem::new("Morningstar", "1d8", WeaponDamageType::Piercing)
            .martial()
            .with_weight(4.0)
            .with_value(15.0)
            .with_mastery(WeaponMastery::Sap),
        WeaponItem::new("Pike", "1d10", WeaponDamageType::Piercing)
            .martial()
            .with_weight(18.0)
            .with_value(5.0)
            .with_properties(vec![WeaponProperty::Heavy, WeaponProperty::Reach, WeaponProperty::TwoHanded])
            .with_mastery(WeaponMastery::Push),
        WeaponItem::new("Rapier", "1d8", WeaponDamageType::Piercing)
            .martial()
            .with_weight(2.0)
            .with_value(25.0)
            .with_properties(vec![WeaponProperty::Finesse])
            .with_mastery(WeaponMastery::Vex),
        WeaponItem::new("Scimitar", "1d6", WeaponDamageType::Slashing)
            .martial()
            .with_weight(3.0)
            .with_value(25.0)
            .with_properties(vec![WeaponProperty::Finesse, WeaponProperty::Light])
            .with_mastery(WeaponMastery::Nick),
        WeaponItem::new("Shortsword", "1d6", WeaponDamageType::Piercing)
            .martial()
            .with_weight(2.0)
            .with_value(10.0)
            .with_properties(vec![WeaponProperty::Finesse, WeaponProperty::Light])
            .with_mastery(WeaponMastery::Vex),
        WeaponItem::new("Trident", "1d8", WeaponDamageType::Piercing)
            .martial()
            .with_weight(4.0)
            .with_value(5.0)
            .with_properties(vec![WeaponProperty::Thrown, WeaponProperty::Versatile("1d10".to_string())])
            .with_range(20, 60)
            .with_mastery(WeaponMastery::Topple),
        WeaponItem::new("Warhammer", "1d8", WeaponDamageType::Bludgeoning)
            .martial()
            .with_weight(5.0)
            .with_value(15.0)
            .with_properties(vec![WeaponProperty::Versatile("1d10".to_string())])
            .with_mastery(WeaponMastery::Push),
        WeaponItem::new("War Pick", "1d8", WeaponDamageType::Piercing)
            .martial()
            .with_weight(2.0)
            .with_value(5.0)
            .with_properties(vec![WeaponProperty::Versatile("1d10".to_string())])
            .with_mastery(WeaponMastery::Sap),
        WeaponItem::new("Whip", "1d4", WeaponDamageType::Slashing)
            .martial()
            .with_weight(3.0)
            .with_value(2.0)
            .with_properties(vec![WeaponProperty::Finesse, WeaponProperty::Reach])
            .with_mastery(WeaponMastery::Slow),

        // Martial Ranged Weapons
        WeaponItem::new("Hand Crossbow", "1d6", WeaponDamageType::Piercing)
            .martial()
            .with_weight(3.0)
            .with_value(75.0)
            .with_properties(vec![WeaponProperty::Ammunition, WeaponProperty::Light, WeaponProperty::Loading])
            .ranged(30, 120)
            .with_mastery(WeaponMastery::Vex),
        WeaponItem::new("Heavy Crossbow", "1d10", WeaponDamageType::Piercing)
            .martial()
            .with_weight(18.0)
            .with_value(50.0)
            .with_properties(vec![WeaponProperty::Ammunition, WeaponProperty::Heavy, WeaponProperty::Loading, WeaponProperty::TwoHanded])
            .ranged(100, 400)
            .with_mastery(WeaponMastery::Push),
        WeaponItem::new("Longbow", "1d8", WeaponDamageType::Piercing)
            .martial()
            .with_weight(2.0)
            .with_value(50.0)
            .with_properties(vec![WeaponProperty::Ammunition, WeaponProperty::Heavy, WeaponProperty::TwoHanded])
            .ranged(150, 600)
            .with_mastery(WeaponMastery::Slow),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_weapon_case_insensitive() {
        let sword = get_weapon("longsword").unwrap();
        assert_eq!(sword.name(), "Longsword");
        assert_eq!(sword.category, WeaponCategory::Martial);
        assert_eq!(sword.versatile_damage(), Some("1d10"));
        assert_eq!(sword.mastery, Some(WeaponMastery::Sap));
        assert!(get_weapon("Lightsaber").is_none());
    }

    #[test]
    fn test_weapon_kinds() {
        assert!(get_weapon("Longbow").unwrap().is_ranged());
        // Thrown melee weapons are not ranged weapons
        assert!(!get_weapon("Handaxe").unwrap().is_ranged());
        assert!(get_weapon("Quarterstaff").unwrap().is_monk_weapon());
        assert!(get_weapon("Shortsword").unwrap().is_monk_weapon());
        assert!(!get_weapon("Greatclub").unwrap().is_monk_weapon());
    }

    #[test]
    fn test_inventory_stacking() {
        let mut inventory = Inventory::default();
        let mut potion = Item::new("Potion of Healing", ItemType::Potion);
        potion.quantity = 2;
        inventory.add_item(potion.clone());
        inventory.add_item(potion);
        assert_eq!(inventory.items.len(), 1);
        assert_eq!(inventory.find_item("potion of healing").unwrap().quantity, 4);

        inventory.add_item(Item::new("Dagger", ItemType::Weapon));
        inventory.add_item(Item::new("Dagger", ItemType::Weapon));
        assert_eq!(inventory.items.len(), 3);

        assert!(inventory.remove_item("Potion of Healing", 4));
        assert!(!inventory.has_item("Potion of Healing"));
        assert!(!inventory.remove_item("Dagger", 2));
    }

    #[test]
    fn test_equipment_weapons_order() {
        let mut equipment = Equipment::new();
        equipment.equip(get_weapon("Dagger").unwrap(), Hand::Off);
        equipment.equip(get_weapon("Scimitar").unwrap(), Hand::Main);

        let weapons = equipment.weapons();
        assert_eq!(weapons.len(), 2);
        assert_eq!(weapons[0].0, Hand::Main);
        assert_eq!(weapons[0].1.name(), "Scimitar");
    }

    #[test]
    fn test_mastery_lookup() {
        assert_eq!(WeaponMastery::from_name("topple"), Some(WeaponMastery::Topple));
        assert!(WeaponMastery::Graze.description().contains("miss"));
        assert!(WeaponMastery::from_name("Smash").is_none());
    }
}

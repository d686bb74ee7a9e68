//! Monster catalog and factory.

use crate::dice::Dice;
use crate::items::Weapon;
use crate::world::{Attributes, Health, Monster, MonsterFeature};

/// Stat block a monster is stamped from.
#[derive(Debug, Clone, Copy)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub base_health: i32,
    pub weapon_damage: i32,
    pub attributes: Attributes,
    pub features: &'static [MonsterFeature],
    pub reward: Weapon,
}

/// Every monster a battle can be fought against.
pub const MONSTERS: [MonsterTemplate; 6] = [
    MonsterTemplate {
        name: "Goblin",
        base_health: 5,
        weapon_damage: 2,
        attributes: Attributes {
            strength: 1,
            dexterity: 1,
            constitution: 1,
        },
        features: &[],
        reward: Weapon::Dagger,
    },
    MonsterTemplate {
        name: "Skeleton",
        base_health: 10,
        weapon_damage: 2,
        attributes: Attributes {
            strength: 2,
            dexterity: 2,
            constitution: 1,
        },
        features: &[MonsterFeature::DoubleBluntDamage],
        reward: Weapon::Club,
    },
    MonsterTemplate {
        name: "Slime",
        base_health: 8,
        weapon_damage: 1,
        attributes: Attributes {
            strength: 3,
            dexterity: 1,
            constitution: 2,
        },
        features: &[MonsterFeature::ImmuneSlashing],
        reward: Weapon::Spear,
    },
    MonsterTemplate {
        name: "Ghost",
        base_health: 6,
        weapon_damage: 3,
        attributes: Attributes {
            strength: 1,
            dexterity: 3,
            constitution: 1,
        },
        features: &[MonsterFeature::HiddenAttack],
        reward: Weapon::Sword,
    },
    MonsterTemplate {
        name: "Golem",
        base_health: 10,
        weapon_damage: 1,
        attributes: Attributes {
            strength: 3,
            dexterity: 1,
            constitution: 3,
        },
        features: &[MonsterFeature::StoneSkin],
        reward: Weapon::Axe,
    },
    MonsterTemplate {
        name: "Dragon",
        base_health: 20,
        weapon_damage: 4,
        attributes: Attributes {
            strength: 3,
            dexterity: 3,
            constitution: 3,
        },
        features: &[MonsterFeature::FireBreath { interval: 3 }],
        reward: Weapon::LegendarySword,
    },
];

impl Monster {
    /// Stamp a fresh monster at full health.
    pub fn from_template(template: &MonsterTemplate) -> Self {
        Self {
            name: template.name.to_string(),
            weapon_damage: template.weapon_damage,
            attributes: template.attributes,
            features: template.features.to_vec(),
            reward: template.reward,
            health: Health::new(template.base_health),
        }
    }

    /// Uniform pick from the catalog.
    pub fn random(dice: &mut impl Dice) -> Self {
        Self::from_template(&MONSTERS[dice.pick(MONSTERS.len())])
    }
}

/// Look up a catalog monster by name, ignoring case.
pub fn find_monster(name: &str) -> Option<Monster> {
    MONSTERS
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
        .map(Monster::from_template)
}

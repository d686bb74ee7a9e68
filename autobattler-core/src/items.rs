//! Weapon catalog.
//!
//! The full set of weapons is fixed: starting weapons for each class plus the
//! rewards monsters drop. Weapons are plain values and never change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Damage type of a weapon, used for monster matchups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    Slashing,
    Blunt,
    Piercing,
}

impl WeaponType {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponType::Slashing => "slashing",
            WeaponType::Blunt => "blunt",
            WeaponType::Piercing => "piercing",
        }
    }
}

impl fmt::Display for WeaponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A weapon from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weapon {
    Sword,
    Club,
    Dagger,
    Axe,
    Spear,
    LegendarySword,
}

impl Weapon {
    /// Flat damage added to the wielder's strength.
    pub fn damage(&self) -> i32 {
        match self {
            Weapon::Sword => 3,
            Weapon::Club => 3,
            Weapon::Dagger => 2,
            Weapon::Axe => 4,
            Weapon::Spear => 3,
            Weapon::LegendarySword => 5,
        }
    }

    pub fn weapon_type(&self) -> WeaponType {
        match self {
            Weapon::Sword | Weapon::Axe | Weapon::LegendarySword => WeaponType::Slashing,
            Weapon::Club => WeaponType::Blunt,
            Weapon::Dagger | Weapon::Spear => WeaponType::Piercing,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Weapon::Sword => "Sword",
            Weapon::Club => "Club",
            Weapon::Dagger => "Dagger",
            Weapon::Axe => "Axe",
            Weapon::Spear => "Spear",
            Weapon::LegendarySword => "Legendary Sword",
        }
    }

    pub fn all() -> [Weapon; 6] {
        [
            Weapon::Sword,
            Weapon::Club,
            Weapon::Dagger,
            Weapon::Axe,
            Weapon::Spear,
            Weapon::LegendarySword,
        ]
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name(), self.damage(), self.weapon_type())
    }
}

/// Look up a weapon by name, ignoring case and separators.
pub fn get_weapon(name: &str) -> Option<Weapon> {
    let wanted = normalize(name);
    Weapon::all()
        .into_iter()
        .find(|w| normalize(w.name()) == wanted)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

//! Per-class constants and tier unlocks.
//!
//! Each class grants health per level, a starting weapon, and a one-time bonus
//! the first time it reaches levels 2 and 3. Levels past 3 grant health only.

use crate::items::Weapon;
use crate::world::CharacterClass;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest class level that carries a tier unlock.
pub const MAX_UNLOCK_TIER: u32 = 3;

/// Flat damage reduction of the Warrior shield, on both sides of the exchange.
pub const SHIELD_REDUCTION: i32 = 3;

/// Poison damage on the first poisoned hit.
pub const POISON_START: i32 = 1;

/// Poison damage never escalates past this.
pub const POISON_CAP: i32 = 3;

/// A one-time bonus granted when a class reaches a given level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierUnlock {
    DexterityBonus,
    Poison,
    Shield,
    StrengthBonus,
    StoneSkin,
    ConstitutionBonus,
}

impl TierUnlock {
    pub fn name(&self) -> &'static str {
        match self {
            TierUnlock::DexterityBonus => "Dexterity +1",
            TierUnlock::Poison => "Poison",
            TierUnlock::Shield => "Shield",
            TierUnlock::StrengthBonus => "Strength +1",
            TierUnlock::StoneSkin => "Stone Skin",
            TierUnlock::ConstitutionBonus => "Constitution +1",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TierUnlock::DexterityBonus => "Permanently raises dexterity by one.",
            TierUnlock::Poison => "Hits add poison damage, growing by one per hit up to three.",
            TierUnlock::Shield => "Reduces damage by three when out-muscling the opponent.",
            TierUnlock::StrengthBonus => "Permanently raises strength by one.",
            TierUnlock::StoneSkin => "Reduces damage by constitution at the time of unlocking.",
            TierUnlock::ConstitutionBonus => "Permanently raises constitution by one.",
        }
    }
}

impl fmt::Display for TierUnlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Class-specific constants.
pub struct ClassData {
    pub health_per_level: i32,
    pub starting_weapon: Weapon,
    /// Unlocks for levels 2 and 3, in that order.
    pub tier_unlocks: [TierUnlock; 2],
    /// Ability gained at level 1, for display.
    pub signature_ability: &'static str,
}

impl CharacterClass {
    /// Get the constants for this class.
    pub fn data(&self) -> ClassData {
        match self {
            CharacterClass::Rogue => ClassData {
                health_per_level: 4,
                starting_weapon: Weapon::Dagger,
                tier_unlocks: [TierUnlock::DexterityBonus, TierUnlock::Poison],
                signature_ability: "Hidden Attack: +1 damage against slower opponents",
            },
            CharacterClass::Warrior => ClassData {
                health_per_level: 5,
                starting_weapon: Weapon::Sword,
                tier_unlocks: [TierUnlock::Shield, TierUnlock::StrengthBonus],
                signature_ability: "Action Surge: double damage on the opening turn",
            },
            CharacterClass::Barbarian => ClassData {
                health_per_level: 6,
                starting_weapon: Weapon::Club,
                tier_unlocks: [TierUnlock::StoneSkin, TierUnlock::ConstitutionBonus],
                signature_ability: "Rage: +2 damage for the first three turns, -1 after",
            },
        }
    }

    pub fn health_per_level(&self) -> i32 {
        self.data().health_per_level
    }

    pub fn starting_weapon(&self) -> Weapon {
        self.data().starting_weapon
    }

    /// The unlock granted on reaching `level`, if any.
    pub fn unlock_at(&self, level: u32) -> Option<TierUnlock> {
        match level {
            2 => Some(self.data().tier_unlocks[0]),
            3 => Some(self.data().tier_unlocks[1]),
            _ => None,
        }
    }
}

/// Parse a class name as typed on a command line.
pub fn parse_class(s: &str) -> Option<CharacterClass> {
    match s.trim().to_lowercase().as_str() {
        "rogue" => Some(CharacterClass::Rogue),
        "warrior" => Some(CharacterClass::Warrior),
        "barbarian" => Some(CharacterClass::Barbarian),
        _ => None,
    }
}
